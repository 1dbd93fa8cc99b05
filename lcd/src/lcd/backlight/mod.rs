//! RGB backlight controller (PCA9633-compatible 4-channel PWM LED driver).
//!
//! The three LED colors are wired to PWM channels 0–2 (blue, green, red). Blinking is done by the
//! controller itself through group dimming/blinking, so it keeps going without the host.

use crate::LcdResult;
use log::debug;
use std::time::Duration;

/// MODE1 register: sleep, sub-addresses, all-call.
pub const REG_MODE1: u8 = 0x00;
/// MODE2 register: group control mode (`DMBLNK`), output polarity and drive.
pub const REG_MODE2: u8 = 0x01;
/// PWM0, blue channel duty cycle.
pub const REG_BLUE: u8 = 0x02;
/// PWM1, green channel duty cycle.
pub const REG_GREEN: u8 = 0x03;
/// PWM2, red channel duty cycle.
pub const REG_RED: u8 = 0x04;
/// GRPPWM, group duty cycle. In blink mode, on/off ratio = value / 256.
pub const REG_GRPPWM: u8 = 0x06;
/// GRPFREQ, group frequency. In blink mode, period = (value + 1) / 24 s.
pub const REG_GRPFREQ: u8 = 0x07;
/// LEDOUT register: driver state of each output.
pub const REG_OUTPUT: u8 = 0x08;

/// MODE1 value after init: normal mode, oscillator on.
const MODE1_NORMAL: u8 = 0x00;
/// LEDOUT value after init: every LED controlled by both its PWM and the group registers.
const OUTPUT_PWM_AND_GROUP: u8 = 0xFF;
/// MODE2 value after init: `DMBLNK` set, so the group registers control blinking.
const MODE2_GROUP_BLINK: u8 = 0x20;

/// Backlight color as PWM duty cycles (0 = off, 255 = fully on).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const OFF: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color { r, g, b }
    }
}

/// Autonomous blink pattern of the backlight, as the raw GRPFREQ/GRPPWM register pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlinkPattern {
    pub grpfreq: u8,
    pub grppwm: u8,
}

impl BlinkPattern {
    /// Blinks once a second, half on and half off.
    pub const ONE_SECOND: BlinkPattern = BlinkPattern {
        grpfreq: 0x17,
        grppwm: 0x7F,
    };
    /// Shortest period with the LEDs on all the time, which stops the blinking.
    pub const STEADY: BlinkPattern = BlinkPattern {
        grpfreq: 0x00,
        grppwm: 0xFF,
    };

    /// Encodes a blink period and an on-ratio (0.0–1.0).
    ///
    /// The period is rounded to the controller's 1/24 s steps and clamped to 1/24 s – 10.67 s.
    pub fn new(period: Duration, on_ratio: f32) -> Self {
        let steps = (period.as_secs_f64() * 24.0).round();
        let grpfreq = (steps - 1.0).clamp(0.0, 255.0) as u8;
        let grppwm = (on_ratio.clamp(0.0, 1.0) * 256.0).round().min(255.0) as u8;
        BlinkPattern { grpfreq, grppwm }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64((self.grpfreq as f64 + 1.0) / 24.0)
    }

    pub fn on_ratio(&self) -> f32 {
        self.grppwm as f32 / 256.0
    }
}

/// `BacklightDriver` defines the register protocol of the backlight controller.
///
/// Implementations only provide [BacklightDriver::write_backlight_register].
pub trait BacklightDriver {
    /// Wakes the controller up, hands the LEDs over to PWM and group control, and selects group
    /// blinking mode. The color registers are left untouched.
    fn init_backlight(&mut self) -> LcdResult<()> {
        debug!("Initializing backlight controller...");
        self.write_backlight_register(REG_MODE1, MODE1_NORMAL)?;
        self.write_backlight_register(REG_OUTPUT, OUTPUT_PWM_AND_GROUP)?;
        self.write_backlight_register(REG_MODE2, MODE2_GROUP_BLINK)
    }

    /// Sets the duty cycle of the three color channels, red first.
    fn set_color(&mut self, color: Color) -> LcdResult<()> {
        self.write_backlight_register(REG_RED, color.r)?;
        self.write_backlight_register(REG_GREEN, color.g)?;
        self.write_backlight_register(REG_BLUE, color.b)
    }

    /// Programs the autonomous blinking of the whole backlight.
    fn set_blink(&mut self, pattern: BlinkPattern) -> LcdResult<()> {
        self.write_backlight_register(REG_GRPFREQ, pattern.grpfreq)?;
        self.write_backlight_register(REG_GRPPWM, pattern.grppwm)
    }

    /// Writes a raw register of the backlight controller.
    fn write_backlight_register(&mut self, register: u8, value: u8) -> LcdResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Registers(Vec<(u8, u8)>);

    impl BacklightDriver for Registers {
        fn write_backlight_register(&mut self, register: u8, value: u8) -> LcdResult<()> {
            self.0.push((register, value));
            Ok(())
        }
    }

    #[test]
    fn init_sequence() {
        let mut regs = Registers::default();
        regs.init_backlight().unwrap();
        assert_eq!(regs.0, vec![(0x00, 0x00), (0x08, 0xFF), (0x01, 0x20)]);
    }

    #[test]
    fn color_goes_to_matching_channels() {
        let mut regs = Registers::default();
        regs.set_color(Color::new(255, 0, 128)).unwrap();
        assert_eq!(regs.0, vec![(REG_RED, 255), (REG_GREEN, 0), (REG_BLUE, 128)]);
    }

    #[test]
    fn blink_period_encoding() {
        assert_eq!(BlinkPattern::ONE_SECOND.period(), Duration::from_secs(1));
        assert_eq!(BlinkPattern::new(Duration::from_secs(1), 0.5).grpfreq, 0x17);
        assert_eq!(BlinkPattern::new(Duration::from_secs(1), 0.5).grppwm, 0x80);
        assert_eq!(BlinkPattern::new(Duration::from_secs(60), 1.0).grpfreq, 0xFF);
        assert_eq!(BlinkPattern::new(Duration::from_secs(60), 1.0).grppwm, 0xFF);
        assert_eq!(
            BlinkPattern::new(Duration::ZERO, 0.0),
            BlinkPattern {
                grpfreq: 0,
                grppwm: 0,
            }
        );
    }
}
