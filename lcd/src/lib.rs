//! Driver for HD44780-compatible character LCDs with an integrated RGB backlight controller,
//! talking over I2C (like the Grove LCD RGB Backlight module).
//!
//! The display is driven through [RgbLcd], which owns (or borrows) an
//! [embedded_hal::i2c::I2c] bus and an [embedded_hal::delay::DelayNs] provider, so it works on
//! any platform with an embedded-hal implementation. On a Raspberry Pi, `rppal` with its `hal`
//! feature provides both.
//!
//! ```no_run
//! # use embedded_hal::{delay::DelayNs, i2c::I2c};
//! # use rgblcd::{RgbLcd, DotSize, LcdResult};
//! # fn run(i2c: impl I2c, delay: impl DelayNs) -> LcdResult<()> {
//! let mut lcd = RgbLcd::create(i2c, delay, 2, DotSize::Dots5x8)?;
//! lcd.set_rgb(64, 0, 64)?;
//! lcd.print_str("Hello, world!")?;
//! # Ok(())
//! # }
//! ```

mod config;
pub mod lcd;
mod rgb_lcd;

pub use config::*;
pub use lcd::backlight::{BacklightDriver, BlinkPattern, Color};
pub use lcd::hd44780::{
    CursorDirection, DisplayControl, DotSize, EntryMode, FunctionSet, HD44780Driver,
};
pub use rgb_lcd::*;

use embedded_hal::i2c::{Error as I2cError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("no acknowledge from device at {address:#04x}")]
    Nack { address: u8 },
    #[error("I2C error talking to {address:#04x}: {kind:?}")]
    Bus { address: u8, kind: ErrorKind },
}

impl LcdError {
    /// Maps an error of the I2C implementation, raised while talking to `address`.
    pub fn from_i2c(address: u8, err: impl I2cError) -> Self {
        match err.kind() {
            ErrorKind::NoAcknowledge(_) => LcdError::Nack { address },
            kind => LcdError::Bus { address, kind },
        }
    }
}

pub type LcdResult<T> = Result<T, LcdError>;

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::NoAcknowledgeSource;

    #[test]
    fn missing_acknowledge_becomes_nack() {
        let err = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data);
        assert_eq!(LcdError::from_i2c(0x3E, err), LcdError::Nack { address: 0x3E });
    }

    #[test]
    fn other_bus_errors_keep_their_kind() {
        assert_eq!(
            LcdError::from_i2c(0x62, ErrorKind::ArbitrationLoss),
            LcdError::Bus {
                address: 0x62,
                kind: ErrorKind::ArbitrationLoss,
            }
        );
    }
}
