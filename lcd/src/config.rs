use crate::{Color, DotSize, LcdError, LcdResult};

/// Converts an 8-bit (write) address, as printed in most datasheets, to a 7-bit I2C address.
pub const fn address_from_8bit(address: u8) -> u8 {
    address >> 1
}

/// 7-bit address of the character controller (`0x7C` in 8-bit form).
pub const LCD_ADDRESS: u8 = address_from_8bit(0x7C);
/// 7-bit address of the backlight controller (`0xC4` in 8-bit form).
pub const RGB_ADDRESS: u8 = address_from_8bit(0xC4);

/// Configuration of an [crate::RgbLcd], used once at creation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LcdConfig {
    /// Characters per line. Only used to warn about out-of-range cursor positions.
    pub columns: u8,
    /// Display lines. More than one selects the 2-line mode.
    pub lines: u8,
    /// Font height, only honored on single-line displays.
    pub dot_size: DotSize,
    pub lcd_address: u8,
    pub rgb_address: u8,
    /// Backlight color set at the end of initialization.
    pub color: Color,
}

impl Default for LcdConfig {
    fn default() -> Self {
        LcdConfig {
            columns: 16,
            lines: 2,
            dot_size: DotSize::Dots5x8,
            lcd_address: LCD_ADDRESS,
            rgb_address: RGB_ADDRESS,
            color: Color::WHITE,
        }
    }
}

impl LcdConfig {
    pub fn with_columns(mut self, columns: u8) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_lines(mut self, lines: u8) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_dot_size(mut self, dot_size: impl Into<DotSize>) -> Self {
        self.dot_size = dot_size.into();
        self
    }

    pub fn with_lcd_address(mut self, address: u8) -> Self {
        self.lcd_address = address;
        self
    }

    pub fn with_rgb_address(mut self, address: u8) -> Self {
        self.rgb_address = address;
        self
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Checks that both addresses fit in 7 bits.
    pub fn validate(&self) -> LcdResult<()> {
        if self.lcd_address > 0x7F || self.rgb_address > 0x7F {
            return Err(LcdError::InvalidArgument);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasheet_addresses_shift_to_7bit() {
        assert_eq!(address_from_8bit(0x7C), 0x3E);
        assert_eq!(address_from_8bit(0xC4), 0x62);
    }

    #[test]
    fn default_addresses() {
        let config = LcdConfig::default();
        assert_eq!(config.lcd_address, LCD_ADDRESS);
        assert_eq!(config.rgb_address, RGB_ADDRESS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn any_line_count_is_accepted() {
        for lines in [0, 1, 4, 5, u8::MAX] {
            assert!(LcdConfig::default().with_lines(lines).validate().is_ok());
        }
    }

    #[test]
    fn rejects_addresses_wider_than_7bit() {
        let config = LcdConfig::default().with_lcd_address(0xC4);
        assert_eq!(config.validate(), Err(LcdError::InvalidArgument));
        let config = LcdConfig::default().with_rgb_address(0x80);
        assert_eq!(config.validate(), Err(LcdError::InvalidArgument));
        assert!(LcdConfig::default().with_lcd_address(0x7F).validate().is_ok());
    }
}
