use crate::lcd::backlight::{BacklightDriver, BlinkPattern, Color};
use crate::lcd::hd44780::{
    CursorDirection, DisplayControl, DotSize, EntryMode, FunctionSet, HD44780Driver,
};
use crate::{LcdConfig, LcdError, LcdResult};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, trace, warn};
use std::fmt;

/// Control byte prefixing a command (Co = 1, RS = 0).
pub const COMMAND_PREFIX: u8 = 0x80;
/// Control byte prefixing display data (Co = 0, RS = 1).
pub const DATA_PREFIX: u8 = 0x40;

/// Character controller DDRAM offset of the second line.
const SECOND_LINE_OFFSET: u8 = 0x40;

/// RGB backlit character LCD on an I2C bus.
///
/// Created with [RgbLcd::create], which runs the whole power-on sequence, and released with
/// [RgbLcd::close], which hands the bus back. The bus can be borrowed (`&mut i2c`) to keep using
/// it for other devices.
///
/// The display control and entry mode flags are kept here and re-sent in full whenever one of
/// them changes, as the controller has no way to update a single flag.
#[derive(Debug)]
pub struct RgbLcd<I2C, D> {
    bus: I2C,
    delay: D,
    lcd_address: u8,
    rgb_address: u8,

    columns: u8,
    lines: u8,
    current_line: u8,
    function_set: FunctionSet,
    display_control: DisplayControl,
    entry_mode: EntryMode,
}

impl<I2C: I2c, D: DelayNs> RgbLcd<I2C, D> {
    /// Initializes the display with the default addresses and a white backlight.
    ///
    /// Any non-zero `dot_size` (or [DotSize::Dots5x10]) selects the 10-dot font, which only
    /// single-line displays support.
    pub fn create(
        bus: I2C,
        delay: D,
        lines: u8,
        dot_size: impl Into<DotSize>,
    ) -> LcdResult<Self> {
        let config = LcdConfig::default()
            .with_lines(lines)
            .with_dot_size(dot_size);
        Self::create_with_config(bus, delay, config)
    }

    /// Initializes the display. The bus must already be open.
    ///
    /// Follows the HD44780 datasheet initialization (page 45, figure 23): after the power-on
    /// wait, the function set is sent three times with the mandated pauses, so the controller
    /// ends up in a known state whatever it was doing before, then once more with the final
    /// settings. The display is then turned on without cursor, cleared, and set to left-to-right
    /// text. Finally, the backlight controller is initialized and set to `config.color`.
    ///
    /// Any line count is accepted: more than one line selects the 2-line mode. Any failed write
    /// aborts the creation.
    pub fn create_with_config(bus: I2C, delay: D, config: LcdConfig) -> LcdResult<Self> {
        config.validate()?;
        if config.lines > 4 {
            warn!("{} lines requested, driving the display in 2-line mode", config.lines);
        }

        let mut lcd = RgbLcd {
            bus,
            delay,
            lcd_address: config.lcd_address,
            rgb_address: config.rgb_address,
            columns: config.columns,
            lines: config.lines,
            current_line: 0,
            function_set: FunctionSet::new(config.lines, config.dot_size),
            display_control: DisplayControl::default(),
            entry_mode: EntryMode {
                direction: CursorDirection::Left,
                shift: false,
            },
        };

        debug!(
            "Initializing LCD @ {:#04x}, {} line(s), {:?}...",
            lcd.lcd_address, lcd.lines, lcd.function_set
        );

        // At least 40 ms after Vcc rises above 2.7 V
        lcd.delay.delay_ms(50);

        // Synchronize
        lcd.function_set(lcd.function_set)?;
        lcd.delay.delay_us(4500);
        lcd.function_set(lcd.function_set)?;
        lcd.delay.delay_us(150);
        lcd.function_set(lcd.function_set)?;

        lcd.function_set(lcd.function_set)?;

        lcd.display_control = DisplayControl {
            display_on: true,
            cursor_on: false,
            blink_on: false,
        };
        lcd.set_display_control(lcd.display_control)?;

        lcd.clear()?;

        lcd.entry_mode = EntryMode {
            direction: CursorDirection::Right,
            shift: false,
        };
        lcd.set_entry_mode(lcd.entry_mode)?;

        lcd.init_backlight()?;
        lcd.set_color(config.color)?;

        debug!("LCD initialized.");

        Ok(lcd)
    }

    /// Releases the display, returning the bus. The bus itself is left open.
    pub fn close(self) -> I2C {
        debug!("Closing LCD @ {:#04x}", self.lcd_address);
        self.bus
    }

    pub fn lines(&self) -> u8 {
        self.lines
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Line of the last [RgbLcd::set_cursor], reset by [RgbLcd::clear] and [RgbLcd::home].
    pub fn current_line(&self) -> u8 {
        self.current_line
    }

    pub fn function_set_flags(&self) -> FunctionSet {
        self.function_set
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.entry_mode
    }

    /// The bus, for talking to other devices in between display updates.
    pub fn bus_mut(&mut self) -> &mut I2C {
        &mut self.bus
    }

    pub fn bus(&self) -> &I2C {
        &self.bus
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    fn write_frame(&mut self, address: u8, bytes: &[u8]) -> LcdResult<()> {
        trace!("Sending frame to {:#04x}: {:02x?}", address, bytes);
        self.bus
            .write(address, bytes)
            .map_err(|err| LcdError::from_i2c(address, err))
    }

    // Low-level commands

    /// Sends a raw command byte to the character controller.
    pub fn command(&mut self, value: u8) -> LcdResult<()> {
        self.write_frame(self.lcd_address, &[COMMAND_PREFIX, value])
    }

    /// Writes a raw data byte at the cursor position.
    pub fn write_data(&mut self, value: u8) -> LcdResult<()> {
        self.write_frame(self.lcd_address, &[DATA_PREFIX, value])
    }

    // Text output

    /// Prints a character as its UTF-8 bytes, one data write each.
    pub fn print_char(&mut self, c: char) -> LcdResult<()> {
        let mut buffer = [0; 4];
        self.print_str(c.encode_utf8(&mut buffer))
    }

    /// Prints raw character codes, including the custom glyphs 0–7.
    pub fn print_bytes(&mut self, bytes: &[u8]) -> LcdResult<()> {
        for &byte in bytes {
            self.write_data(byte)?;
        }
        Ok(())
    }

    /// Prints the bytes of `s` unchanged. The character ROM decides what each code looks like, so
    /// only ASCII is portable across displays.
    pub fn print_str(&mut self, s: &str) -> LcdResult<()> {
        self.print_bytes(s.as_bytes())
    }

    pub fn print_int(&mut self, value: i64) -> LcdResult<()> {
        self.print_str(&value.to_string())
    }

    /// Prints the shortest decimal representation that reads back as `value`, without exponent.
    pub fn print_double(&mut self, value: f64) -> LcdResult<()> {
        self.print_str(&value.to_string())
    }

    pub fn println_char(&mut self, c: char) -> LcdResult<()> {
        self.print_char(c)?;
        self.write_data(b'\n')
    }

    pub fn println_bytes(&mut self, bytes: &[u8]) -> LcdResult<()> {
        self.print_bytes(bytes)?;
        self.write_data(b'\n')
    }

    pub fn println_str(&mut self, s: &str) -> LcdResult<()> {
        self.print_str(s)?;
        self.write_data(b'\n')
    }

    pub fn println_int(&mut self, value: i64) -> LcdResult<()> {
        self.print_int(value)?;
        self.write_data(b'\n')
    }

    pub fn println_double(&mut self, value: f64) -> LcdResult<()> {
        self.print_double(value)?;
        self.write_data(b'\n')
    }

    // Cursor and display control

    /// Clears the display and returns the cursor home.
    pub fn clear(&mut self) -> LcdResult<()> {
        self.clear_display()?;
        self.delay.delay_ms(2);
        self.current_line = 0;
        Ok(())
    }

    /// Returns the cursor home and undoes any scrolling.
    pub fn home(&mut self) -> LcdResult<()> {
        self.return_home()?;
        self.delay.delay_ms(2);
        self.current_line = 0;
        Ok(())
    }

    /// Moves the cursor. Row 0 is the first line; every other row maps to the second line.
    ///
    /// Columns that do not fit the 7-bit DDRAM address return [LcdError::InvalidArgument].
    pub fn set_cursor(&mut self, col: u8, row: u8) -> LcdResult<()> {
        if row > 1 {
            warn!("Row {} is not addressable, using the second line", row);
        }
        if col >= self.columns {
            trace!("Column {} is past the visible {} columns", col, self.columns);
        }
        let address = if row == 0 { col } else { col | SECOND_LINE_OFFSET };
        self.set_ddram_address(address)?;
        self.current_line = row;
        Ok(())
    }

    fn update_display_control(
        &mut self,
        update: impl FnOnce(&mut DisplayControl),
    ) -> LcdResult<()> {
        update(&mut self.display_control);
        self.set_display_control(self.display_control)
    }

    fn update_entry_mode(&mut self, update: impl FnOnce(&mut EntryMode)) -> LcdResult<()> {
        update(&mut self.entry_mode);
        self.set_entry_mode(self.entry_mode)
    }

    pub fn display_on(&mut self) -> LcdResult<()> {
        self.update_display_control(|dc| dc.display_on = true)
    }

    pub fn display_off(&mut self) -> LcdResult<()> {
        self.update_display_control(|dc| dc.display_on = false)
    }

    pub fn cursor_on(&mut self) -> LcdResult<()> {
        self.update_display_control(|dc| dc.cursor_on = true)
    }

    pub fn cursor_off(&mut self) -> LcdResult<()> {
        self.update_display_control(|dc| dc.cursor_on = false)
    }

    pub fn blink_on(&mut self) -> LcdResult<()> {
        self.update_display_control(|dc| dc.blink_on = true)
    }

    pub fn blink_off(&mut self) -> LcdResult<()> {
        self.update_display_control(|dc| dc.blink_on = false)
    }

    /// Scrolls the whole display content one position to the left.
    pub fn scroll_left(&mut self) -> LcdResult<()> {
        self.cursor_shift(true, CursorDirection::Left)
    }

    /// Scrolls the whole display content one position to the right.
    pub fn scroll_right(&mut self) -> LcdResult<()> {
        self.cursor_shift(true, CursorDirection::Right)
    }

    /// Text flows left to right.
    pub fn set_ltr(&mut self) -> LcdResult<()> {
        self.update_entry_mode(|em| em.direction = CursorDirection::Right)
    }

    /// Text flows right to left.
    pub fn set_rtl(&mut self) -> LcdResult<()> {
        self.update_entry_mode(|em| em.direction = CursorDirection::Left)
    }

    /// Shifts the display on each write, so text stays justified at the cursor.
    pub fn right_justify(&mut self) -> LcdResult<()> {
        self.update_entry_mode(|em| em.shift = true)
    }

    pub fn left_justify(&mut self) -> LcdResult<()> {
        self.update_entry_mode(|em| em.shift = false)
    }

    /// Stores a glyph in CGRAM slot `location` (masked to 0–7), printable as character code
    /// `location`. Move the cursor afterwards, as writes go to CGRAM until then.
    pub fn create_custom_char(&mut self, location: u8, glyph: &[u8; 8]) -> LcdResult<()> {
        self.create_char(location, glyph)
    }

    // Backlight

    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> LcdResult<()> {
        self.set_color(Color::new(r, g, b))
    }

    /// Writes a backlight controller register directly.
    pub fn set_pwm(&mut self, register: u8, value: u8) -> LcdResult<()> {
        self.write_backlight_register(register, value)
    }

    /// Blinks the backlight once a second, half on, half off.
    pub fn blink_led_on(&mut self) -> LcdResult<()> {
        self.set_blink(BlinkPattern::ONE_SECOND)
    }

    pub fn blink_led_off(&mut self) -> LcdResult<()> {
        self.set_blink(BlinkPattern::STEADY)
    }
}

impl<I2C: I2c, D: DelayNs> HD44780Driver for RgbLcd<I2C, D> {
    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        self.command(command)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        self.write_data(data)
    }

    /// Sends all bytes in a single transaction, after one data prefix.
    fn send_data_burst(&mut self, data: &[u8]) -> LcdResult<()> {
        let mut frame = Vec::with_capacity(data.len() + 1);
        frame.push(DATA_PREFIX);
        frame.extend_from_slice(data);
        self.write_frame(self.lcd_address, &frame)
    }
}

impl<I2C: I2c, D: DelayNs> BacklightDriver for RgbLcd<I2C, D> {
    fn write_backlight_register(&mut self, register: u8, value: u8) -> LcdResult<()> {
        trace!("Backlight register {:#04x} <- {:#04x}", register, value);
        self.write_frame(self.rgb_address, &[register, value])
    }
}

impl<I2C: I2c, D: DelayNs> fmt::Write for RgbLcd<I2C, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print_str(s).map_err(|err: LcdError| {
            warn!("Writing to LCD failed: {}", err);
            fmt::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LCD_ADDRESS, RGB_ADDRESS};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::fmt::Write;

    /// A display in its post-init state, expecting only `expectations` on the bus.
    fn lcd(expectations: &[I2cTransaction]) -> RgbLcd<I2cMock, NoopDelay> {
        RgbLcd {
            bus: I2cMock::new(expectations),
            delay: NoopDelay::new(),
            lcd_address: LCD_ADDRESS,
            rgb_address: RGB_ADDRESS,
            columns: 16,
            lines: 2,
            current_line: 0,
            function_set: FunctionSet::new(2, DotSize::Dots5x8),
            display_control: DisplayControl {
                display_on: true,
                ..Default::default()
            },
            entry_mode: EntryMode::default(),
        }
    }

    fn data(bytes: &[u8]) -> Vec<I2cTransaction> {
        bytes
            .iter()
            .map(|&b| I2cTransaction::write(LCD_ADDRESS, vec![DATA_PREFIX, b]))
            .collect()
    }

    #[test]
    fn command_and_data_framing() {
        let mut lcd = lcd(&[
            I2cTransaction::write(LCD_ADDRESS, vec![0x80, 0x01]),
            I2cTransaction::write(LCD_ADDRESS, vec![0x40, 0x41]),
        ]);
        lcd.command(0x01).unwrap();
        lcd.write_data(b'A').unwrap();
        lcd.close().done();
    }

    #[test]
    fn fmt_write_prints_text_bytes() {
        let mut lcd = lcd(&data("21°".as_bytes()));
        write!(lcd, "{}°", 21).unwrap();
        lcd.close().done();
    }

    #[test]
    fn print_char_sends_utf8_encoding() {
        let mut lcd = lcd(&data(&[b'a', 0xC2, 0xB0]));
        lcd.print_char('a').unwrap();
        lcd.print_char('°').unwrap();
        lcd.close().done();
    }

    #[test]
    fn cursor_row_is_tracked() {
        let mut lcd = lcd(&[
            I2cTransaction::write(LCD_ADDRESS, vec![0x80, 0xC3]),
            I2cTransaction::write(LCD_ADDRESS, vec![0x80, 0x02]),
        ]);
        lcd.set_cursor(3, 1).unwrap();
        assert_eq!(lcd.current_line(), 1);
        lcd.home().unwrap();
        assert_eq!(lcd.current_line(), 0);
        lcd.close().done();
    }

    #[test]
    fn cursor_column_outside_ddram_is_rejected() {
        let mut lcd = lcd(&[]);
        assert_eq!(lcd.set_cursor(0x80, 0), Err(LcdError::InvalidArgument));
        assert_eq!(lcd.current_line(), 0);
        lcd.close().done();
    }
}
