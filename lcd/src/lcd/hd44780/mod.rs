//! HD44780 character controller.
//!
//! See [HD44780Driver] for the command set. Implementations only provide the two raw transfers,
//! [HD44780Driver::send_command] and [HD44780Driver::send_data]; everything else is built on top
//! of them. The controller is write-only here: there is no busy flag, so callers wait a fixed time
//! after slow commands.

mod flags;

use crate::{LcdError, LcdResult};
pub use flags::*;

/// Number of programmable glyphs in CGRAM.
pub const CGRAM_GLYPHS: u8 = 8;

/// `HD44780Driver` defines the low-level command set of an HD44780-compatible controller.
///
/// # Memory
///
/// - **CGRAM** (Character Generator RAM) stores up to 8 user-defined glyphs, 8 rows each, of
///   which the lowest 5 bits are used. Glyph `n` is shown by writing character code `n`.
/// - **DDRAM** (Display Data RAM) holds the character codes shown on the display. On two-line
///   displays, the second line starts at address `0x40`.
///
/// # Sources
///
/// - Hitachi, [“HD44780U (LCD-II) Dot Matrix Liquid Crystal Display Controller/Driver,”](https://www.sparkfun.com/datasheets/LCD/HD44780.pdf)
///   1998.
pub trait HD44780Driver {
    /// Clears the display and sets the cursor to the home position.
    ///
    /// Command: `00000001`.
    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(0b00000001)
    }

    /// Sets the cursor to the home position (0, 0) and undoes any display shift.
    ///
    /// Command: `0000001?`.
    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(0b00000010)
    }

    /// Sets how the cursor moves and whether the display shifts after each write.
    ///
    /// Command: `000001IS`.
    /// `I` is `1` for right cursor direction, `0` for left cursor direction.
    /// `S` is `1` for display shift, `0` for no display shift.
    fn set_entry_mode(&mut self, entry_mode: EntryMode) -> LcdResult<()> {
        self.send_command(0b00000100 | entry_mode.to_mask())
    }

    /// Turns the display on or off, and controls the cursor and its blinking.
    ///
    /// Command: `00001DCB`.
    /// `D` is `1` for display on, `C` for cursor on, `B` for cursor blinking.
    fn set_display_control(&mut self, display_control: DisplayControl) -> LcdResult<()> {
        self.send_command(0b00001000 | display_control.to_mask())
    }

    /// Moves the cursor or shifts the whole display by one in the specified direction.
    ///
    /// Command: `0001DR??`.
    /// `D` is `1` for display shift, `0` for cursor move.
    /// `R` is `1` for right, `0` for left.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> LcdResult<()> {
        let mut command = 0b00010000;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the interface width, number of lines and font.
    ///
    /// Command: `001BNF??`.
    /// `B` is `1` for 8-bit data length, `N` for two lines, `F` for the 5x10 font.
    fn function_set(&mut self, function_set: FunctionSet) -> LcdResult<()> {
        self.send_command(0b00100000 | function_set.to_mask())
    }

    /// Sets the CGRAM address, so that the following data writes go to glyph memory.
    ///
    /// The address is a 6-bit value. If out of bounds, it will return [LcdError::InvalidArgument].
    ///
    /// Command: `01AAAAAA`.
    fn set_cgram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b00111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b01000000 | address)
    }

    /// Sets the DDRAM address, which is the cursor position.
    ///
    /// The address is a 7-bit value. If out of bounds, it will return [LcdError::InvalidArgument].
    ///
    /// Command: `1AAAAAAA`.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b01111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b10000000 | address)
    }

    /// Stores a glyph in one of the 8 CGRAM slots.
    ///
    /// `location` is masked to its lowest 3 bits, so location 9 is the same as location 1.
    /// Leaves the address counter in CGRAM; move the cursor before writing text again.
    fn create_char(&mut self, location: u8, glyph: &[u8; 8]) -> LcdResult<()> {
        let location = location & (CGRAM_GLYPHS - 1);
        self.set_cgram_address(location << 3)?;
        self.send_data_burst(glyph)
    }

    // Low-level transfers, implemented by the transport-specific driver.

    /// Sends a command byte to the controller (RS = 0).
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends a data byte to the controller (RS = 1), written at the address counter.
    fn send_data(&mut self, data: u8) -> LcdResult<()>;

    /// Sends several data bytes. Transports that can do it in one transaction should override this.
    fn send_data_burst(&mut self, data: &[u8]) -> LcdResult<()> {
        for &byte in data {
            self.send_data(byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Log {
        sent: Vec<(bool, u8)>,
    }

    impl HD44780Driver for Log {
        fn send_command(&mut self, command: u8) -> LcdResult<()> {
            self.sent.push((false, command));
            Ok(())
        }

        fn send_data(&mut self, data: u8) -> LcdResult<()> {
            self.sent.push((true, data));
            Ok(())
        }
    }

    #[test]
    fn cursor_shift_encodes_display_move_and_direction() {
        let mut log = Log::default();
        log.cursor_shift(true, CursorDirection::Left).unwrap();
        log.cursor_shift(true, CursorDirection::Right).unwrap();
        log.cursor_shift(false, CursorDirection::Right).unwrap();
        assert_eq!(log.sent, vec![(false, 0x18), (false, 0x1C), (false, 0x14)]);
    }

    #[test]
    fn addresses_out_of_range_are_rejected_without_sending() {
        let mut log = Log::default();
        assert_eq!(log.set_cgram_address(0x40), Err(LcdError::InvalidArgument));
        assert_eq!(log.set_ddram_address(0x80), Err(LcdError::InvalidArgument));
        assert!(log.sent.is_empty());
    }

    #[test]
    fn create_char_masks_location_and_writes_rows() {
        let glyph = [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0x00];
        let mut log = Log::default();
        log.create_char(9, &glyph).unwrap();
        assert_eq!(log.sent[0], (false, 0x48));
        let rows: Vec<u8> = log.sent[1..].iter().map(|&(_, b)| b).collect();
        assert_eq!(rows, glyph);
        assert!(log.sent[1..].iter().all(|&(rs, _)| rs));
    }
}
