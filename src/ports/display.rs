//! Display port - character sink for rendered readings
//!
//! Modelled on a two-line HD44780-style module: select a line, then feed
//! bytes one at a time. Controller initialisation is the adapter's business.

/// Error type for display operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Controller rejected or lost a write
    WriteFailed,
    /// Line buffer is full
    Overflow,
}

/// Display line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayLine {
    First,
    Second,
}

impl DisplayLine {
    /// HD44780 "set DDRAM address" instruction for the start of the line
    pub const fn ddram_command(&self) -> u8 {
        match self {
            DisplayLine::First => 0x80,
            DisplayLine::Second => 0xC0,
        }
    }
}

/// Port for the character display
pub trait DisplayPort {
    /// Move the cursor to the start of a line
    fn set_line(&mut self, line: DisplayLine) -> Result<(), DisplayError>;

    /// Write one character code at the cursor
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Write a string byte-by-byte
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        for byte in text.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_start_addresses() {
        assert_eq!(DisplayLine::First.ddram_command(), 0x80);
        assert_eq!(DisplayLine::Second.ddram_command(), 0xC0);
    }
}
