use core::convert::Infallible;
use ufmt::{uWrite, uwrite};

use crate::drivers::{Display, Font, Keyboard};
use crate::hal::Uart;

/// Serial terminal standing in for the LCD and keyboard during bring-up.
///
/// Screen coordinates are mapped onto ANSI cursor positions, received bytes
/// are reported as key codes.
pub struct SerialConsole {
    uart: Uart,
    font: Font,
}

impl SerialConsole {
    pub fn new() -> Self {
        Self {
            uart: Uart::new(),
            font: Font::Medium,
        }
    }

    /// Console on a USART that [`SerialConsole::new`] already configured
    pub fn attached() -> Self {
        Self {
            uart: Uart::attached(),
            font: Font::Medium,
        }
    }

    pub fn write_line(&mut self, s: &str) {
        self.uart.write_str(s);
        self.uart.write_str("\r\n");
    }
}

impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.uart.write_str(s);
        Ok(())
    }
}

impl Display for SerialConsole {
    fn clear(&mut self) {
        self.uart.write_str("\x1b[2J\x1b[H");
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn put_string(&mut self, text: &str, x: u16, y: u16) {
        let row = y / self.font_height() + 1;
        let col = x / self.font_width() + 1;
        let _ = uwrite!(self, "\x1b[{};{}H{}", row, col, text);
    }

    fn font_height(&self) -> u16 {
        match self.font {
            Font::Small => 8,
            Font::Medium => 8,
            Font::Large => 16,
            Font::Huge => 16,
        }
    }

    fn font_width(&self) -> u16 {
        match self.font {
            Font::Small => 6,
            Font::Medium => 9,
            Font::Large => 12,
            Font::Huge => 15,
        }
    }

    fn contrast_up(&mut self) {}

    fn contrast_down(&mut self) {}

    fn sleep(&mut self) {
        self.write_line("[display off]");
    }

    fn wake(&mut self) {
        self.write_line("[display on]");
    }
}

impl Keyboard for SerialConsole {
    fn get_key(&mut self) -> Option<u8> {
        self.uart.read_byte()
    }
}
