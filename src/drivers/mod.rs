//! Interfaces of the hardware collaborators driven by the kernel
//!
//! The LCD, keyboard matrix and power circuitry are plain I/O wrappers; the
//! kernel only needs the operations below. Board support code implements
//! them, tests provide scripted fakes.

pub mod battery;
pub mod power_button;
#[cfg(target_arch = "avr")]
pub mod serial_console;

pub use battery::BatterySensor;
pub use power_button::PowerButton;
#[cfg(target_arch = "avr")]
pub use serial_console::SerialConsole;

use embedded_hal::blocking::delay::DelayMs;

use crate::clock::TimeSource;

/// LCD fonts, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
    Medium,
    Large,
    Huge,
}

pub trait Display {
    fn init(&mut self) {}
    fn clear(&mut self);
    fn set_font(&mut self, font: Font);
    fn put_string(&mut self, text: &str, x: u16, y: u16);
    fn font_height(&self) -> u16;
    fn font_width(&self) -> u16;
    fn contrast_up(&mut self);
    fn contrast_down(&mut self);
    fn sleep(&mut self);
    fn wake(&mut self);
}

pub trait Keyboard {
    fn init(&mut self) {}
    /// Code of the key currently pressed, `None` when nothing is pressed
    fn get_key(&mut self) -> Option<u8>;
}

pub trait Power {
    fn init(&mut self) {}
    fn button_pressed(&mut self) -> bool;
    fn battery_level(&mut self) -> u16;
    /// Suspends execution until an external wake source fires
    fn sleep(&mut self);
}

/// Everything the kernel needs from the device
pub trait Board: TimeSource {
    type Display: Display;
    type Keyboard: Keyboard;
    type Power: Power;
    type Delay: DelayMs<u8>;

    fn display(&mut self) -> &mut Self::Display;
    fn keyboard(&mut self) -> &mut Self::Keyboard;
    fn power(&mut self) -> &mut Self::Power;
    fn delay(&mut self) -> &mut Self::Delay;

    /// Restarts the firmware from its entry point, no state survives
    fn reboot(&mut self) -> !;
}
