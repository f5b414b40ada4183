//! Register-level support for the ATmega128RFA1
//!
//! Only compiled for AVR targets; everything above this layer talks to the
//! hardware through the traits in [`crate::drivers`].

pub mod adc;
pub mod gpio;
pub mod power;
pub mod timer;
pub mod uart;

pub use adc::{Adc, BatteryChannel};
pub use gpio::PowerButtonPin;
pub use power::PowerDown;
pub use timer::{reboot, Delay};
pub use uart::Uart;
