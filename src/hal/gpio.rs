use avr_device::atmega128rfa1::{EXINT, PORTD};
use core::convert::Infallible;
use embedded_hal::digital::v2::InputPin;

/// Power button on PD2 (INT2), active low with the internal pull-up
pub struct PowerButtonPin {
    _private: (),
}

const PIN: u8 = 2;

impl PowerButtonPin {
    pub fn new() -> Self {
        unsafe {
            let port = &*PORTD::ptr();
            port.ddrd.modify(|r, w| w.bits(r.bits() & !(1 << PIN)));
            port.portd.modify(|r, w| w.bits(r.bits() | (1 << PIN)));
        }
        Self { _private: () }
    }
}

impl Default for PowerButtonPin {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPin for PowerButtonPin {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        let port = unsafe { &*PORTD::ptr() };
        Ok(port.pind.read().bits() & (1 << PIN) != 0)
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Arms INT2 on the falling edge so a button press ends power-down
pub fn enable_wake_interrupt() {
    unsafe {
        let exint = &*EXINT::ptr();
        exint.eicra.modify(|r, w| w.bits((r.bits() & !(0b11 << 4)) | (0b10 << 4)));
        exint.eifr.write(|w| w.bits(1 << PIN));
        exint.eimsk.modify(|r, w| w.bits(r.bits() | (1 << PIN)));
    }
}

pub fn disable_wake_interrupt() {
    unsafe {
        let exint = &*EXINT::ptr();
        exint.eimsk.modify(|r, w| w.bits(r.bits() & !(1 << PIN)));
    }
}

// Only wakes the core, the press itself is read by the debouncer
#[avr_device::interrupt(atmega128rfa1)]
fn INT2() {}
