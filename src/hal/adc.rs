use avr_device::atmega128rfa1::ADC;
use core::convert::Infallible;
use embedded_hal::adc::{Channel, OneShot};

/// Internal 1.2V bandgap measured against AVCC; its reading falls as the
/// battery voltage rises
pub struct BatteryChannel;

const BANDGAP_MUX: u8 = 0x1E;

impl Channel<Adc> for BatteryChannel {
    type ID = u8;

    fn channel() -> u8 {
        BANDGAP_MUX
    }
}

pub struct Adc {
    _private: (),
}

impl Adc {
    pub fn new() -> Self {
        unsafe {
            let adc = &*ADC::ptr();
            // Enable, prescaler 128
            adc.adcsra.write(|w| w.bits(0x87));
        }
        Self { _private: () }
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Channel<Adc, ID = u8>> OneShot<Adc, u16, C> for Adc {
    type Error = Infallible;

    fn read(&mut self, _pin: &mut C) -> nb::Result<u16, Self::Error> {
        let adc = unsafe { &*ADC::ptr() };

        // A conversion is running; poll until it completes
        if adc.adcsra.read().bits() & 0x40 != 0 {
            return Err(nb::Error::WouldBlock);
        }
        if adc.adcsra.read().bits() & 0x10 != 0 {
            unsafe {
                // ADIF is cleared by writing one
                adc.adcsra.modify(|r, w| w.bits(r.bits() | 0x10));
            }
            return Ok(adc.adc.read().bits());
        }

        unsafe {
            // AVCC reference, right adjusted
            adc.admux.write(|w| w.bits(0x40 | (C::channel() & 0x1F)));
            adc.adcsra.modify(|r, w| w.bits(r.bits() | 0x40));
        }
        Err(nb::Error::WouldBlock)
    }
}
