use avr_device::atmega128rfa1::CPU;

use super::gpio;

/// SMCR sleep mode select, bits SM2:0
const SM_MASK: u8 = 0b1110;
const SM_POWER_DOWN: u8 = 0b010 << 1;
/// SMCR sleep enable
const SE: u8 = 1 << 0;

/// Power-down control. The system clock stops, so only the power button
/// interrupt can end the sleep.
pub struct PowerDown {
    _private: (),
}

impl PowerDown {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Halts the core until the power button interrupt (INT2) fires
    pub fn enter(&mut self) {
        let cpu = unsafe { &*CPU::ptr() };

        gpio::enable_wake_interrupt();
        cpu.smcr
            .modify(|r, w| unsafe { w.bits((r.bits() & !SM_MASK) | SM_POWER_DOWN | SE) });
        avr_device::asm::sleep();
        cpu.smcr.modify(|r, w| unsafe { w.bits(r.bits() & !SE) });
        gpio::disable_wake_interrupt();
    }
}

impl Default for PowerDown {
    fn default() -> Self {
        Self::new()
    }
}
