use avr_device::atmega128rfa1::{TC0, TC2};
use embedded_hal::blocking::delay::DelayMs;

use crate::clock::CLOCK;
use crate::config::{CPU_FREQ_HZ, TIMER_FREQ_HZ};

/// Correction for code execution time inside the ISR, positive values
/// speed the interrupt up. Needs an oscilloscope to calibrate.
const TIMER_INTERVAL_COMPENSATION: u8 = 0;

/// (prescaler bits, compare value) for a 10 kHz compare match
const fn timer2_setup() -> (u8, u8) {
    match CPU_FREQ_HZ {
        // 2 MHz / (1 * 10 kHz) - 1
        2_000_000 => (0b001, (CPU_FREQ_HZ / TIMER_FREQ_HZ - 1) as u8),
        // 16 MHz / (8 * 10 kHz) - 1
        _ => (0b010, (CPU_FREQ_HZ / (8 * TIMER_FREQ_HZ) - 1) as u8),
    }
}

/// Starts Timer2 in CTC mode at 10 kHz and enables its compare interrupt.
///
/// Must run once, before anything reads the clock.
pub fn init_timebase() {
    let (prescaler, compare) = timer2_setup();

    avr_device::interrupt::free(|_| unsafe {
        let tc2 = &*TC2::ptr();
        tc2.tccr2a.write(|w| w.bits(0));
        tc2.tccr2b.write(|w| w.bits(0));
        tc2.tcnt2.write(|w| w.bits(0));
        tc2.ocr2a
            .write(|w| w.bits(compare - TIMER_INTERVAL_COMPENSATION));
        // CTC mode lives in TCCR2A (WGM21), the prescaler in TCCR2B
        tc2.tccr2a.write(|w| w.bits(1 << 1));
        tc2.tccr2b.write(|w| w.bits(prescaler));
        tc2.timsk2.write(|w| w.bits(1 << 1));
    });

    unsafe { avr_device::interrupt::enable() };
}

#[avr_device::interrupt(atmega128rfa1)]
fn TIMER2_COMPA() {
    CLOCK.tick();
}

/// Busy-wait delay on Timer0 (16MHz/64 = 250kHz, 250 counts = 1ms)
pub struct Delay {
    _private: (),
}

impl Delay {
    pub fn new() -> Self {
        unsafe {
            let tc0 = &*TC0::ptr();
            tc0.tccr0a.write(|w| w.bits(0));
            tc0.tccr0b.write(|w| w.bits(0));
        }
        Self { _private: () }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs<u8> for Delay {
    fn delay_ms(&mut self, ms: u8) {
        let counts = (CPU_FREQ_HZ / 64 / 1000) as u8;
        unsafe {
            let tc0 = &*TC0::ptr();
            tc0.tcnt0.write(|w| w.bits(0));
            tc0.tccr0b.write(|w| w.bits(0b011));
            for _ in 0..ms {
                while tc0.tcnt0.read().bits() < counts {}
                tc0.tcnt0.write(|w| w.bits(0));
            }
            tc0.tccr0b.write(|w| w.bits(0));
        }
    }
}

/// Jumps to the reset vector. RAM and peripheral state are not cleared.
pub fn reboot() -> ! {
    avr_device::interrupt::disable();
    unsafe { core::arch::asm!("jmp 0", options(noreturn)) }
}
