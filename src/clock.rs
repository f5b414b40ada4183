//! A 1 millisecond reference timer
//!
//! The Timer2 compare interrupt fires at 10 kHz; every tenth interrupt the
//! millisecond counter advances. The counter is the only datum written from
//! interrupt context, so reads go through a critical section to avoid torn
//! 32-bit reads on the 8-bit core.

use core::cell::Cell;
use critical_section::Mutex;
use embedded_hal::blocking::delay::DelayMs;

use crate::config::INTERRUPTS_PER_MILLIS;

/// Read access to a millisecond timebase
pub trait TimeSource {
    fn now_ms(&self) -> u32;
}

/// Interrupt-driven millisecond counter
pub struct Clock {
    ticks: Mutex<Cell<u8>>,
    millis: Mutex<Cell<u32>>,
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            ticks: Mutex::new(Cell::new(0)),
            millis: Mutex::new(Cell::new(0)),
        }
    }

    /// Called from the timer interrupt only
    #[inline]
    #[cfg_attr(not(any(test, target_arch = "avr")), allow(dead_code))]
    pub(crate) fn tick(&self) {
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            let count = ticks.get().wrapping_add(1);
            if count >= INTERRUPTS_PER_MILLIS {
                ticks.set(0);
                let millis = self.millis.borrow(cs);
                millis.set(millis.get().wrapping_add(1));
            } else {
                ticks.set(count);
            }
        });
    }

    /// Milliseconds since the timer was started, wrapping at `u32::MAX`
    #[inline]
    pub fn now_ms(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }
}

impl TimeSource for Clock {
    fn now_ms(&self) -> u32 {
        Clock::now_ms(self)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Global timebase, advanced by the Timer2 compare interrupt
pub static CLOCK: Clock = Clock::new();

/// True once `now` has reached `due`, tolerating counter wraparound
#[inline]
pub const fn deadline_reached(now: u32, due: u32) -> bool {
    (now.wrapping_sub(due) as i32) >= 0
}

/// Milliseconds elapsed from `since` to `now`
#[inline]
pub const fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Busy-wait for `duration` milliseconds, one millisecond at a time.
///
/// Lets the duration be chosen at runtime while the underlying primitive
/// only ever waits a fixed 1 ms.
pub fn delay_ms<D: DelayMs<u8>>(delay: &mut D, duration: u32) {
    for _ in 0..duration {
        delay.delay_ms(1);
    }
}
