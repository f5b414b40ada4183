//! Configuration constants for the SRXE event kernel

use crate::queue::OverflowPolicy;

/// CPU frequency in Hz, exported by the build script
pub const CPU_FREQ_HZ: u32 = match option_env!("MCU_FREQ_HZ") {
    Some(freq) => parse_hz(freq),
    None => 16_000_000,
};

/// Timebase interrupt rate
pub const TIMER_FREQ_HZ: u32 = 10_000;

/// Timebase interrupts per elapsed millisecond
pub const INTERRUPTS_PER_MILLIS: u8 = (TIMER_FREQ_HZ / 1000) as u8;

/// UART baud rate of the serial console
pub const UART_BAUD: u32 = 9600;

pub const KEYSCAN_INTERVAL_MS: u32 = 10;
pub const BATTERY_CHECK_INTERVAL_MS: u32 = 1000;

/// Ten minutes without a key press puts the device to sleep
pub const INACTIVITY_TIMEOUT_MS: u32 = 600_000;

/// Pending events held between loop passes
pub const EVENT_QUEUE_CAPACITY: usize = 10;

/// Keyboard codes handled by the kernel itself (LCD contrast)
pub const KEY_CONTRAST_UP: u8 = 0xF5;
pub const KEY_CONTRAST_DOWN: u8 = 0xF6;

/// Delay between keyboard reads while a panic screen waits for the operator
pub const PANIC_KEY_POLL_MS: u32 = 10;

const fn parse_hz(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if digit < b'0' || digit > b'9' {
            break;
        }
        value = value * 10 + (digit - b'0') as u32;
        i += 1;
    }
    value
}

/// Runtime tunables of the event kernel.
///
/// The defaults mirror the constants above; tests and alternative boards
/// override individual fields with the `with_*` setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    pub keyscan_interval_ms: u32,
    pub battery_check_interval_ms: u32,
    /// Zero disables the inactivity sleep
    pub inactivity_timeout_ms: u32,
    pub overflow_policy: OverflowPolicy,
    pub contrast_up_key: u8,
    pub contrast_down_key: u8,
}

impl KernelConfig {
    pub const fn new() -> Self {
        Self {
            keyscan_interval_ms: KEYSCAN_INTERVAL_MS,
            battery_check_interval_ms: BATTERY_CHECK_INTERVAL_MS,
            inactivity_timeout_ms: INACTIVITY_TIMEOUT_MS,
            overflow_policy: OverflowPolicy::DropNewest,
            contrast_up_key: KEY_CONTRAST_UP,
            contrast_down_key: KEY_CONTRAST_DOWN,
        }
    }

    pub const fn with_keyscan_interval(mut self, interval_ms: u32) -> Self {
        self.keyscan_interval_ms = interval_ms;
        self
    }

    pub const fn with_battery_check_interval(mut self, interval_ms: u32) -> Self {
        self.battery_check_interval_ms = interval_ms;
        self
    }

    pub const fn with_inactivity_timeout(mut self, timeout_ms: u32) -> Self {
        self.inactivity_timeout_ms = timeout_ms;
        self
    }

    pub const fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    pub const fn with_contrast_keys(mut self, up: u8, down: u8) -> Self {
        self.contrast_up_key = up;
        self.contrast_down_key = down;
        self
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_frequency_comes_from_build_script() {
        assert_eq!(CPU_FREQ_HZ, 16_000_000);
        assert_eq!(parse_hz("2000000"), 2_000_000);
    }

    #[test]
    fn ten_interrupts_make_a_millisecond() {
        assert_eq!(INTERRUPTS_PER_MILLIS, 10);
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = KernelConfig::new()
            .with_inactivity_timeout(0)
            .with_overflow_policy(OverflowPolicy::Fault);

        assert_eq!(config.inactivity_timeout_ms, 0);
        assert_eq!(config.overflow_policy, OverflowPolicy::Fault);
        assert_eq!(config.keyscan_interval_ms, KEYSCAN_INTERVAL_MS);
        assert_eq!(KernelConfig::default(), KernelConfig::new());
    }
}
