//! Condition pollers run once per kernel loop pass
//!
//! Each poller owns a single "next due" timestamp, so checking it costs the
//! same no matter how fast the loop spins. All comparisons are wrap-safe.

use crate::clock::{deadline_reached, elapsed};
use crate::config::KernelConfig;
use crate::drivers::{Keyboard, Power};

/// Fixed-cadence schedule
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period_ms: u32,
    next_due_ms: u32,
}

impl Interval {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            next_due_ms: 0,
        }
    }

    /// Makes the schedule due at `now_ms`
    pub fn arm(&mut self, now_ms: u32) {
        self.next_due_ms = now_ms;
    }

    /// Returns true when due and re-arms for `now_ms + period`
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if deadline_reached(now_ms, self.next_due_ms) {
            self.next_due_ms = now_ms.wrapping_add(self.period_ms);
            true
        } else {
            false
        }
    }

    pub const fn next_due_ms(&self) -> u32 {
        self.next_due_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastStep {
    Up,
    Down,
}

/// Result of one keyboard scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScan {
    /// Not due or nothing pressed
    Idle,
    /// Contrast key, applied to the display without an event
    Contrast(ContrastStep),
    /// Any other key, becomes a key press event
    Pressed(u8),
}

pub struct KeyScanner {
    interval: Interval,
    contrast_up_key: u8,
    contrast_down_key: u8,
    last_key: u8,
}

impl KeyScanner {
    pub const fn new(config: &KernelConfig) -> Self {
        Self {
            interval: Interval::new(config.keyscan_interval_ms),
            contrast_up_key: config.contrast_up_key,
            contrast_down_key: config.contrast_down_key,
            last_key: 0,
        }
    }

    pub fn arm(&mut self, now_ms: u32) {
        self.interval.arm(now_ms);
    }

    /// Reads the keyboard if a scan is due
    pub fn poll<K: Keyboard>(&mut self, now_ms: u32, keyboard: &mut K) -> KeyScan {
        if !self.interval.poll(now_ms) {
            return KeyScan::Idle;
        }

        let Some(code) = keyboard.get_key() else {
            return KeyScan::Idle;
        };
        self.last_key = code;

        if code == self.contrast_up_key {
            KeyScan::Contrast(ContrastStep::Up)
        } else if code == self.contrast_down_key {
            KeyScan::Contrast(ContrastStep::Down)
        } else {
            KeyScan::Pressed(code)
        }
    }

    /// Code of the most recent key, intercepted keys included
    pub const fn last_key(&self) -> u8 {
        self.last_key
    }
}

/// Emits the battery level whenever it differs from the last reading
pub struct BatteryMonitor {
    interval: Interval,
    last_level: Option<u16>,
}

impl BatteryMonitor {
    pub const fn new(config: &KernelConfig) -> Self {
        Self {
            interval: Interval::new(config.battery_check_interval_ms),
            last_level: None,
        }
    }

    pub fn arm(&mut self, now_ms: u32) {
        self.interval.arm(now_ms);
    }

    /// The first reading only sets the baseline
    pub fn poll<P: Power>(&mut self, now_ms: u32, power: &mut P) -> Option<u16> {
        if !self.interval.poll(now_ms) {
            return None;
        }

        let level = power.battery_level();
        let previous = self.last_level.replace(level);
        match previous {
            Some(previous) if previous != level => Some(level),
            _ => None,
        }
    }

    pub const fn last_level(&self) -> Option<u16> {
        self.last_level
    }
}

/// Tracks the time since the last key press
pub struct InactivityMonitor {
    timeout_ms: u32,
    last_activity_ms: u32,
}

impl InactivityMonitor {
    pub const fn new(config: &KernelConfig) -> Self {
        Self {
            timeout_ms: config.inactivity_timeout_ms,
            last_activity_ms: 0,
        }
    }

    pub fn touch(&mut self, now_ms: u32) {
        self.last_activity_ms = now_ms;
    }

    /// True once the timeout elapsed; the monitor restarts from `now_ms`
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.timeout_ms == 0 || elapsed(now_ms, self.last_activity_ms) < self.timeout_ms {
            return false;
        }
        self.last_activity_ms = now_ms;
        true
    }

    pub const fn last_activity_ms(&self) -> u32 {
        self.last_activity_ms
    }
}

/// Application-armed periodic timer, disabled while the interval is zero
pub struct RefreshTimer {
    interval_ms: u32,
    next_due_ms: u32,
    fired: u16,
}

impl RefreshTimer {
    pub const fn new() -> Self {
        Self {
            interval_ms: 0,
            next_due_ms: 0,
            fired: 0,
        }
    }

    /// Arms the timer; the first expiry is due immediately
    pub fn set(&mut self, interval_ms: u32, now_ms: u32) {
        self.interval_ms = interval_ms;
        self.next_due_ms = now_ms;
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Wrapping count of expiries when the timer fires
    pub fn poll(&mut self, now_ms: u32) -> Option<u16> {
        if self.interval_ms == 0 || !deadline_reached(now_ms, self.next_due_ms) {
            return None;
        }
        self.next_due_ms = now_ms.wrapping_add(self.interval_ms);
        self.fired = self.fired.wrapping_add(1);
        Some(self.fired)
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedKeys(std::vec::Vec<Option<u8>>);

    impl Keyboard for ScriptedKeys {
        fn get_key(&mut self) -> Option<u8> {
            if self.0.is_empty() {
                None
            } else {
                self.0.remove(0)
            }
        }
    }

    struct ScriptedBattery(std::vec::Vec<u16>);

    impl Power for ScriptedBattery {
        fn button_pressed(&mut self) -> bool {
            false
        }

        fn battery_level(&mut self) -> u16 {
            self.0.remove(0)
        }

        fn sleep(&mut self) {}
    }

    #[test]
    fn interval_rearms_from_now() {
        let mut interval = Interval::new(10);
        interval.arm(0);
        assert!(interval.poll(0));
        assert!(!interval.poll(9));
        assert!(interval.poll(13));
        assert_eq!(interval.next_due_ms(), 23);
    }

    #[test]
    fn interval_is_due_across_wraparound() {
        let mut interval = Interval::new(10);
        interval.arm(u32::MAX - 3);
        assert!(interval.poll(u32::MAX - 3));
        assert!(!interval.poll(u32::MAX));
        assert!(interval.poll(6));
    }

    #[test]
    fn keyscan_reads_keyboard_only_when_due() {
        let config = KernelConfig::new();
        let mut scanner = KeyScanner::new(&config);
        let mut keys = ScriptedKeys(std::vec![Some(b'a'), Some(b'b')]);
        scanner.arm(0);

        assert_eq!(scanner.poll(0, &mut keys), KeyScan::Pressed(b'a'));
        assert_eq!(scanner.poll(5, &mut keys), KeyScan::Idle);
        assert_eq!(keys.0.len(), 1);
        assert_eq!(scanner.poll(10, &mut keys), KeyScan::Pressed(b'b'));
        assert_eq!(scanner.last_key(), b'b');
    }

    #[test]
    fn contrast_keys_are_intercepted() {
        let config = KernelConfig::new().with_contrast_keys(1, 2);
        let mut scanner = KeyScanner::new(&config);
        let mut keys = ScriptedKeys(std::vec![Some(1), Some(2)]);
        scanner.arm(0);

        assert_eq!(scanner.poll(0, &mut keys), KeyScan::Contrast(ContrastStep::Up));
        assert_eq!(scanner.poll(10, &mut keys), KeyScan::Contrast(ContrastStep::Down));
        assert_eq!(scanner.last_key(), 2);
    }

    #[test]
    fn battery_reports_only_changes() {
        let config = KernelConfig::new();
        let mut monitor = BatteryMonitor::new(&config);
        let mut battery = ScriptedBattery(std::vec![100, 100, 95, 95, 90]);
        monitor.arm(0);

        let changes: std::vec::Vec<u16> = (0..5u32)
            .filter_map(|second| monitor.poll(second * 1000, &mut battery))
            .collect();

        assert_eq!(changes, [95, 90]);
        assert_eq!(monitor.last_level(), Some(90));
    }

    #[test]
    fn inactivity_fires_once_then_restarts() {
        let config = KernelConfig::new().with_inactivity_timeout(100);
        let mut monitor = InactivityMonitor::new(&config);
        monitor.touch(0);

        assert!(!monitor.poll(99));
        assert!(monitor.poll(100));
        assert!(!monitor.poll(150));
        assert!(monitor.poll(200));
    }

    #[test]
    fn zero_timeout_disables_inactivity() {
        let config = KernelConfig::new().with_inactivity_timeout(0);
        let mut monitor = InactivityMonitor::new(&config);
        assert!(!monitor.poll(u32::MAX / 2));
    }

    #[test]
    fn refresh_timer_counts_expiries() {
        let mut timer = RefreshTimer::new();
        assert_eq!(timer.poll(0), None);

        timer.set(500, 100);
        assert_eq!(timer.poll(100), Some(1));
        assert_eq!(timer.poll(599), None);
        assert_eq!(timer.poll(600), Some(2));

        timer.set(0, 600);
        assert_eq!(timer.poll(5000), None);
    }
}
