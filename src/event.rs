//! Event records delivered to the application handler

use ufmt::{uDisplay, uWrite, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    /// The user pressed a key, the payload is the key code
    KeyPress = 0x01,
    /// The device was woken up from sleep, the app should redraw the screen
    Wakeup = 0x02,
    /// The device is about to go to sleep, the app should save its data
    Sleep = 0x03,
    /// The refresh timer interval has elapsed
    Timer = 0x04,
    /// The battery reading changed, the payload is the new level
    BatteryChange = 0x05,
}

impl EventKind {
    pub const fn name(&self) -> &'static str {
        match self {
            EventKind::KeyPress => "KeyPress",
            EventKind::Wakeup => "Wakeup",
            EventKind::Sleep => "Sleep",
            EventKind::Timer => "Timer",
            EventKind::BatteryChange => "BatteryChange",
        }
    }
}

impl uDisplay for EventKind {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

/// Why the kernel put the device to sleep (payload of [`EventKind::Sleep`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SleepReason {
    PowerButton = 0,
    Inactivity = 1,
}

/// One discrete occurrence queued for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    payload: u16,
}

impl Event {
    pub const fn new(kind: EventKind, payload: u16) -> Self {
        Self { kind, payload }
    }

    pub const fn key_press(code: u8) -> Self {
        Self::new(EventKind::KeyPress, code as u16)
    }

    pub const fn wakeup() -> Self {
        Self::new(EventKind::Wakeup, 0)
    }

    pub const fn sleep(reason: SleepReason) -> Self {
        Self::new(EventKind::Sleep, reason as u16)
    }

    pub const fn timer(count: u16) -> Self {
        Self::new(EventKind::Timer, count)
    }

    pub const fn battery_change(level: u16) -> Self {
        Self::new(EventKind::BatteryChange, level)
    }

    #[inline]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    #[inline]
    pub const fn payload(&self) -> u16 {
        self.payload
    }

    /// Key code of a key press event
    pub const fn key_code(&self) -> Option<u8> {
        match self.kind {
            EventKind::KeyPress => Some(self.payload as u8),
            _ => None,
        }
    }
}

impl uDisplay for Event {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        ufmt::uwrite!(f, "{}({})", self.kind, self.payload)
    }
}
