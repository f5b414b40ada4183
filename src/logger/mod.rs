//! Structured logging for the kernel
//!
//! Records are formatted with `ufmt` into a fixed-size line buffer and handed
//! to a single sink installed by the firmware (the serial console on the
//! device, a capture buffer in tests). Nothing is logged until a sink is set.

use core::cell::Cell;
use core::convert::Infallible;
use critical_section::Mutex;
use ufmt::uWrite;

use crate::clock::CLOCK;

/// Longest line a record can carry, longer text is truncated
pub const LINE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub const fn tag(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn => "WRN",
            LogLevel::Info => "INF",
            LogLevel::Debug => "DBG",
        }
    }
}

pub struct Record<'a> {
    pub level: LogLevel,
    pub timestamp_ms: u32,
    pub text: &'a str,
}

pub type Sink = fn(&Record<'_>);

static SINK: Mutex<Cell<Option<Sink>>> = Mutex::new(Cell::new(None));

#[cfg(feature = "debug")]
const DEFAULT_LEVEL: LogLevel = LogLevel::Debug;
#[cfg(not(feature = "debug"))]
const DEFAULT_LEVEL: LogLevel = LogLevel::Info;

static MAX_LEVEL: Mutex<Cell<LogLevel>> = Mutex::new(Cell::new(DEFAULT_LEVEL));

pub fn set_sink(sink: Sink) {
    critical_section::with(|cs| SINK.borrow(cs).set(Some(sink)));
}

pub fn set_max_level(level: LogLevel) {
    critical_section::with(|cs| MAX_LEVEL.borrow(cs).set(level));
}

pub fn max_level() -> LogLevel {
    critical_section::with(|cs| MAX_LEVEL.borrow(cs).get())
}

/// Whether a record at `level` would reach a sink
pub fn enabled(level: LogLevel) -> bool {
    critical_section::with(|cs| {
        SINK.borrow(cs).get().is_some() && level <= MAX_LEVEL.borrow(cs).get()
    })
}

pub fn emit(level: LogLevel, text: &str) {
    // Copy the sink out so it runs with interrupts enabled
    let sink = critical_section::with(|cs| SINK.borrow(cs).get());
    if let Some(sink) = sink {
        sink(&Record {
            level,
            timestamp_ms: CLOCK.now_ms(),
            text,
        });
    }
}

/// Fixed-capacity text buffer implementing `uWrite`.
///
/// Writes past the capacity are dropped at a character boundary, so the
/// content is always valid UTF-8.
pub struct LineBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> uWrite for LineBuffer<N> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        let mut take = s.len().min(N - self.len);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

macro_rules! log {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $crate::logger::enabled(level) {
            let mut line = $crate::logger::LineBuffer::<{ $crate::logger::LINE_CAPACITY }>::new();
            let w = &mut line;
            let _ = ufmt::uwrite!(w, $($arg)+);
            $crate::logger::emit(level, line.as_str());
        }
    }};
}

macro_rules! error {
    ($($arg:tt)+) => { log!($crate::logger::LogLevel::Error, $($arg)+) };
}

macro_rules! warn {
    ($($arg:tt)+) => { log!($crate::logger::LogLevel::Warn, $($arg)+) };
}

macro_rules! info {
    ($($arg:tt)+) => { log!($crate::logger::LogLevel::Info, $($arg)+) };
}

macro_rules! debug {
    ($($arg:tt)+) => { log!($crate::logger::LogLevel::Debug, $($arg)+) };
}
