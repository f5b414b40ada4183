//! Scripted board used by the kernel scenario tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use srxe_kernel::{
    Board, Context, Display, Event, EventHandler, EventKind, Font, HandlerError, Keyboard, Power,
    TimeSource,
};

pub type Trace = Rc<RefCell<Vec<String>>>;

/// Simulated millisecond counter shared by every fake
#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    pub fn now(&self) -> u32 {
        self.0.get()
    }

    pub fn set(&self, ms: u32) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

pub struct FakeDisplay {
    trace: Trace,
    pub lines: Vec<String>,
    pub font: Font,
    pub contrast: i32,
    pub asleep: bool,
}

impl Display for FakeDisplay {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn put_string(&mut self, text: &str, _x: u16, _y: u16) {
        self.lines.push(text.to_string());
    }

    fn font_height(&self) -> u16 {
        8
    }

    fn font_width(&self) -> u16 {
        6
    }

    fn contrast_up(&mut self) {
        self.contrast += 1;
    }

    fn contrast_down(&mut self) {
        self.contrast -= 1;
    }

    fn sleep(&mut self) {
        self.asleep = true;
        self.trace.borrow_mut().push("display sleep".into());
    }

    fn wake(&mut self) {
        self.asleep = false;
        self.trace.borrow_mut().push("display wake".into());
    }
}

/// Releases each scripted key once the clock reaches its timestamp
pub struct FakeKeyboard {
    clock: SimClock,
    pub script: VecDeque<(u32, u8)>,
}

impl Keyboard for FakeKeyboard {
    fn get_key(&mut self) -> Option<u8> {
        match self.script.front() {
            Some(&(at, code)) if at <= self.clock.now() => {
                self.script.pop_front();
                Some(code)
            }
            _ => None,
        }
    }
}

pub struct FakePower {
    clock: SimClock,
    trace: Trace,
    /// Timestamps of power button presses
    pub button_at: VecDeque<u32>,
    /// Readings handed out one per call, the last one repeats
    pub battery: VecDeque<u16>,
    last_battery: u16,
    /// Time that passes while asleep
    pub sleep_ms: u32,
    pub sleeps: u32,
    /// Unwind out of `sleep`, freezing the kernel mid-suspend
    pub trap_sleep: bool,
}

impl Power for FakePower {
    fn button_pressed(&mut self) -> bool {
        match self.button_at.front() {
            Some(&at) if at <= self.clock.now() => {
                self.button_at.pop_front();
                true
            }
            _ => false,
        }
    }

    fn battery_level(&mut self) -> u16 {
        if let Some(level) = self.battery.pop_front() {
            self.last_battery = level;
        }
        self.last_battery
    }

    fn sleep(&mut self) {
        self.sleeps += 1;
        self.trace.borrow_mut().push("power sleep".into());
        if self.trap_sleep {
            panic!("suspended");
        }
        self.clock.advance(self.sleep_ms);
    }
}

pub struct FakeDelay {
    clock: SimClock,
    pub waited_ms: u32,
}

impl DelayMs<u8> for FakeDelay {
    fn delay_ms(&mut self, ms: u8) {
        self.waited_ms += u32::from(ms);
        self.clock.advance(u32::from(ms));
    }
}

pub struct FakeBoard {
    pub clock: SimClock,
    /// Added to the clock after every read, zero for manual stepping
    pub auto_step: u32,
    pub trace: Trace,
    pub display: FakeDisplay,
    pub keyboard: FakeKeyboard,
    pub power: FakePower,
    pub delay: FakeDelay,
}

impl FakeBoard {
    pub fn new() -> Self {
        let clock = SimClock::default();
        let trace = Trace::default();
        Self {
            auto_step: 0,
            display: FakeDisplay {
                trace: trace.clone(),
                lines: Vec::new(),
                font: Font::Small,
                contrast: 0,
                asleep: false,
            },
            keyboard: FakeKeyboard {
                clock: clock.clone(),
                script: VecDeque::new(),
            },
            power: FakePower {
                clock: clock.clone(),
                trace: trace.clone(),
                button_at: VecDeque::new(),
                battery: VecDeque::new(),
                last_battery: 0,
                sleep_ms: 1000,
                sleeps: 0,
                trap_sleep: false,
            },
            delay: FakeDelay {
                clock: clock.clone(),
                waited_ms: 0,
            },
            clock,
            trace,
        }
    }

    pub fn with_keys(mut self, keys: &[(u32, u8)]) -> Self {
        self.keyboard.script.extend(keys.iter().copied());
        self
    }

    pub fn with_battery(mut self, readings: &[u16]) -> Self {
        self.power.battery.extend(readings.iter().copied());
        self
    }

    pub fn with_button_presses(mut self, at: &[u32]) -> Self {
        self.power.button_at.extend(at.iter().copied());
        self
    }

    pub fn with_auto_step(mut self, step: u32) -> Self {
        self.auto_step = step;
        self
    }
}

impl TimeSource for FakeBoard {
    fn now_ms(&self) -> u32 {
        let now = self.clock.now();
        self.clock.advance(self.auto_step);
        now
    }
}

impl Board for FakeBoard {
    type Display = FakeDisplay;
    type Keyboard = FakeKeyboard;
    type Power = FakePower;
    type Delay = FakeDelay;

    fn display(&mut self) -> &mut FakeDisplay {
        &mut self.display
    }

    fn keyboard(&mut self) -> &mut FakeKeyboard {
        &mut self.keyboard
    }

    fn power(&mut self) -> &mut FakePower {
        &mut self.power
    }

    fn delay(&mut self) -> &mut FakeDelay {
        &mut self.delay
    }

    fn reboot(&mut self) -> ! {
        panic!("reboot requested")
    }
}

/// Handler recording every event, optionally failing on one kind
pub struct Recorder {
    pub events: Rc<RefCell<Vec<Event>>>,
    trace: Trace,
    fail_on: Option<(EventKind, u8)>,
}

impl Recorder {
    pub fn new(trace: &Trace) -> Self {
        Self {
            events: Rc::default(),
            trace: trace.clone(),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, kind: EventKind, code: u8) -> Self {
        self.fail_on = Some((kind, code));
        self
    }
}

impl EventHandler<FakeBoard> for Recorder {
    fn handle(&mut self, event: &Event, _cx: &mut Context<'_, FakeBoard>) -> Result<(), HandlerError> {
        self.events.borrow_mut().push(*event);
        self.trace
            .borrow_mut()
            .push(format!("handle {}", event.kind().name()));

        match self.fail_on {
            Some((kind, code)) if kind == event.kind() => Err(HandlerError::from_code(code).unwrap()),
            _ => Ok(()),
        }
    }
}

pub fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(Event::kind).collect()
}
