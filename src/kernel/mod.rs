//! The event kernel
//!
//! One cooperative loop: the aggregator polls every condition once per pass
//! and turns what it finds into [`Event`]s on a bounded queue, the
//! dispatcher hands them one at a time to the registered handler. Sleep and
//! wake run through the same queue. Any fault ends on the panic screen.
//!
//! Poll order within a pass is fixed: power button, keyboard, battery,
//! inactivity, refresh timer.

pub mod handler;
pub mod panic;
pub mod poller;

pub use handler::{Context, EventHandler, HandlerSlot};
pub use panic::{PanicOutcome, PanicReport, Severity};
pub use poller::{ContrastStep, KeyScan};

use crate::config::{KernelConfig, EVENT_QUEUE_CAPACITY};
use crate::drivers::{Board, Display, Keyboard, Power};
use crate::error::{KernelError, Result};
use crate::event::{Event, SleepReason};
use crate::queue::{BoundedQueue, OverflowPolicy};
use poller::{BatteryMonitor, InactivityMonitor, KeyScanner, RefreshTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Awake,
    Asleep,
}

pub struct Kernel<'h, B: Board, const N: usize = EVENT_QUEUE_CAPACITY> {
    board: B,
    config: KernelConfig,
    queue: BoundedQueue<Event, N>,
    handler: HandlerSlot<'h, B>,
    keyscan: KeyScanner,
    battery: BatteryMonitor,
    inactivity: InactivityMonitor,
    refresh: RefreshTimer,
    power_state: PowerState,
    dropped_events: u32,
    panic_count: u32,
    /// Halting panic requested from inside the handler
    fault: Option<KernelError>,
}

impl<'h, B: Board, const N: usize> Kernel<'h, B, N> {
    pub fn new(board: B, config: KernelConfig) -> Self {
        Self {
            board,
            queue: BoundedQueue::new(),
            handler: HandlerSlot::new(),
            keyscan: KeyScanner::new(&config),
            battery: BatteryMonitor::new(&config),
            inactivity: InactivityMonitor::new(&config),
            refresh: RefreshTimer::new(),
            power_state: PowerState::Awake,
            dropped_events: 0,
            panic_count: 0,
            fault: None,
            config,
        }
    }

    /// Installs the application handler. Only the first call succeeds; later
    /// calls fail and leave the first handler in place.
    pub fn register_event_handler(&mut self, handler: &'h mut dyn EventHandler<B>) -> Result<()> {
        self.handler.register(handler).map_err(|err| {
            warn!("second event handler rejected");
            err
        })
    }

    /// Arms the refresh timer; an interval of zero disables it
    pub fn set_refresh_timer(&mut self, interval_ms: u32) {
        let now = self.board.now_ms();
        self.refresh.set(interval_ms, now);
    }

    pub fn get_last_pressed_key(&self) -> u8 {
        self.keyscan.last_key()
    }

    /// Brings up the collaborators and queues the boot Wakeup event.
    ///
    /// The timebase must already be running.
    pub fn start(&mut self) -> Result<()> {
        self.board.power().init();
        self.board.keyboard().init();
        self.board.display().init();

        let now = self.board.now_ms();
        self.keyscan.arm(now);
        self.battery.arm(now);
        self.inactivity.touch(now);
        self.power_state = PowerState::Awake;

        info!("kernel started at {}ms, queue capacity {}", now, N);
        self.post(Event::wakeup())
    }

    /// One aggregation pass over every condition
    pub fn poll(&mut self) -> Result<()> {
        if self.board.power().button_pressed() {
            self.enter_sleep(SleepReason::PowerButton)?;
        }

        let now = self.board.now_ms();
        match self.keyscan.poll(now, self.board.keyboard()) {
            KeyScan::Idle => {}
            KeyScan::Contrast(step) => {
                self.inactivity.touch(now);
                match step {
                    ContrastStep::Up => self.board.display().contrast_up(),
                    ContrastStep::Down => self.board.display().contrast_down(),
                }
            }
            KeyScan::Pressed(code) => {
                self.inactivity.touch(now);
                self.post(Event::key_press(code))?;
            }
        }

        if let Some(level) = self.battery.poll(now, self.board.power()) {
            self.post(Event::battery_change(level))?;
        }

        if self.inactivity.poll(now) {
            self.enter_sleep(SleepReason::Inactivity)?;
        }

        let now = self.board.now_ms();
        if let Some(count) = self.refresh.poll(now) {
            self.post(Event::timer(count))?;
        }

        Ok(())
    }

    /// Queues an event, applying the configured overflow policy
    pub fn post(&mut self, event: Event) -> Result<()> {
        if self.queue.is_full() {
            match self.config.overflow_policy {
                OverflowPolicy::DropNewest => {
                    self.dropped_events = self.dropped_events.wrapping_add(1);
                    warn!("queue full, dropped {}", event);
                    return Ok(());
                }
                OverflowPolicy::DropOldest => {
                    let oldest = self.queue.dequeue()?;
                    self.dropped_events = self.dropped_events.wrapping_add(1);
                    warn!("queue full, dropped {}", oldest);
                }
                OverflowPolicy::Fault => {
                    error!("queue full at {}", event);
                    return Err(KernelError::QueueOverflow);
                }
            }
        }

        debug!("post {}", event);
        self.queue.enqueue(event)?;
        Ok(())
    }

    /// Polls until an event is pending, then takes it off the queue
    pub fn get_next_message(&mut self) -> Result<Event> {
        while self.queue.is_empty() {
            self.poll()?;
        }
        Ok(self.queue.dequeue()?)
    }

    /// Hands one event to the registered handler
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        let handler = self.handler.get_mut().ok_or(KernelError::NoHandler)?;
        let mut cx = Context {
            board: &mut self.board,
            refresh: &mut self.refresh,
            last_key: self.keyscan.last_key(),
            panic_count: &mut self.panic_count,
            fault: &mut self.fault,
        };

        let result = handler.handle(&event, &mut cx).map_err(|err| {
            error!("handler failed on {} with {}", event, err.code());
            KernelError::HandlerFailed(err)
        });

        // A halting panic requested by the handler wins over its own result
        match self.fault.take() {
            Some(fault) => Err(fault),
            None => result,
        }
    }

    /// Delivers everything pending, oldest first
    fn flush(&mut self) -> Result<()> {
        while !self.queue.is_empty() {
            let event = self.queue.dequeue()?;
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Lets the application see the Sleep event, suspends until woken, then
    /// queues Wakeup. Nothing else is polled meanwhile.
    fn enter_sleep(&mut self, reason: SleepReason) -> Result<()> {
        info!("going to sleep, reason {}", reason as u16);
        self.flush()?;
        self.post(Event::sleep(reason))?;
        self.flush()?;

        self.board.display().sleep();
        self.power_state = PowerState::Asleep;
        self.board.power().sleep();
        self.power_state = PowerState::Awake;
        self.board.display().wake();

        let now = self.board.now_ms();
        self.inactivity.touch(now);
        self.keyscan.arm(now);
        info!("woke up at {}ms", now);
        self.post(Event::wakeup())
    }

    /// One pass of the message pump: fetch, dispatch, and on failure show
    /// the panic screen. Returns the operator's choice when a panic occurred.
    pub fn step(&mut self) -> Option<PanicOutcome> {
        let result = match self.get_next_message() {
            Ok(event) => self.dispatch(event),
            Err(err) => Err(err),
        };

        result
            .err()
            .map(|err| self.kernel_panic(err.message(), err.code(), true))
    }

    /// Shows a kernel panic. `halt` selects the non-recoverable screen.
    pub fn kernel_panic(&mut self, message: &str, code: i16, halt: bool) -> PanicOutcome {
        let severity = if halt {
            Severity::Halt
        } else {
            Severity::Recoverable
        };
        self.raise(panic::KERNEL_SENDER, message, code, severity)
    }

    /// Like [`Kernel::kernel_panic`] but compiled out without the `debug`
    /// feature, in which case it returns `None` at once.
    pub fn debug_panic(&mut self, message: &str, code: i16, halt: bool) -> Option<PanicOutcome> {
        if cfg!(feature = "debug") {
            let severity = if halt {
                Severity::Halt
            } else {
                Severity::Recoverable
            };
            Some(self.raise(panic::DEBUG_SENDER, message, code, severity))
        } else {
            None
        }
    }

    fn raise(&mut self, sender: &str, message: &str, code: i16, severity: Severity) -> PanicOutcome {
        let report = PanicReport {
            sender,
            message,
            code,
            severity,
        };
        panic::raise(&mut self.board, &mut self.panic_count, &report)
    }

    /// Runs the kernel forever. Halting panics reboot the device.
    pub fn run(mut self) -> ! {
        if let Err(err) = self.start() {
            self.kernel_panic(err.message(), err.code(), true);
            self.board.reboot();
        }

        loop {
            match self.step() {
                None | Some(PanicOutcome::Resume) => {}
                Some(PanicOutcome::Reboot) | Some(PanicOutcome::PowerOff) => self.board.reboot(),
            }
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn power_state(&self) -> PowerState {
        self.power_state
    }

    /// Events lost to a full queue so far
    pub fn dropped_events(&self) -> u32 {
        self.dropped_events
    }

    pub fn panic_count(&self) -> u32 {
        self.panic_count
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_registered()
    }
}
