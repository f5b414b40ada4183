//! The single application event handler and what it may touch

use crate::drivers::Board;
use crate::error::{HandlerError, KernelError, Result};
use crate::event::Event;
use crate::kernel::panic::{self, PanicOutcome, PanicReport, Severity};
use crate::kernel::poller::RefreshTimer;

/// Application callback invoked once per dispatched event.
///
/// Runs synchronously on the kernel loop; while it runs nothing is polled,
/// so it must return promptly. Returning an error halts the device on the
/// panic screen.
pub trait EventHandler<B: Board> {
    fn handle(&mut self, event: &Event, cx: &mut Context<'_, B>) -> core::result::Result<(), HandlerError>;
}

/// Kernel services available from inside the handler
pub struct Context<'k, B: Board> {
    pub(crate) board: &'k mut B,
    pub(crate) refresh: &'k mut RefreshTimer,
    pub(crate) last_key: u8,
    pub(crate) panic_count: &'k mut u32,
    pub(crate) fault: &'k mut Option<KernelError>,
}

impl<'k, B: Board> Context<'k, B> {
    pub fn board(&mut self) -> &mut B {
        &mut *self.board
    }

    pub fn display(&mut self) -> &mut B::Display {
        self.board.display()
    }

    pub fn now_ms(&self) -> u32 {
        self.board.now_ms()
    }

    pub fn last_pressed_key(&self) -> u8 {
        self.last_key
    }

    /// Arms the refresh timer, zero disables it
    pub fn set_refresh_timer(&mut self, interval_ms: u32) {
        let now = self.board.now_ms();
        self.refresh.set(interval_ms, now);
    }

    /// Raises a kernel panic from application code.
    ///
    /// A recoverable panic shows its screen at once and returns `Resume`
    /// after the operator presses a key. A halting panic is raised as a
    /// kernel fault as soon as the handler returns and yields `None` here;
    /// the handler should return promptly.
    pub fn kernel_panic(&mut self, message: &'static str, code: i16, halt: bool) -> Option<PanicOutcome> {
        self.raise(panic::KERNEL_SENDER, message, code, halt)
    }

    /// Like [`Context::kernel_panic`], but a no-op without the `debug` feature
    pub fn debug_panic(&mut self, message: &'static str, code: i16, halt: bool) -> Option<PanicOutcome> {
        if cfg!(feature = "debug") {
            self.raise(panic::DEBUG_SENDER, message, code, halt)
        } else {
            None
        }
    }

    fn raise(&mut self, sender: &'static str, message: &'static str, code: i16, halt: bool) -> Option<PanicOutcome> {
        if halt {
            *self.fault = Some(KernelError::Explicit { message, code });
            return None;
        }

        let report = PanicReport {
            sender,
            message,
            code,
            severity: Severity::Recoverable,
        };
        Some(panic::raise(&mut *self.board, &mut *self.panic_count, &report))
    }
}

/// Holds at most one handler; the first registration wins
pub struct HandlerSlot<'h, B: Board> {
    handler: Option<&'h mut dyn EventHandler<B>>,
}

impl<'h, B: Board> HandlerSlot<'h, B> {
    pub const fn new() -> Self {
        Self { handler: None }
    }

    pub fn register(&mut self, handler: &'h mut dyn EventHandler<B>) -> Result<()> {
        if self.handler.is_some() {
            return Err(KernelError::HandlerAlreadyRegistered);
        }
        self.handler = Some(handler);
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.handler.is_some()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn EventHandler<B> + 'h)> {
        self.handler.as_deref_mut()
    }
}

impl<'h, B: Board> Default for HandlerSlot<'h, B> {
    fn default() -> Self {
        Self::new()
    }
}
