//! Event kernel for the SMART Response XE
//!
//! Turns polled hardware state (keys, battery, power button, a millisecond
//! tick) into an ordered stream of events for a single application handler,
//! with sleep/wake and the panic screen folded into the same loop.
//!
//! ```text
//! Timer2 ISR ──▶ clock ──▶ pollers ──▶ queue ──▶ dispatcher ──▶ handler
//!                                   (sleep/wake)       └──▶ panic screen
//! ```
#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch, abi_avr_interrupt))]

#[macro_use]
pub mod logger;

pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod event;
#[cfg(target_arch = "avr")]
pub mod hal;
pub mod kernel;
pub mod queue;

pub use clock::{TimeSource, CLOCK};
pub use config::KernelConfig;
pub use drivers::{Board, Display, Font, Keyboard, Power};
pub use error::{HandlerError, KernelError, QueueError, Result};
pub use event::{Event, EventKind, SleepReason};
pub use kernel::{Context, EventHandler, Kernel, PanicOutcome, PowerState, Severity};
pub use queue::{BoundedQueue, OverflowPolicy};
