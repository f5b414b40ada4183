//! Fatal-error screen
//!
//! Clears the display, shows who raised the panic, the message and a
//! numeric code, then waits for the operator. Halting panics end in a
//! reboot or a power-off; recoverable ones resume on any key.

use ufmt::uwrite;

use crate::clock::delay_ms;
use crate::config::PANIC_KEY_POLL_MS;
use crate::drivers::{Board, Display, Font, Keyboard, Power};
use crate::logger::LineBuffer;

pub const KERNEL_SENDER: &str = "Kernel Panic";
pub const DEBUG_SENDER: &str = "Debug Panic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Park the processor until the operator reboots or powers off
    Halt,
    /// Show the message and continue after a key press
    Recoverable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicOutcome {
    Resume,
    Reboot,
    /// Display and power were put to sleep; reboot once woken
    PowerOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicReport<'a> {
    pub sender: &'a str,
    pub message: &'a str,
    pub code: i16,
    pub severity: Severity,
}

/// Counts, logs and presents a panic
pub(crate) fn raise<B: Board>(board: &mut B, panic_count: &mut u32, report: &PanicReport<'_>) -> PanicOutcome {
    *panic_count = panic_count.wrapping_add(1);
    error!("{}: {} ({})", report.sender, report.message, report.code);

    let outcome = present(board, report);
    if outcome == PanicOutcome::Resume {
        info!("resuming after panic");
    }
    outcome
}

/// Renders the report and blocks until the operator decides
pub fn present<B: Board>(board: &mut B, report: &PanicReport<'_>) -> PanicOutcome {
    render(board.display(), report);

    loop {
        if report.severity == Severity::Halt && board.power().button_pressed() {
            board.display().sleep();
            board.power().sleep();
            return PanicOutcome::PowerOff;
        }

        if board.keyboard().get_key().is_some() {
            return match report.severity {
                Severity::Halt => PanicOutcome::Reboot,
                Severity::Recoverable => PanicOutcome::Resume,
            };
        }

        delay_ms(board.delay(), PANIC_KEY_POLL_MS);
    }
}

fn render<D: Display>(display: &mut D, report: &PanicReport<'_>) {
    display.clear();
    display.set_font(Font::Medium);
    let row = display.font_height();

    display.put_string(report.sender, 0, 0);
    display.put_string(report.message, 0, row);

    let mut code = LineBuffer::<8>::new();
    let w = &mut code;
    let _ = uwrite!(w, "{}", report.code);
    display.put_string("Error Code:", 0, row * 2);
    display.put_string(code.as_str(), 0, row * 3);

    match report.severity {
        Severity::Halt => {
            display.put_string("Press power to shutdown", 0, row * 4);
            display.put_string("Press any other key to reboot", 0, row * 5);
        }
        Severity::Recoverable => {
            display.put_string("Press any key to continue", 0, row * 4);
        }
    }
}
