//! Kernel fault taxonomy

use core::num::NonZeroU8;

/// Failure reported by the application event handler.
///
/// Carries the handler's status code, shown verbatim on the panic screen.
/// Zero means success and cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerError(NonZeroU8);

impl HandlerError {
    pub const fn new(code: NonZeroU8) -> Self {
        Self(code)
    }

    /// `None` for a zero status
    pub const fn from_code(code: u8) -> Option<Self> {
        match NonZeroU8::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    pub const fn code(&self) -> u8 {
        self.0.get()
    }
}

/// Errors of the bounded event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Capacity exhausted, the item was not stored
    Full,
    /// Nothing to dequeue
    Empty,
}

/// Conditions the kernel cannot recover from locally.
///
/// Every variant surfaces on the panic screen with a fixed message and a
/// numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    NoHandler,
    HandlerAlreadyRegistered,
    HandlerFailed(HandlerError),
    QueueEmpty,
    QueueOverflow,
    Explicit { message: &'static str, code: i16 },
}

impl KernelError {
    pub const fn code(&self) -> i16 {
        match self {
            KernelError::NoHandler => 1,
            KernelError::HandlerAlreadyRegistered => 2,
            KernelError::HandlerFailed(err) => err.code() as i16,
            KernelError::QueueEmpty => 3,
            KernelError::QueueOverflow => 4,
            KernelError::Explicit { code, .. } => *code,
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            KernelError::NoHandler => "No app event registered",
            KernelError::HandlerAlreadyRegistered => "Event handler already set",
            KernelError::HandlerFailed(_) => "Main exited with code",
            KernelError::QueueEmpty => "Event queue empty",
            KernelError::QueueOverflow => "Event queue overflow",
            KernelError::Explicit { message, .. } => *message,
        }
    }
}

impl From<HandlerError> for KernelError {
    fn from(err: HandlerError) -> Self {
        KernelError::HandlerFailed(err)
    }
}

impl From<QueueError> for KernelError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Full => KernelError::QueueOverflow,
            QueueError::Empty => KernelError::QueueEmpty,
        }
    }
}

pub type Result<T> = core::result::Result<T, KernelError>;
