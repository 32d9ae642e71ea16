use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    InsufficientQuantity,
    InvalidTransition,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Unauthorized => write!(f, "Authentication required"),
            KernelError::Forbidden => write!(f, "Operation not permitted"),
            KernelError::NotFound => write!(f, "Resource not found"),
            KernelError::Conflict => write!(f, "Booking conflict detected"),
            KernelError::InsufficientQuantity => write!(f, "Insufficient quantity available"),
            KernelError::InvalidTransition => write!(f, "Operation not allowed in current state"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

/// Human readable explanation attached to a report, surfaced to API callers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Detail(String);

impl Detail {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl AsRef<str> for Detail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for a report carrying a [`Detail`].
pub fn fail(error: KernelError, detail: impl Into<String>) -> error_stack::Report<KernelError> {
    error_stack::Report::new(error).attach_printable(Detail::new(detail))
}
