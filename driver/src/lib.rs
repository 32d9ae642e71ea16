use kernel::KernelError;

use crate::error::ConvertError;

pub mod clock;
pub mod database;
pub mod error;
pub mod feed;
pub mod identity;
pub mod mail;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .convert_error()
        .map_err(|report| report.attach_printable(format!("Missing environment variable {key}")))
}

/// Like [`env`], but an unset or empty variable is `None`.
pub(crate) fn env_opt(key: &str) -> Option<String> {
    dotenvy::var(key).ok().filter(|value| !value.trim().is_empty())
}
