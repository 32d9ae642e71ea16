use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::{fail, KernelError};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookingTitle(String);

impl BookingTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Rejects blank titles and trims surrounding whitespace.
    pub fn parse(title: impl AsRef<str>) -> Result<Self, Report<KernelError>> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(fail(KernelError::Validation, "Title is required"));
        }
        Ok(Self::new(title))
    }
}
