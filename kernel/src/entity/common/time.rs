use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::{fail, KernelError};

/// Half-open `[start, end)` interval with `start < end`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

impl TimeSpan {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, Report<KernelError>> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(fail(
                KernelError::Validation,
                "End time must be after start time",
            ))
        }
    }

    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        crate::schedule::overlaps(self.start, self.end, other.start, other.end)
    }

    /// Replaces either bound, re-validating the ordering.
    pub fn with(
        &self,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Self, Report<KernelError>> {
        Self::new(start.unwrap_or(self.start), end.unwrap_or(self.end))
    }
}

/// `yyyy-MM-dd HH:mm` in the given display offset.
pub fn format_display(time: OffsetDateTime, offset: UtcOffset) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    time.to_offset(offset)
        .format(&format)
        .unwrap_or_else(|_| time.to_string())
}
