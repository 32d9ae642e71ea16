use time::{OffsetDateTime, UtcOffset};

use kernel::interface::clock::Clock;

pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn display_offset(&self) -> UtcOffset {
        self.offset
    }
}
