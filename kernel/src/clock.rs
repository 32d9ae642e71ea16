use time::{OffsetDateTime, UtcOffset};

pub trait Clock: 'static + Sync + Send {
    fn now(&self) -> OffsetDateTime;
    /// Offset every client-facing time is rendered in.
    fn display_offset(&self) -> UtcOffset;
}

pub trait DependOnClock: 'static + Sync + Send {
    type Clock: Clock;
    fn clock(&self) -> &Self::Clock;
}
