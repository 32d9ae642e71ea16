mod booking;
mod feed;
mod item;
mod loan;
mod request;
mod venue;

pub use self::{
    booking::BookingRouter, feed::FeedRouter, item::ItemRouter, loan::LoanRouter,
    request::BookingRequestRouter, venue::VenueRouter,
};

use crate::handler::AppModule;
use application::transfer::IdentityDto;
use kernel::interface::clock::{Clock, DependOnClock};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Serialize)]
pub(crate) struct IdentityResponse {
    id: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<IdentityDto> for IdentityResponse {
    fn from(IdentityDto { id, name, email }: IdentityDto) -> Self {
        Self { id, name, email }
    }
}

pub(crate) fn local(time: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    time.to_offset(offset)
}

pub(crate) fn display_offset(module: &AppModule) -> UtcOffset {
    module.clock().display_offset()
}
