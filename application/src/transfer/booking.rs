use std::collections::BTreeMap;

use kernel::prelude::entity::{Booking, DestructBooking};
use kernel::prelude::schedule::{DestructDisplayEvent, DisplayEvent};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::IdentityDto;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookingDto {
    pub id: Uuid,
    pub title: String,
    pub venue: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub creator: Option<IdentityDto>,
}

impl From<Booking> for BookingDto {
    fn from(value: Booking) -> Self {
        let DestructBooking {
            id,
            title,
            venue,
            span,
            creator,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            venue: venue.into(),
            start: span.start(),
            end: span.end(),
            creator: creator.map(IdentityDto::from),
        }
    }
}

pub type BookingsByVenueDto = BTreeMap<String, Vec<BookingDto>>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DisplayEventDto {
    pub id: Uuid,
    pub title: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub venue: String,
    pub color: String,
    pub booking: BookingDto,
}

impl From<DisplayEvent> for DisplayEventDto {
    fn from(value: DisplayEvent) -> Self {
        let DestructDisplayEvent {
            id,
            title,
            start,
            end,
            venue,
            color,
            booking,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            venue: venue.into(),
            color: color.into(),
            booking: booking.into(),
        }
    }
}

pub struct CalendarDto {
    pub venues: Vec<String>,
}

pub struct CreateBookingDto {
    pub title: String,
    pub venue: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

pub struct UpdateBookingDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub venue: Option<String>,
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

pub struct DeleteBookingDto {
    pub id: Uuid,
    pub venue: Option<String>,
}
