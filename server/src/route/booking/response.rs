use crate::controller::Exhaust;
use crate::route::{local, IdentityResponse};
use application::transfer::{BookingDto, BookingsByVenueDto, DisplayEventDto};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    id: Uuid,
    title: String,
    venue: String,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
    creator: Option<IdentityResponse>,
}

impl BookingResponse {
    pub fn new(dto: BookingDto, offset: UtcOffset) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            venue: dto.venue,
            start: local(dto.start, offset),
            end: local(dto.end, offset),
            creator: dto.creator.map(IdentityResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DisplayEventResponse {
    id: Uuid,
    title: String,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
    venue: String,
    color: String,
    booking: BookingResponse,
}

pub struct Presenter(pub UtcOffset);

impl Exhaust<Vec<BookingDto>> for Presenter {
    type To = Json<Vec<BookingResponse>>;
    fn emit(&self, input: Vec<BookingDto>) -> Self::To {
        Json(
            input
                .into_iter()
                .map(|dto| BookingResponse::new(dto, self.0))
                .collect(),
        )
    }
}

impl Exhaust<BookingsByVenueDto> for Presenter {
    type To = Json<BTreeMap<String, Vec<BookingResponse>>>;
    fn emit(&self, input: BookingsByVenueDto) -> Self::To {
        Json(
            input
                .into_iter()
                .map(|(venue, bookings)| {
                    let bookings = bookings
                        .into_iter()
                        .map(|dto| BookingResponse::new(dto, self.0))
                        .collect();
                    (venue, bookings)
                })
                .collect(),
        )
    }
}

impl Exhaust<Vec<DisplayEventDto>> for Presenter {
    type To = Json<Vec<DisplayEventResponse>>;
    fn emit(&self, input: Vec<DisplayEventDto>) -> Self::To {
        Json(
            input
                .into_iter()
                .map(|event| DisplayEventResponse {
                    id: event.id,
                    title: event.title,
                    start: local(event.start, self.0),
                    end: local(event.end, self.0),
                    venue: event.venue,
                    color: event.color,
                    booking: BookingResponse::new(event.booking, self.0),
                })
                .collect(),
        )
    }
}

impl Exhaust<BookingDto> for Presenter {
    type To = Json<BookingResponse>;
    fn emit(&self, input: BookingDto) -> Self::To {
        Json(BookingResponse::new(input, self.0))
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::OK
    }
}
