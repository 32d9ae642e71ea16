use crate::controller::Intake;
use application::transfer::{CalendarDto, CreateBookingDto, DeleteBookingDto, UpdateBookingDto};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CalendarRequest {
    #[serde(default)]
    venues: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    title: String,
    venue: String,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    id: Uuid,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBookingRequest {
    id: Uuid,
    #[serde(default)]
    venue: Option<String>,
}

pub struct Transformer;

impl Intake<CalendarRequest> for Transformer {
    type To = CalendarDto;
    fn emit(&self, CalendarRequest { venues }: CalendarRequest) -> Self::To {
        CalendarDto { venues }
    }
}

impl Intake<CreateBookingRequest> for Transformer {
    type To = CreateBookingDto;
    fn emit(
        &self,
        CreateBookingRequest {
            title,
            venue,
            start,
            end,
        }: CreateBookingRequest,
    ) -> Self::To {
        CreateBookingDto {
            title,
            venue,
            start,
            end,
        }
    }
}

impl Intake<UpdateBookingRequest> for Transformer {
    type To = UpdateBookingDto;
    fn emit(
        &self,
        UpdateBookingRequest {
            id,
            title,
            venue,
            start,
            end,
        }: UpdateBookingRequest,
    ) -> Self::To {
        UpdateBookingDto {
            id,
            title,
            venue,
            start,
            end,
        }
    }
}

impl Intake<DeleteBookingRequest> for Transformer {
    type To = DeleteBookingDto;
    fn emit(&self, DeleteBookingRequest { id, venue }: DeleteBookingRequest) -> Self::To {
        DeleteBookingDto { id, venue }
    }
}
