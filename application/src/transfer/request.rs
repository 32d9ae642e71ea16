use kernel::interface::notify::NotificationStatus;
use kernel::prelude::entity::{BookingRequest, DestructBookingRequest};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::{BookingDto, IdentityDto};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookingRequestDto {
    pub id: Uuid,
    pub submitter: IdentityDto,
    pub title: String,
    pub venue: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub submitted_at: OffsetDateTime,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub booking_id: Option<Uuid>,
}

impl From<BookingRequest> for BookingRequestDto {
    fn from(value: BookingRequest) -> Self {
        let DestructBookingRequest {
            id,
            submitter,
            title,
            venue,
            span,
            submitted_at,
            status,
            rejection_reason,
            booking_id,
        } = value.into_destruct();
        Self {
            id: id.into(),
            submitter: submitter.into(),
            title: title.into(),
            venue: venue.into(),
            start: span.start(),
            end: span.end(),
            submitted_at,
            status: status.to_string(),
            rejection_reason: rejection_reason.map(String::from),
            booking_id: booking_id.map(Uuid::from),
        }
    }
}

pub struct SubmitBookingRequestDto {
    pub title: String,
    pub venue: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

pub struct ReviseBookingRequestDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub venue: Option<String>,
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

pub struct WithdrawBookingRequestDto {
    pub id: Uuid,
}

pub struct ApproveBookingRequestDto {
    pub id: Uuid,
}

pub struct RejectBookingRequestDto {
    pub id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApprovalDto {
    pub request: BookingRequestDto,
    pub booking: BookingDto,
    /// Other pending requests for an overlapping slot of the same venue.
    pub competing_requests: Vec<Uuid>,
    pub notification: NotificationStatus,
}

#[derive(Debug, Clone)]
pub struct RejectionDto {
    pub request: BookingRequestDto,
    pub notification: NotificationStatus,
}
