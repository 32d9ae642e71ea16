use crate::controller::Exhaust;
use crate::route::booking::BookingResponse;
use crate::route::{local, IdentityResponse};
use application::transfer::{ApprovalDto, BookingRequestDto, RejectionDto};
use axum::http::StatusCode;
use axum::Json;
use kernel::interface::notify::NotificationStatus;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct BookingRequestResponse {
    id: Uuid,
    submitter: IdentityResponse,
    title: String,
    venue: String,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    submitted_at: OffsetDateTime,
    status: String,
    rejection_reason: Option<String>,
    booking_id: Option<Uuid>,
}

impl BookingRequestResponse {
    fn new(dto: BookingRequestDto, offset: UtcOffset) -> Self {
        Self {
            id: dto.id,
            submitter: dto.submitter.into(),
            title: dto.title,
            venue: dto.venue,
            start: local(dto.start, offset),
            end: local(dto.end, offset),
            submitted_at: local(dto.submitted_at, offset),
            status: dto.status,
            rejection_reason: dto.rejection_reason,
            booking_id: dto.booking_id,
        }
    }
}

pub enum Reviewed {
    Revised(BookingRequestDto),
    Approved(ApprovalDto),
    Rejected(RejectionDto),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReviewResponse {
    Revised(BookingRequestResponse),
    Approved {
        request: BookingRequestResponse,
        booking: BookingResponse,
        competing_requests: Vec<Uuid>,
        notification: NotificationStatus,
    },
    Rejected {
        request: BookingRequestResponse,
        notification: NotificationStatus,
    },
}

pub struct Presenter(pub UtcOffset);

impl Exhaust<Vec<BookingRequestDto>> for Presenter {
    type To = Json<Vec<BookingRequestResponse>>;
    fn emit(&self, input: Vec<BookingRequestDto>) -> Self::To {
        Json(
            input
                .into_iter()
                .map(|dto| BookingRequestResponse::new(dto, self.0))
                .collect(),
        )
    }
}

impl Exhaust<BookingRequestDto> for Presenter {
    type To = Json<BookingRequestResponse>;
    fn emit(&self, input: BookingRequestDto) -> Self::To {
        Json(BookingRequestResponse::new(input, self.0))
    }
}

impl Exhaust<Reviewed> for Presenter {
    type To = Json<ReviewResponse>;
    fn emit(&self, input: Reviewed) -> Self::To {
        Json(match input {
            Reviewed::Revised(dto) => {
                ReviewResponse::Revised(BookingRequestResponse::new(dto, self.0))
            }
            Reviewed::Approved(ApprovalDto {
                request,
                booking,
                competing_requests,
                notification,
            }) => ReviewResponse::Approved {
                request: BookingRequestResponse::new(request, self.0),
                booking: BookingResponse::new(booking, self.0),
                competing_requests,
                notification,
            },
            Reviewed::Rejected(RejectionDto {
                request,
                notification,
            }) => ReviewResponse::Rejected {
                request: BookingRequestResponse::new(request, self.0),
                notification,
            },
        })
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::OK
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use application::transfer::IdentityDto;
    use time::macros::{datetime, offset};

    fn request() -> BookingRequestDto {
        BookingRequestDto {
            id: Uuid::new_v4(),
            submitter: IdentityDto {
                id: "alice".to_string(),
                name: Some("Alice".to_string()),
                email: None,
            },
            title: "Workshop".to_string(),
            venue: "Synergy Space".to_string(),
            start: datetime!(2024-05-02 01:00 UTC),
            end: datetime!(2024-05-02 03:00 UTC),
            submitted_at: datetime!(2024-04-30 12:00 UTC),
            status: "rejected".to_string(),
            rejection_reason: Some("Closed".to_string()),
            booking_id: None,
        }
    }

    #[test]
    fn rejection_reports_notification_status() {
        let Json(response) = Presenter(offset!(+8)).emit(Reviewed::Rejected(RejectionDto {
            request: request(),
            notification: NotificationStatus::Skipped,
        }));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["notification"], "skipped");
        assert_eq!(json["request"]["status"], "rejected");
        assert_eq!(json["request"]["submitted_at"], "2024-04-30T20:00:00+08:00");
        assert_eq!(json["request"]["submitter"]["id"], "alice");
    }
}
