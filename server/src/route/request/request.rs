use crate::controller::{Intake, TryIntake};
use application::transfer::{
    ApproveBookingRequestDto, RejectBookingRequestDto, ReviseBookingRequestDto,
    SubmitBookingRequestDto, WithdrawBookingRequestDto,
};
use error_stack::Report;
use kernel::{fail, KernelError};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    title: String,
    venue: String,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    id: Uuid,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
    #[serde(default)]
    status: Option<Decision>,
    #[serde(default)]
    rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    id: Uuid,
}

pub enum Review {
    Revise(ReviseBookingRequestDto),
    Approve(ApproveBookingRequestDto),
    Reject(RejectBookingRequestDto),
}

pub struct Transformer;

impl Intake<SubmitRequest> for Transformer {
    type To = SubmitBookingRequestDto;
    fn emit(
        &self,
        SubmitRequest {
            title,
            venue,
            start,
            end,
        }: SubmitRequest,
    ) -> Self::To {
        SubmitBookingRequestDto {
            title,
            venue,
            start,
            end,
        }
    }
}

impl Intake<WithdrawRequest> for Transformer {
    type To = WithdrawBookingRequestDto;
    fn emit(&self, WithdrawRequest { id }: WithdrawRequest) -> Self::To {
        WithdrawBookingRequestDto { id }
    }
}

/// Splits an update body into a revision or a decision; the two never mix.
pub struct ReviewTransformer;

impl TryIntake<ReviewRequest> for ReviewTransformer {
    type To = Review;
    type Error = Report<KernelError>;
    fn emit(
        &self,
        ReviewRequest {
            id,
            title,
            venue,
            start,
            end,
            status,
            rejection_reason,
        }: ReviewRequest,
    ) -> Result<Self::To, Self::Error> {
        let edits = title.is_some() || venue.is_some() || start.is_some() || end.is_some();
        match status {
            Some(_) if edits => Err(fail(
                KernelError::Validation,
                "A decision cannot be combined with edits",
            )),
            Some(Decision::Approved) if rejection_reason.is_some() => Err(fail(
                KernelError::Validation,
                "rejection_reason only applies to rejections",
            )),
            Some(Decision::Approved) => Ok(Review::Approve(ApproveBookingRequestDto { id })),
            Some(Decision::Rejected) => Ok(Review::Reject(RejectBookingRequestDto {
                id,
                reason: rejection_reason,
            })),
            None if rejection_reason.is_some() => Err(fail(
                KernelError::Validation,
                "rejection_reason requires status \"rejected\"",
            )),
            None => Ok(Review::Revise(ReviseBookingRequestDto {
                id,
                title,
                venue,
                start,
                end,
            })),
        }
    }
}
