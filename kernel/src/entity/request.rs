mod id;
mod reason;
mod status;

pub use self::{id::*, reason::*, status::*};
use crate::entity::{BookingId, BookingTitle, Identity, TimeSpan, VenueName};
use crate::{fail, KernelError};
use destructure::{Destructure, Mutation};
use error_stack::Report;
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct BookingRequest {
    id: RequestId,
    submitter: Identity,
    title: BookingTitle,
    venue: VenueName,
    span: TimeSpan,
    submitted_at: OffsetDateTime,
    status: RequestStatus,
    rejection_reason: Option<RejectionReason>,
    booking_id: Option<BookingId>,
}

impl BookingRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RequestId,
        submitter: Identity,
        title: BookingTitle,
        venue: VenueName,
        span: TimeSpan,
        submitted_at: OffsetDateTime,
        status: RequestStatus,
        rejection_reason: Option<RejectionReason>,
        booking_id: Option<BookingId>,
    ) -> Self {
        Self {
            id,
            submitter,
            title,
            venue,
            span,
            submitted_at,
            status,
            rejection_reason,
            booking_id,
        }
    }

    pub fn submit(
        submitter: Identity,
        title: BookingTitle,
        venue: VenueName,
        span: TimeSpan,
        submitted_at: OffsetDateTime,
    ) -> Self {
        Self::new(
            RequestId::generate(),
            submitter,
            title,
            venue,
            span,
            submitted_at,
            RequestStatus::PendingApproval,
            None,
            None,
        )
    }

    pub fn ensure_pending(&self) -> Result<(), Report<KernelError>> {
        if self.status.is_terminal() {
            Err(fail(
                KernelError::InvalidTransition,
                format!("Booking request is already {}", self.status),
            ))
        } else {
            Ok(())
        }
    }

    /// Edits requested fields of a pending request.
    pub fn revise(
        self,
        title: Option<BookingTitle>,
        venue: Option<VenueName>,
        span: Option<TimeSpan>,
    ) -> Result<Self, Report<KernelError>> {
        self.ensure_pending()?;
        Ok(self.reconstruct(|request| {
            if let Some(title) = title {
                request.title = title;
            }
            if let Some(venue) = venue {
                request.venue = venue;
            }
            if let Some(span) = span {
                request.span = span;
            }
        }))
    }

    pub fn approve(mut self, booking_id: BookingId) -> Result<Self, Report<KernelError>> {
        self.ensure_pending()?;
        self.substitute(|request| {
            *request.status = RequestStatus::Approved;
            *request.booking_id = Some(booking_id);
        });
        Ok(self)
    }

    pub fn reject(mut self, reason: Option<RejectionReason>) -> Result<Self, Report<KernelError>> {
        self.ensure_pending()?;
        self.substitute(|request| {
            *request.status = RequestStatus::Rejected;
            *request.rejection_reason = reason;
        });
        Ok(self)
    }
}
