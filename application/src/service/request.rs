use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::notify::DependOnNotifier;
use kernel::interface::query::{
    BookingRequestQuery, DependOnBookingQuery, DependOnBookingRequestQuery, DependOnVenueQuery,
    VenueQuery,
};
use kernel::interface::update::{
    BookingModifier, BookingRequestModifier, DependOnBookingModifier,
    DependOnBookingRequestModifier,
};
use kernel::prelude::entity::{
    Booking, BookingId, BookingRequest, BookingTitle, Principal, RejectionReason, RequestId,
    TimeSpan, VenueName,
};
use kernel::{fail, KernelError};
use uuid::Uuid;

use crate::service::booking::ensure_admissible;
use crate::service::notify::notify_submitter;
use crate::transfer::{
    ApprovalDto, ApproveBookingRequestDto, BookingDto, BookingRequestDto, RejectBookingRequestDto,
    RejectionDto, ReviseBookingRequestDto, SubmitBookingRequestDto, WithdrawBookingRequestDto,
};

fn not_found() -> error_stack::Report<KernelError> {
    fail(KernelError::NotFound, "Booking request not found")
}

#[async_trait::async_trait]
pub trait SubmitBookingRequestService:
    'static + Sync + Send + DependOnVenueQuery + DependOnBookingRequestModifier + DependOnClock
{
    /// Records a pending request. Overlaps with existing bookings are not checked here;
    /// the reviewer sees them at approval time.
    async fn submit_booking_request(
        &self,
        principal: &Principal,
        dto: SubmitBookingRequestDto,
    ) -> error_stack::Result<BookingRequestDto, KernelError> {
        let request = BookingRequest::submit(
            principal.identity().clone(),
            BookingTitle::parse(&dto.title)?,
            VenueName::new(dto.venue),
            TimeSpan::new(dto.start, dto.end)?,
            self.clock().now(),
        );

        let mut connection = self.database_connection().transact().await?;
        self.venue_query()
            .find_by_name(&mut connection, request.venue())
            .await?
            .ok_or_else(|| {
                fail(
                    KernelError::Validation,
                    format!("Unknown venue: {}", request.venue().as_ref()),
                )
            })?;
        self.booking_request_modifier()
            .create(&mut connection, &request)
            .await?;
        connection.commit().await?;

        tracing::info!(
            "Booking request {} submitted by {}",
            request.id().as_ref(),
            principal.id().as_ref()
        );
        Ok(BookingRequestDto::from(request))
    }
}

impl<T> SubmitBookingRequestService for T where
    T: DependOnVenueQuery + DependOnBookingRequestModifier + DependOnClock
{
}

#[async_trait::async_trait]
pub trait GetBookingRequestService: 'static + Sync + Send + DependOnBookingRequestQuery {
    async fn get_booking_requests(
        &self,
        principal: &Principal,
    ) -> error_stack::Result<Vec<BookingRequestDto>, KernelError> {
        principal.ensure_admin()?;
        let mut connection = self.database_connection().transact().await?;
        let requests = self
            .booking_request_query()
            .find_all(&mut connection)
            .await?;
        Ok(requests.into_iter().map(BookingRequestDto::from).collect())
    }

    async fn get_own_booking_requests(
        &self,
        principal: &Principal,
    ) -> error_stack::Result<Vec<BookingRequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let requests = self
            .booking_request_query()
            .find_by_submitter(&mut connection, principal.id())
            .await?;
        Ok(requests.into_iter().map(BookingRequestDto::from).collect())
    }
}

impl<T> GetBookingRequestService for T where T: DependOnBookingRequestQuery {}

#[async_trait::async_trait]
pub trait ReviseBookingRequestService:
    'static
    + Sync
    + Send
    + DependOnVenueQuery
    + DependOnBookingRequestQuery
    + DependOnBookingRequestModifier
{
    async fn revise_booking_request(
        &self,
        principal: &Principal,
        dto: ReviseBookingRequestDto,
    ) -> error_stack::Result<BookingRequestDto, KernelError> {
        let title = dto.title.map(BookingTitle::parse).transpose()?;
        let venue = dto.venue.map(VenueName::new);

        let mut connection = self.database_connection().transact().await?;
        let current = self
            .booking_request_query()
            .find_by_id(&mut connection, &RequestId::new(dto.id))
            .await?
            .ok_or_else(not_found)?;
        principal.ensure_owner_or_admin(Some(current.submitter().id()))?;

        if let Some(venue) = &venue {
            self.venue_query()
                .find_by_name(&mut connection, venue)
                .await?
                .ok_or_else(|| {
                    fail(
                        KernelError::Validation,
                        format!("Unknown venue: {}", venue.as_ref()),
                    )
                })?;
        }
        let span = match (dto.start, dto.end) {
            (None, None) => None,
            (start, end) => Some(current.span().with(start, end)?),
        };
        let revised = current.revise(title, venue, span)?;

        self.booking_request_modifier()
            .update(&mut connection, &revised)
            .await?;
        connection.commit().await?;

        tracing::info!("Booking request {} revised", revised.id().as_ref());
        Ok(BookingRequestDto::from(revised))
    }
}

impl<T> ReviseBookingRequestService for T where
    T: DependOnVenueQuery + DependOnBookingRequestQuery + DependOnBookingRequestModifier
{
}

#[async_trait::async_trait]
pub trait WithdrawBookingRequestService:
    'static + Sync + Send + DependOnBookingRequestQuery + DependOnBookingRequestModifier
{
    /// Removes a request that has not been decided yet.
    async fn withdraw_booking_request(
        &self,
        principal: &Principal,
        dto: WithdrawBookingRequestDto,
    ) -> error_stack::Result<(), KernelError> {
        let id = RequestId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let current = self
            .booking_request_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(not_found)?;
        principal.ensure_owner_or_admin(Some(current.submitter().id()))?;
        current.ensure_pending()?;

        self.booking_request_modifier()
            .delete(&mut connection, &id)
            .await?;
        connection.commit().await?;

        tracing::info!("Booking request {} withdrawn", id.as_ref());
        Ok(())
    }
}

impl<T> WithdrawBookingRequestService for T where
    T: DependOnBookingRequestQuery + DependOnBookingRequestModifier
{
}

#[async_trait::async_trait]
pub trait ReviewBookingRequestService:
    'static
    + Sync
    + Send
    + DependOnVenueQuery
    + DependOnBookingQuery
    + DependOnBookingModifier
    + DependOnBookingRequestQuery
    + DependOnBookingRequestModifier
    + DependOnNotifier
    + DependOnClock
{
    /// Turns a pending request into a booking.
    ///
    /// The booking and the status change commit together; a conflicting booking leaves
    /// the request pending. The submitter is notified after commit.
    async fn approve_booking_request(
        &self,
        principal: &Principal,
        dto: ApproveBookingRequestDto,
    ) -> error_stack::Result<ApprovalDto, KernelError> {
        principal.ensure_admin()?;

        let mut connection = self.database_connection().transact().await?;
        let request = self
            .booking_request_query()
            .find_by_id(&mut connection, &RequestId::new(dto.id))
            .await?
            .ok_or_else(not_found)?;
        request.ensure_pending()?;

        let booking = Booking::new(
            BookingId::generate(),
            request.title().clone(),
            request.venue().clone(),
            *request.span(),
            Some(request.submitter().clone()),
        );
        ensure_admissible(self, &mut connection, &booking).await?;
        self.booking_modifier()
            .create(&mut connection, &booking)
            .await?;

        let approved = request.approve(*booking.id())?;
        self.booking_request_modifier()
            .update(&mut connection, &approved)
            .await?;

        let competing_requests = self
            .booking_request_query()
            .find_pending_by_venue(&mut connection, approved.venue())
            .await?
            .into_iter()
            .filter(|other| other.id() != approved.id())
            .filter(|other| other.span().overlaps(approved.span()))
            .map(|other| Uuid::from(*other.id()))
            .collect::<Vec<_>>();
        connection.commit().await?;

        tracing::info!(
            "Booking request {} approved as booking {}",
            approved.id().as_ref(),
            booking.id().as_ref()
        );
        if !competing_requests.is_empty() {
            tracing::info!(
                "{} pending request(s) now overlap booking {}",
                competing_requests.len(),
                booking.id().as_ref()
            );
        }

        let notification = notify_submitter(self, &approved).await;
        Ok(ApprovalDto {
            request: approved.into(),
            booking: BookingDto::from(booking),
            competing_requests,
            notification,
        })
    }

    async fn reject_booking_request(
        &self,
        principal: &Principal,
        dto: RejectBookingRequestDto,
    ) -> error_stack::Result<RejectionDto, KernelError> {
        principal.ensure_admin()?;
        let reason = dto
            .reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty())
            .map(RejectionReason::new);

        let mut connection = self.database_connection().transact().await?;
        let request = self
            .booking_request_query()
            .find_by_id(&mut connection, &RequestId::new(dto.id))
            .await?
            .ok_or_else(not_found)?;

        let rejected = request.reject(reason)?;
        self.booking_request_modifier()
            .update(&mut connection, &rejected)
            .await?;
        connection.commit().await?;

        tracing::info!("Booking request {} rejected", rejected.id().as_ref());

        let notification = notify_submitter(self, &rejected).await;
        Ok(RejectionDto {
            request: rejected.into(),
            notification,
        })
    }
}

impl<T> ReviewBookingRequestService for T where
    T: DependOnVenueQuery
        + DependOnBookingQuery
        + DependOnBookingModifier
        + DependOnBookingRequestQuery
        + DependOnBookingRequestModifier
        + DependOnNotifier
        + DependOnClock
{
}
