use std::str::FromStr;

use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookingRequestQuery;
use kernel::interface::update::BookingRequestModifier;
use kernel::prelude::entity::{
    BookingId, BookingRequest, BookingTitle, RejectionReason, RequestId, RequestStatus, TimeSpan,
    UserId, VenueName,
};
use kernel::KernelError;

use crate::database::postgres::{identity, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresBookingRequestRepository;

#[async_trait::async_trait]
impl BookingRequestQuery for PostgresBookingRequestRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        PgBookingRequestInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<BookingRequest>, KernelError> {
        PgBookingRequestInternal::find_by_id(con, id).await
    }

    async fn find_by_submitter(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        PgBookingRequestInternal::find_by_submitter(con, user_id).await
    }

    async fn find_pending_by_venue(
        &self,
        con: &mut PostgresTransaction,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        PgBookingRequestInternal::find_pending_by_venue(con, venue).await
    }
}

#[async_trait::async_trait]
impl BookingRequestModifier for PostgresBookingRequestRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingRequestInternal::create(con, request).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingRequestInternal::update(con, request).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        request_id: &RequestId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingRequestInternal::delete(con, request_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookingRequestRow {
    id: Uuid,
    user_id: String,
    user_name: Option<String>,
    user_email: Option<String>,
    title: String,
    venue: String,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
    submitted_at: OffsetDateTime,
    status: String,
    rejection_reason: Option<String>,
    booking_id: Option<Uuid>,
}

impl TryFrom<BookingRequestRow> for BookingRequest {
    type Error = Report<KernelError>;
    fn try_from(value: BookingRequestRow) -> Result<Self, Self::Error> {
        Ok(BookingRequest::new(
            RequestId::new(value.id),
            identity(value.user_id, value.user_name, value.user_email),
            BookingTitle::new(value.title),
            VenueName::new(value.venue),
            TimeSpan::new(value.start_at, value.end_at)?,
            value.submitted_at,
            RequestStatus::from_str(&value.status)?,
            value.rejection_reason.map(RejectionReason::new),
            value.booking_id.map(BookingId::new),
        ))
    }
}

fn collect(
    rows: Vec<BookingRequestRow>,
) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
    rows.into_iter().map(BookingRequest::try_from).collect()
}

pub(in crate::database) struct PgBookingRequestInternal;

impl PgBookingRequestInternal {
    async fn find_all(
        con: &mut PgConnection,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRequestRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, user_name, user_email, title, venue, start_at, end_at,
                   submitted_at, status, rejection_reason, booking_id
            FROM booking_requests
            ORDER BY submitted_at DESC
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &RequestId,
    ) -> error_stack::Result<Option<BookingRequest>, KernelError> {
        let row = sqlx::query_as::<_, BookingRequestRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, user_name, user_email, title, venue, start_at, end_at,
                   submitted_at, status, rejection_reason, booking_id
            FROM booking_requests
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(BookingRequest::try_from).transpose()
    }

    async fn find_by_submitter(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRequestRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, user_name, user_email, title, venue, start_at, end_at,
                   submitted_at, status, rejection_reason, booking_id
            FROM booking_requests
            WHERE user_id = $1
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_pending_by_venue(
        con: &mut PgConnection,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRequestRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, user_name, user_email, title, venue, start_at, end_at,
                   submitted_at, status, rejection_reason, booking_id
            FROM booking_requests
            WHERE venue = $1 AND status = $2
            ORDER BY submitted_at
            "#,
        )
        .bind(venue.as_ref())
        .bind(RequestStatus::PendingApproval.as_str())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn create(
        con: &mut PgConnection,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError> {
        let submitter = request.submitter();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO booking_requests (id, user_id, user_name, user_email, title, venue,
                                          start_at, end_at, submitted_at, status,
                                          rejection_reason, booking_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(submitter.id().as_ref())
        .bind(submitter.name().as_ref().map(|name| name.as_ref()))
        .bind(submitter.email().as_ref().map(|email| email.as_ref()))
        .bind(request.title().as_ref())
        .bind(request.venue().as_ref())
        .bind(request.span().start())
        .bind(request.span().end())
        .bind(request.submitted_at())
        .bind(request.status().as_str())
        .bind(request.rejection_reason().as_ref().map(|reason| reason.as_ref()))
        .bind(request.booking_id().map(|id| *id.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE booking_requests
            SET title = $2, venue = $3, start_at = $4, end_at = $5, status = $6,
                rejection_reason = $7, booking_id = $8
            WHERE id = $1
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.title().as_ref())
        .bind(request.venue().as_ref())
        .bind(request.span().start())
        .bind(request.span().end())
        .bind(request.status().as_str())
        .bind(request.rejection_reason().as_ref().map(|reason| reason.as_ref()))
        .bind(request.booking_id().map(|id| *id.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &RequestId) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM booking_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
