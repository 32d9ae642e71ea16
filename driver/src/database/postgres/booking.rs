use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookingQuery;
use kernel::interface::update::BookingModifier;
use kernel::prelude::entity::{Booking, BookingId, BookingTitle, TimeSpan, VenueName};
use kernel::{fail, KernelError};

use crate::database::postgres::{identity, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresBookingRepository;

#[async_trait::async_trait]
impl BookingQuery for PostgresBookingRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_by_id(con, id).await
    }

    async fn find_by_venue(
        &self,
        con: &mut PostgresTransaction,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_by_venue(con, venue).await
    }
}

#[async_trait::async_trait]
impl BookingModifier for PostgresBookingRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::create(con, booking).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::update(con, booking).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        booking_id: &BookingId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::delete(con, booking_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    title: String,
    venue: String,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
    created_by: Option<String>,
    creator_name: Option<String>,
    creator_email: Option<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = Report<KernelError>;
    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let creator = value
            .created_by
            .map(|id| identity(id, value.creator_name, value.creator_email));
        Ok(Booking::new(
            BookingId::new(value.id),
            BookingTitle::new(value.title),
            VenueName::new(value.venue),
            TimeSpan::new(value.start_at, value.end_at)?,
            creator,
        ))
    }
}

fn collect(rows: Vec<BookingRow>) -> error_stack::Result<Vec<Booking>, KernelError> {
    rows.into_iter().map(Booking::try_from).collect()
}

pub(in crate::database) struct PgBookingInternal;

impl PgBookingInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, title, venue, start_at, end_at, created_by, creator_name, creator_email
            FROM bookings
            ORDER BY start_at
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let row = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, title, venue, start_at, end_at, created_by, creator_name, creator_email
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_by_venue(
        con: &mut PgConnection,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, title, venue, start_at, end_at, created_by, creator_name, creator_email
            FROM bookings
            WHERE venue = $1
            ORDER BY start_at
            "#,
        )
        .bind(venue.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn create(con: &mut PgConnection, booking: &Booking) -> error_stack::Result<(), KernelError> {
        let creator = booking.creator().as_ref();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO bookings (id, title, venue, start_at, end_at, created_by, creator_name, creator_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.title().as_ref())
        .bind(booking.venue().as_ref())
        .bind(booking.span().start())
        .bind(booking.span().end())
        .bind(creator.map(|c| c.id().as_ref()))
        .bind(creator.and_then(|c| c.name().as_ref()).map(|n| n.as_ref()))
        .bind(creator.and_then(|c| c.email().as_ref()).map(|e| e.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, booking: &Booking) -> error_stack::Result<(), KernelError> {
        let updated = sqlx::query(
            // language=postgresql
            r#"
            UPDATE bookings
            SET title = $2, venue = $3, start_at = $4, end_at = $5
            WHERE id = $1
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.title().as_ref())
        .bind(booking.venue().as_ref())
        .bind(booking.span().start())
        .bind(booking.span().end())
        .execute(con)
        .await
        .convert_error()?;
        if updated.rows_affected() == 0 {
            return Err(fail(KernelError::NotFound, "Booking not found"));
        }
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &BookingId) -> error_stack::Result<(), KernelError> {
        let deleted = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if deleted.rows_affected() == 0 {
            return Err(fail(KernelError::NotFound, "Booking not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookingQuery;
    use kernel::interface::update::{BookingModifier, VenueModifier};
    use kernel::prelude::entity::{
        Booking, BookingId, BookingTitle, Identity, TimeSpan, UserId, Venue, VenueColor,
        VenueName,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresBookingRepository, PostgresDatabase, PostgresVenueRepository,
    };

    fn booking(venue: &VenueName, span: TimeSpan) -> Booking {
        Booking::new(
            BookingId::generate(),
            BookingTitle::new("Standup"),
            venue.clone(),
            span,
            Some(Identity::new(UserId::new("admin"), None, None)),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let venue = VenueName::new(format!("room-{}", uuid::Uuid::new_v4()));
        PostgresVenueRepository
            .upsert(&mut con, &Venue::new(venue.clone(), VenueColor::default()))
            .await?;

        let created = booking(
            &venue,
            TimeSpan::new(
                datetime!(2024-05-01 09:00 UTC),
                datetime!(2024-05-01 10:00 UTC),
            )?,
        );
        PostgresBookingRepository.create(&mut con, &created).await?;
        let found = PostgresBookingRepository
            .find_by_id(&mut con, created.id())
            .await?;
        assert_eq!(found, Some(created.clone()));

        let renamed = created.reconstruct(|b| b.title = BookingTitle::new("Retro"));
        PostgresBookingRepository.update(&mut con, &renamed).await?;
        let by_venue = PostgresBookingRepository
            .find_by_venue(&mut con, &venue)
            .await?;
        assert_eq!(by_venue, vec![renamed.clone()]);

        PostgresBookingRepository
            .delete(&mut con, renamed.id())
            .await?;
        let found = PostgresBookingRepository
            .find_by_id(&mut con, renamed.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn writes_to_a_deleted_booking_are_not_found() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let venue = VenueName::new(format!("room-{}", uuid::Uuid::new_v4()));
        let created = booking(
            &venue,
            TimeSpan::new(
                datetime!(2024-05-01 09:00 UTC),
                datetime!(2024-05-01 10:00 UTC),
            )?,
        );
        let mut setup = db.transact().await?;
        PostgresVenueRepository
            .upsert(&mut setup, &Venue::new(venue.clone(), VenueColor::default()))
            .await?;
        PostgresBookingRepository.create(&mut setup, &created).await?;
        setup.commit().await?;

        let mut deleting = db.transact().await?;
        PostgresBookingRepository
            .delete(&mut deleting, created.id())
            .await?;
        deleting.commit().await?;

        let mut editing = db.transact().await?;
        let renamed = created.clone().reconstruct(|b| b.title = BookingTitle::new("Retro"));
        let err = PostgresBookingRepository
            .update(&mut editing, &renamed)
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::NotFound);

        let mut again = db.transact().await?;
        let err = PostgresBookingRepository
            .delete(&mut again, created.id())
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::NotFound);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn exclusion_constraint_rejects_overlap() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let venue = VenueName::new(format!("room-{}", uuid::Uuid::new_v4()));
        PostgresVenueRepository
            .upsert(&mut con, &Venue::new(venue.clone(), VenueColor::default()))
            .await?;

        let first = booking(
            &venue,
            TimeSpan::new(
                datetime!(2024-05-01 09:00 UTC),
                datetime!(2024-05-01 10:00 UTC),
            )?,
        );
        let touching = booking(
            &venue,
            TimeSpan::new(
                datetime!(2024-05-01 10:00 UTC),
                datetime!(2024-05-01 11:00 UTC),
            )?,
        );
        let overlapping = booking(
            &venue,
            TimeSpan::new(
                datetime!(2024-05-01 09:30 UTC),
                datetime!(2024-05-01 10:30 UTC),
            )?,
        );
        PostgresBookingRepository.create(&mut con, &first).await?;
        PostgresBookingRepository.create(&mut con, &touching).await?;

        let err = PostgresBookingRepository
            .create(&mut con, &overlapping)
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Conflict);
        Ok(())
    }
}
