use sqlx::PgConnection;

use kernel::interface::query::VenueQuery;
use kernel::interface::update::VenueModifier;
use kernel::prelude::entity::{Venue, VenueColor, VenueName};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresVenueRepository;

#[async_trait::async_trait]
impl VenueQuery for PostgresVenueRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Venue>, KernelError> {
        PgVenueInternal::find_all(con).await
    }

    async fn find_by_name(
        &self,
        con: &mut PostgresTransaction,
        name: &VenueName,
    ) -> error_stack::Result<Option<Venue>, KernelError> {
        PgVenueInternal::find_by_name(con, name, false).await
    }

    async fn lock(
        &self,
        con: &mut PostgresTransaction,
        name: &VenueName,
    ) -> error_stack::Result<Option<Venue>, KernelError> {
        PgVenueInternal::find_by_name(con, name, true).await
    }
}

#[async_trait::async_trait]
impl VenueModifier for PostgresVenueRepository {
    type Transaction = PostgresTransaction;

    async fn upsert(
        &self,
        con: &mut PostgresTransaction,
        venue: &Venue,
    ) -> error_stack::Result<(), KernelError> {
        PgVenueInternal::upsert(con, venue).await
    }
}

#[derive(sqlx::FromRow)]
struct VenueRow {
    name: String,
    color: String,
}

impl From<VenueRow> for Venue {
    fn from(value: VenueRow) -> Self {
        Venue::new(VenueName::new(value.name), VenueColor::new(value.color))
    }
}

pub(in crate::database) struct PgVenueInternal;

impl PgVenueInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Venue>, KernelError> {
        let rows = sqlx::query_as::<_, VenueRow>(
            // language=postgresql
            r#"
            SELECT name, color
            FROM venues
            ORDER BY name
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Venue::from).collect())
    }

    async fn find_by_name(
        con: &mut PgConnection,
        name: &VenueName,
        for_update: bool,
    ) -> error_stack::Result<Option<Venue>, KernelError> {
        let query = if for_update {
            // language=postgresql
            r#"
            SELECT name, color
            FROM venues
            WHERE name = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT name, color
            FROM venues
            WHERE name = $1
            "#
        };
        let row = sqlx::query_as::<_, VenueRow>(query)
            .bind(name.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Venue::from))
    }

    async fn upsert(con: &mut PgConnection, venue: &Venue) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO venues (name, color)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET color = EXCLUDED.color
            "#,
        )
        .bind(venue.name().as_ref())
        .bind(venue.color().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::VenueQuery;
    use kernel::interface::update::VenueModifier;
    use kernel::prelude::entity::{Venue, VenueColor, VenueName};
    use kernel::KernelError;

    use crate::database::postgres::{PostgresDatabase, PostgresVenueRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn upsert_refreshes_color() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let name = VenueName::new(format!("room-{}", uuid::Uuid::new_v4()));

        PostgresVenueRepository
            .upsert(&mut con, &Venue::new(name.clone(), VenueColor::new("#FF6F00")))
            .await?;
        PostgresVenueRepository
            .upsert(&mut con, &Venue::new(name.clone(), VenueColor::new("#5E35B1")))
            .await?;

        let found = PostgresVenueRepository.find_by_name(&mut con, &name).await?;
        assert_eq!(
            found,
            Some(Venue::new(name.clone(), VenueColor::new("#5E35B1")))
        );
        let all = PostgresVenueRepository.find_all(&mut con).await?;
        assert!(all.iter().any(|venue| venue.name() == &name));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn lock_blocks_second_writer() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let name = VenueName::new(format!("room-{}", uuid::Uuid::new_v4()));
        let mut setup = db.transact().await?;
        PostgresVenueRepository
            .upsert(&mut setup, &Venue::new(name.clone(), VenueColor::default()))
            .await?;
        setup.commit().await?;

        let mut first = db.transact().await?;
        assert!(PostgresVenueRepository.lock(&mut first, &name).await?.is_some());

        let mut second = db.transact().await?;
        let blocked = tokio::time::timeout(
            Duration::from_millis(300),
            PostgresVenueRepository.lock(&mut second, &name),
        )
        .await;
        assert!(blocked.is_err());

        first.roll_back().await?;
        Ok(())
    }
}
