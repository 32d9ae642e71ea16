use std::ops::{Deref, DerefMut};

use error_stack::Report;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Identity, UserEmail, UserId, UserName};
use kernel::{Detail, KernelError};

use crate::env;
use crate::error::ConvertError;

pub use self::{booking::*, item::*, loan::*, request::*, venue::*};

mod booking;
mod item;
mod loan;
mod request;
mod venue;

static POSTGRES_URL: &str = "POSTGRES_URL";

const EXCLUSION_VIOLATION: &str = "23P01";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        Self::connect(&url).await
    }

    /// Connects and brings the schema up to date.
    pub async fn connect(url: &str) -> error_stack::Result<Self, KernelError> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(url)
            .await
            .convert_error()?;
        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .convert_error()?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;

    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let code = match &error {
                Error::Database(database) => database.code().map(|code| code.into_owned()),
                _ => None,
            };
            let (context, detail) = match (&error, code.as_deref()) {
                (Error::PoolTimedOut, _) => (KernelError::Timeout, None),
                (_, Some(EXCLUSION_VIOLATION)) => (
                    KernelError::Conflict,
                    Some("The venue is already booked for an overlapping time"),
                ),
                (_, Some(FOREIGN_KEY_VIOLATION)) => (
                    KernelError::Validation,
                    Some("Referenced venue or item does not exist"),
                ),
                (_, Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)) => {
                    (KernelError::Concurrency, None)
                }
                _ => (KernelError::Internal, None),
            };
            let report = Report::from(error).change_context(context);
            match detail {
                Some(detail) => report.attach_printable(Detail::new(detail)),
                None => report,
            }
        })
    }
}

impl<T> ConvertError for Result<T, MigrateError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

/// Rebuilds an identity from its denormalized columns.
pub(in crate::database) fn identity(
    id: String,
    name: Option<String>,
    email: Option<String>,
) -> Identity {
    Identity::new(
        UserId::new(id),
        name.map(UserName::new),
        email.map(UserEmail::new),
    )
}
