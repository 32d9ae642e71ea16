use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::LoanQuery;
use kernel::interface::update::LoanModifier;
use kernel::prelude::entity::{ItemId, ItemName, Loan, LoanId, Quantity, ReturnedAt, UserId};
use kernel::KernelError;

use crate::database::postgres::{identity, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresLoanRepository;

#[async_trait::async_trait]
impl LoanQuery for PostgresLoanRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        PgLoanInternal::find_by_id(con, id).await
    }

    async fn find_active(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        PgLoanInternal::find_active(con, None).await
    }

    async fn find_active_by_borrower(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        PgLoanInternal::find_active(con, Some(user_id)).await
    }
}

#[async_trait::async_trait]
impl LoanModifier for PostgresLoanRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanInternal::create(con, loan).await
    }

    async fn close(
        &self,
        con: &mut PostgresTransaction,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        PgLoanInternal::close(con, id, returned_at).await
    }
}

#[derive(sqlx::FromRow)]
struct LoanRow {
    id: Uuid,
    item_id: String,
    item_name: String,
    quantity: i32,
    user_id: String,
    user_name: Option<String>,
    user_email: Option<String>,
    loaned_at: OffsetDateTime,
    expected_return_at: OffsetDateTime,
    returned_at: Option<OffsetDateTime>,
}

impl From<LoanRow> for Loan {
    fn from(value: LoanRow) -> Self {
        Loan::new(
            LoanId::new(value.id),
            ItemId::new(value.item_id),
            ItemName::new(value.item_name),
            Quantity::new(value.quantity),
            identity(value.user_id, value.user_name, value.user_email),
            value.loaned_at,
            value.expected_return_at,
            value.returned_at.map(ReturnedAt::new),
        )
    }
}

pub(in crate::database) struct PgLoanInternal;

impl PgLoanInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &LoanId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        let row = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, item_id, item_name, quantity, user_id, user_name, user_email,
                   loaned_at, expected_return_at, returned_at
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Loan::from))
    }

    async fn find_active(
        con: &mut PgConnection,
        user_id: Option<&UserId>,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        let rows = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, item_id, item_name, quantity, user_id, user_name, user_email,
                   loaned_at, expected_return_at, returned_at
            FROM loans
            WHERE returned_at IS NULL AND ($1::text IS NULL OR user_id = $1)
            ORDER BY loaned_at DESC
            "#,
        )
        .bind(user_id.map(|id| id.as_ref()))
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Loan::from).collect())
    }

    async fn create(con: &mut PgConnection, loan: &Loan) -> error_stack::Result<(), KernelError> {
        let borrower = loan.borrower();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO loans (id, item_id, item_name, quantity, user_id, user_name, user_email,
                               loaned_at, expected_return_at, returned_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(loan.id().as_ref())
        .bind(loan.item_id().as_ref())
        .bind(loan.item_name().as_ref())
        .bind(*loan.quantity().as_ref())
        .bind(borrower.id().as_ref())
        .bind(borrower.name().as_ref().map(|name| name.as_ref()))
        .bind(borrower.email().as_ref().map(|email| email.as_ref()))
        .bind(loan.loaned_at())
        .bind(loan.expected_return_at())
        .bind(loan.returned_at().map(|at| *at.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn close(
        con: &mut PgConnection,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        let row = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            UPDATE loans
            SET returned_at = $2
            WHERE id = $1 AND returned_at IS NULL
            RETURNING id, item_id, item_name, quantity, user_id, user_name, user_email,
                      loaned_at, expected_return_at, returned_at
            "#,
        )
        .bind(id.as_ref())
        .bind(returned_at.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Loan::from))
    }
}
