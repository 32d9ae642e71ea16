use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Loan, LoanId, ReturnedAt};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError>;
    /// Stamps the return time on an active loan. Returns `None` if the loan is
    /// missing or already returned.
    async fn close(
        &self,
        con: &mut Self::Transaction,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError>;
}

pub trait DependOnLoanModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanModifier: LoanModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_modifier(&self) -> &Self::LoanModifier;
}
