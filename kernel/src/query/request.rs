use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookingRequest, RequestId, UserId, VenueName};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookingRequestQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError>;
    /// Locks the request row until the transaction ends.
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<BookingRequest>, KernelError>;
    async fn find_by_submitter(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError>;
    async fn find_pending_by_venue(
        &self,
        con: &mut Self::Transaction,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError>;
}

pub trait DependOnBookingRequestQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookingRequestQuery: BookingRequestQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn booking_request_query(&self) -> &Self::BookingRequestQuery;
}
