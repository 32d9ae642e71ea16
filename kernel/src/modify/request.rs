use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookingRequest, RequestId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookingRequestModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        request_id: &RequestId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookingRequestModifier:
    'static + Sync + Send + DependOnDatabaseConnection
{
    type BookingRequestModifier: BookingRequestModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn booking_request_modifier(&self) -> &Self::BookingRequestModifier;
}
