use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Venue, VenueName};
use crate::KernelError;

#[async_trait::async_trait]
pub trait VenueQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Venue>, KernelError>;
    async fn find_by_name(
        &self,
        con: &mut Self::Transaction,
        name: &VenueName,
    ) -> error_stack::Result<Option<Venue>, KernelError>;
    /// Finds the venue and holds an exclusive lock on it until the transaction ends.
    /// Booking writes for one venue are serialized through this lock.
    async fn lock(
        &self,
        con: &mut Self::Transaction,
        name: &VenueName,
    ) -> error_stack::Result<Option<Venue>, KernelError>;
}

pub trait DependOnVenueQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type VenueQuery: VenueQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn venue_query(&self) -> &Self::VenueQuery;
}
