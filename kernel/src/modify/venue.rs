use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::Venue;
use crate::KernelError;

#[async_trait::async_trait]
pub trait VenueModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Inserts the venue or refreshes its color.
    async fn upsert(
        &self,
        con: &mut Self::Transaction,
        venue: &Venue,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnVenueModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type VenueModifier: VenueModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn venue_modifier(&self) -> &Self::VenueModifier;
}
