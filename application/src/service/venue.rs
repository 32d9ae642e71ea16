use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnVenueQuery, VenueQuery};
use kernel::interface::update::{DependOnVenueModifier, VenueModifier};
use kernel::prelude::entity::Venue;
use kernel::KernelError;

use crate::transfer::VenueDto;

#[async_trait::async_trait]
pub trait GetVenueService: 'static + Sync + Send + DependOnVenueQuery {
    async fn get_venues(&self) -> error_stack::Result<Vec<VenueDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let venues = self.venue_query().find_all(&mut connection).await?;
        Ok(venues.into_iter().map(VenueDto::from).collect())
    }
}

impl<T> GetVenueService for T where T: DependOnVenueQuery {}

#[async_trait::async_trait]
pub trait SyncVenueService: 'static + Sync + Send + DependOnVenueModifier {
    /// Makes the stored venue list match the configured catalog. Venues dropped from
    /// the catalog are kept so their bookings stay readable.
    async fn sync_venues(&self, catalog: Vec<VenueDto>) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        for venue in catalog {
            let venue = Venue::from(venue);
            self.venue_modifier().upsert(&mut connection, &venue).await?;
        }
        connection.commit().await?;
        Ok(())
    }
}

impl<T> SyncVenueService for T where T: DependOnVenueModifier {}
