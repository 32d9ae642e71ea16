use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnItemQuery, ItemQuery};
use kernel::interface::update::{DependOnItemModifier, ItemModifier};
use kernel::prelude::entity::Item;
use kernel::KernelError;

use crate::transfer::{ItemDto, ItemSeedDto};

#[async_trait::async_trait]
pub trait GetItemService: 'static + Sync + Send + DependOnItemQuery {
    async fn get_items(&self) -> error_stack::Result<Vec<ItemDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let items = self.item_query().find_all(&mut connection).await?;
        Ok(items.into_iter().map(ItemDto::from).collect())
    }
}

impl<T> GetItemService for T where T: DependOnItemQuery {}

#[async_trait::async_trait]
pub trait SeedItemService: 'static + Sync + Send + DependOnItemQuery + DependOnItemModifier {
    /// Fills an empty inventory from the catalog. Returns how many items were seeded;
    /// a non-empty inventory is left untouched.
    async fn seed_items(&self, catalog: Vec<ItemSeedDto>) -> error_stack::Result<usize, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        if self.item_query().count(&mut connection).await? > 0 {
            return Ok(0);
        }

        let seeded = catalog.len();
        for seed in catalog {
            let item = Item::from(seed);
            self.item_modifier()
                .create_if_absent(&mut connection, &item)
                .await?;
        }
        connection.commit().await?;

        tracing::info!("Seeded {} inventory item(s)", seeded);
        Ok(seeded)
    }
}

impl<T> SeedItemService for T where T: DependOnItemQuery + DependOnItemModifier {}
