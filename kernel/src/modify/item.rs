use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Item, ItemId, Quantity};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ItemModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Inserts the item unless one with the same id already exists.
    async fn create_if_absent(
        &self,
        con: &mut Self::Transaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError>;
    /// Atomically decrements the available quantity if at least `quantity` is available.
    /// Returns `None` when the item is missing or short.
    async fn take(
        &self,
        con: &mut Self::Transaction,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError>;
    /// Atomically increments the available quantity without exceeding the total.
    /// Returns `None` when the item is missing or the increment would overflow the total.
    async fn restore(
        &self,
        con: &mut Self::Transaction,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError>;
}

pub trait DependOnItemModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type ItemModifier: ItemModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn item_modifier(&self) -> &Self::ItemModifier;
}
