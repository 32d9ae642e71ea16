use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Item, ItemId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ItemQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_all(&self, con: &mut Self::Transaction)
        -> error_stack::Result<Vec<Item>, KernelError>;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError>;
    async fn count(&self, con: &mut Self::Transaction) -> error_stack::Result<i64, KernelError>;
}

pub trait DependOnItemQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ItemQuery: ItemQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn item_query(&self) -> &Self::ItemQuery;
}
