use sqlx::PgConnection;

use kernel::interface::query::ItemQuery;
use kernel::interface::update::ItemModifier;
use kernel::prelude::entity::{
    Item, ItemCategory, ItemDescription, ItemId, ItemName, Quantity,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresItemRepository;

#[async_trait::async_trait]
impl ItemQuery for PostgresItemRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        PgItemInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        PgItemInternal::find_by_id(con, id).await
    }

    async fn count(&self, con: &mut PostgresTransaction) -> error_stack::Result<i64, KernelError> {
        PgItemInternal::count(con).await
    }
}

#[async_trait::async_trait]
impl ItemModifier for PostgresItemRepository {
    type Transaction = PostgresTransaction;

    async fn create_if_absent(
        &self,
        con: &mut PostgresTransaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        PgItemInternal::create_if_absent(con, item).await
    }

    async fn take(
        &self,
        con: &mut PostgresTransaction,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        PgItemInternal::take(con, id, quantity).await
    }

    async fn restore(
        &self,
        con: &mut PostgresTransaction,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        PgItemInternal::restore(con, id, quantity).await
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    category: String,
    description: Option<String>,
    total_quantity: i32,
    available_quantity: i32,
}

impl From<ItemRow> for Item {
    fn from(value: ItemRow) -> Self {
        Item::new(
            ItemId::new(value.id),
            ItemName::new(value.name),
            ItemCategory::new(value.category),
            value.description.map(ItemDescription::new),
            Quantity::new(value.total_quantity),
            Quantity::new(value.available_quantity),
        )
    }
}

pub(in crate::database) struct PgItemInternal;

impl PgItemInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Item>, KernelError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT id, name, category, description, total_quantity, available_quantity
            FROM items
            ORDER BY name
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        let row = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT id, name, category, description, total_quantity, available_quantity
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Item::from))
    }

    async fn count(con: &mut PgConnection) -> error_stack::Result<i64, KernelError> {
        sqlx::query_scalar::<_, i64>(
            // language=postgresql
            r#"
            SELECT COUNT(*) FROM items
            "#,
        )
        .fetch_one(con)
        .await
        .convert_error()
    }

    async fn create_if_absent(
        con: &mut PgConnection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO items (id, name, category, description, total_quantity, available_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(item.id().as_ref())
        .bind(item.name().as_ref())
        .bind(item.category().as_ref())
        .bind(item.description().as_ref().map(|description| description.as_ref()))
        .bind(*item.total().as_ref())
        .bind(*item.available().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn take(
        con: &mut PgConnection,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        let row = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            UPDATE items
            SET available_quantity = available_quantity - $2
            WHERE id = $1 AND available_quantity >= $2
            RETURNING id, name, category, description, total_quantity, available_quantity
            "#,
        )
        .bind(id.as_ref())
        .bind(*quantity.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Item::from))
    }

    async fn restore(
        con: &mut PgConnection,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        let row = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            UPDATE items
            SET available_quantity = available_quantity + $2
            WHERE id = $1 AND available_quantity + $2 <= total_quantity
            RETURNING id, name, category, description, total_quantity, available_quantity
            "#,
        )
        .bind(id.as_ref())
        .bind(*quantity.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Item::from))
    }
}
