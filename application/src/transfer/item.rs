use kernel::prelude::entity::{
    DestructItem, Item, ItemCategory, ItemDescription, ItemId, ItemName, Quantity,
};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ItemDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub total_quantity: i32,
    pub available_quantity: i32,
}

impl From<Item> for ItemDto {
    fn from(value: Item) -> Self {
        let DestructItem {
            id,
            name,
            category,
            description,
            total,
            available,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: description.map(String::from),
            total_quantity: total.into(),
            available_quantity: available.into(),
        }
    }
}

/// Catalog entry used to populate an empty inventory.
#[derive(Debug, Clone)]
pub struct ItemSeedDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub quantity: i32,
}

impl From<ItemSeedDto> for Item {
    fn from(value: ItemSeedDto) -> Self {
        Item::stocked(
            ItemId::new(value.id),
            ItemName::new(value.name),
            ItemCategory::new(value.category),
            value.description.map(ItemDescription::new),
            Quantity::new(value.quantity),
        )
    }
}
