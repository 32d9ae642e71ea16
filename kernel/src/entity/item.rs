mod id;
mod name;
mod quantity;

pub use self::{id::*, name::*, quantity::*};
use destructure::{Destructure, Mutation};
use vodca::References;

/// A loanable inventory entry. `available` never exceeds `total`.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Item {
    id: ItemId,
    name: ItemName,
    category: ItemCategory,
    description: Option<ItemDescription>,
    total: Quantity,
    available: Quantity,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: ItemName,
        category: ItemCategory,
        description: Option<ItemDescription>,
        total: Quantity,
        available: Quantity,
    ) -> Self {
        Self {
            id,
            name,
            category,
            description,
            total,
            available,
        }
    }

    /// Freshly seeded item with everything on the shelf.
    pub fn stocked(
        id: ItemId,
        name: ItemName,
        category: ItemCategory,
        description: Option<ItemDescription>,
        total: Quantity,
    ) -> Self {
        Self::new(id, name, category, description, total, total)
    }

    pub fn can_lend(&self, quantity: Quantity) -> bool {
        quantity <= self.available
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn projector(total: i32, available: i32) -> Item {
        Item::new(
            ItemId::new("projector"),
            ItemName::new("Projector"),
            ItemCategory::new("Electronics"),
            None,
            Quantity::new(total),
            Quantity::new(available),
        )
    }

    #[test]
    fn stocked_items_start_full() {
        let item = Item::stocked(
            ItemId::new("lap-recorder"),
            ItemName::new("Lap Recorder"),
            ItemCategory::new("Audio Equipment"),
            None,
            Quantity::new(2),
        );
        assert_eq!(item.available(), item.total());
    }

    #[test]
    fn lending_is_bounded_by_availability() {
        let item = projector(2, 1);
        assert!(item.can_lend(Quantity::new(1)));
        assert!(!item.can_lend(Quantity::new(2)));
        assert!(!projector(1, 0).can_lend(Quantity::new(1)));
    }
}
