mod id;
mod returned_at;

pub use self::{id::*, returned_at::*};
use crate::entity::{Identity, ItemId, ItemName, Quantity};
use destructure::{Destructure, Mutation};
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Loan {
    id: LoanId,
    item_id: ItemId,
    item_name: ItemName,
    quantity: Quantity,
    borrower: Identity,
    loaned_at: OffsetDateTime,
    expected_return_at: OffsetDateTime,
    returned_at: Option<ReturnedAt>,
}

impl Loan {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LoanId,
        item_id: ItemId,
        item_name: ItemName,
        quantity: Quantity,
        borrower: Identity,
        loaned_at: OffsetDateTime,
        expected_return_at: OffsetDateTime,
        returned_at: Option<ReturnedAt>,
    ) -> Self {
        Self {
            id,
            item_id,
            item_name,
            quantity,
            borrower,
            loaned_at,
            expected_return_at,
            returned_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}
