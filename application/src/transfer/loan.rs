use kernel::prelude::entity::{DestructLoan, Loan};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::IdentityDto;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LoanDto {
    pub id: Uuid,
    pub item_id: String,
    pub item_name: String,
    pub quantity: i32,
    pub borrower: IdentityDto,
    pub loaned_at: OffsetDateTime,
    pub expected_return_at: OffsetDateTime,
    pub returned_at: Option<OffsetDateTime>,
}

impl From<Loan> for LoanDto {
    fn from(value: Loan) -> Self {
        let DestructLoan {
            id,
            item_id,
            item_name,
            quantity,
            borrower,
            loaned_at,
            expected_return_at,
            returned_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            item_id: item_id.into(),
            item_name: item_name.into(),
            quantity: quantity.into(),
            borrower: borrower.into(),
            loaned_at,
            expected_return_at,
            returned_at: returned_at.map(OffsetDateTime::from),
        }
    }
}

pub struct CreateLoanDto {
    pub item_id: String,
    pub quantity: i32,
    pub expected_return_at: OffsetDateTime,
}

pub struct ReturnLoanDto {
    pub id: Uuid,
}
