use crate::controller::Intake;
use application::transfer::{CreateLoanDto, ReturnLoanDto};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    item_id: String,
    quantity: i32,
    #[serde(with = "time::serde::rfc3339")]
    expected_return_at: OffsetDateTime,
}

pub struct Transformer;

impl Intake<LoanRequest> for Transformer {
    type To = CreateLoanDto;
    fn emit(
        &self,
        LoanRequest {
            item_id,
            quantity,
            expected_return_at,
        }: LoanRequest,
    ) -> Self::To {
        CreateLoanDto {
            item_id,
            quantity,
            expected_return_at,
        }
    }
}

impl Intake<Uuid> for Transformer {
    type To = ReturnLoanDto;
    fn emit(&self, id: Uuid) -> Self::To {
        ReturnLoanDto { id }
    }
}
