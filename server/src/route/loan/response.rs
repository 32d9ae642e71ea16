use crate::controller::Exhaust;
use crate::route::{local, IdentityResponse};
use application::transfer::LoanDto;
use axum::Json;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    id: Uuid,
    item_id: String,
    item_name: String,
    quantity: i32,
    borrower: IdentityResponse,
    #[serde(with = "time::serde::rfc3339")]
    loaned_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    expected_return_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    returned_at: Option<OffsetDateTime>,
}

impl LoanResponse {
    fn new(dto: LoanDto, offset: UtcOffset) -> Self {
        Self {
            id: dto.id,
            item_id: dto.item_id,
            item_name: dto.item_name,
            quantity: dto.quantity,
            borrower: dto.borrower.into(),
            loaned_at: local(dto.loaned_at, offset),
            expected_return_at: local(dto.expected_return_at, offset),
            returned_at: dto.returned_at.map(|at| local(at, offset)),
        }
    }
}

pub struct Presenter(pub UtcOffset);

impl Exhaust<Vec<LoanDto>> for Presenter {
    type To = Json<Vec<LoanResponse>>;
    fn emit(&self, input: Vec<LoanDto>) -> Self::To {
        Json(
            input
                .into_iter()
                .map(|dto| LoanResponse::new(dto, self.0))
                .collect(),
        )
    }
}

impl Exhaust<LoanDto> for Presenter {
    type To = Json<LoanResponse>;
    fn emit(&self, input: LoanDto) -> Self::To {
        Json(LoanResponse::new(input, self.0))
    }
}
