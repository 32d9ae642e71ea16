use crate::controller::Exhaust;
use application::transfer::ItemDto;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    id: String,
    name: String,
    category: String,
    description: Option<String>,
    total_quantity: i32,
    available_quantity: i32,
}

impl From<ItemDto> for ItemResponse {
    fn from(
        ItemDto {
            id,
            name,
            category,
            description,
            total_quantity,
            available_quantity,
        }: ItemDto,
    ) -> Self {
        Self {
            id,
            name,
            category,
            description,
            total_quantity,
            available_quantity,
        }
    }
}

pub struct Presenter;

impl Exhaust<Vec<ItemDto>> for Presenter {
    type To = Json<Vec<ItemResponse>>;
    fn emit(&self, input: Vec<ItemDto>) -> Self::To {
        Json(input.into_iter().map(ItemResponse::from).collect())
    }
}
