use crate::controller::Exhaust;
use application::transfer::VenueDto;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    name: String,
    color: String,
}

impl From<VenueDto> for VenueResponse {
    fn from(VenueDto { name, color }: VenueDto) -> Self {
        Self { name, color }
    }
}

pub struct Presenter;

impl Exhaust<Vec<VenueDto>> for Presenter {
    type To = Json<Vec<VenueResponse>>;
    fn emit(&self, input: Vec<VenueDto>) -> Self::To {
        Json(input.into_iter().map(VenueResponse::from).collect())
    }
}
