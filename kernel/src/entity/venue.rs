mod color;
mod name;

pub use self::{color::*, name::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Venue {
    name: VenueName,
    color: VenueColor,
}

impl Venue {
    pub fn new(name: VenueName, color: VenueColor) -> Self {
        Self { name, color }
    }
}
