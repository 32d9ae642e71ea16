use kernel::prelude::entity::{DestructVenue, Venue, VenueColor, VenueName};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VenueDto {
    pub name: String,
    pub color: String,
}

impl From<Venue> for VenueDto {
    fn from(value: Venue) -> Self {
        let DestructVenue { name, color } = value.into_destruct();
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl From<VenueDto> for Venue {
    fn from(value: VenueDto) -> Self {
        Venue::new(VenueName::new(value.name), VenueColor::new(value.color))
    }
}
