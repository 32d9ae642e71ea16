mod id;
mod title;

pub use self::{id::*, title::*};
use crate::entity::{Identity, TimeSpan, VenueName};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Booking {
    id: BookingId,
    title: BookingTitle,
    venue: VenueName,
    span: TimeSpan,
    creator: Option<Identity>,
}

impl Booking {
    pub fn new(
        id: BookingId,
        title: BookingTitle,
        venue: VenueName,
        span: TimeSpan,
        creator: Option<Identity>,
    ) -> Self {
        Self {
            id,
            title,
            venue,
            span,
            creator,
        }
    }
}
