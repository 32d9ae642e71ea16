use std::collections::BTreeMap;

use destructure::Destructure;
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{Booking, BookingId, BookingTitle, Venue, VenueColor, VenueName};

pub type BookingsByVenue = BTreeMap<VenueName, Vec<Booking>>;

/// Half-open interval intersection: touching intervals do not overlap.
pub fn overlaps(
    start1: OffsetDateTime,
    end1: OffsetDateTime,
    start2: OffsetDateTime,
    end2: OffsetDateTime,
) -> bool {
    start1.max(start2) < end1.min(end2)
}

/// Bookings in `existing` that share the candidate's venue and interval,
/// ignoring the candidate itself.
pub fn conflicts<'a>(
    candidate: &Booking,
    existing: impl IntoIterator<Item = &'a Booking>,
) -> Vec<&'a Booking> {
    existing
        .into_iter()
        .filter(|booking| booking.id() != candidate.id())
        .filter(|booking| booking.venue() == candidate.venue())
        .filter(|booking| booking.span().overlaps(candidate.span()))
        .collect()
}

pub fn has_conflict<'a>(
    candidate: &Booking,
    existing: impl IntoIterator<Item = &'a Booking>,
) -> bool {
    !conflicts(candidate, existing).is_empty()
}

pub fn group_by_venue(bookings: impl IntoIterator<Item = Booking>) -> BookingsByVenue {
    let mut grouped = BookingsByVenue::new();
    for booking in bookings {
        grouped
            .entry(booking.venue().clone())
            .or_default()
            .push(booking);
    }
    grouped
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct DisplayEvent {
    id: BookingId,
    title: BookingTitle,
    start: OffsetDateTime,
    end: OffsetDateTime,
    venue: VenueName,
    color: VenueColor,
    booking: Booking,
}

/// Calendar events for the selected venues, in selection order.
///
/// Unknown venues contribute nothing; a venue missing from `venues` is drawn in the
/// default color.
pub fn project_events(
    bookings: &BookingsByVenue,
    selected: &[VenueName],
    venues: &[Venue],
) -> Vec<DisplayEvent> {
    selected
        .iter()
        .flat_map(|name| {
            let color = venues
                .iter()
                .find(|venue| venue.name() == name)
                .map(|venue| venue.color().clone())
                .unwrap_or_default();
            bookings
                .get(name)
                .into_iter()
                .flatten()
                .map(move |booking| DisplayEvent {
                    id: *booking.id(),
                    title: booking.title().clone(),
                    start: booking.span().start(),
                    end: booking.span().end(),
                    venue: name.clone(),
                    color: color.clone(),
                    booking: booking.clone(),
                })
        })
        .collect()
}
