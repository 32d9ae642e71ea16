mod booking;
mod identity;
mod item;
mod loan;
mod request;
mod venue;

pub use self::{booking::*, identity::*, item::*, loan::*, request::*, venue::*};
