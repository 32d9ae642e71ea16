mod booking;
mod item;
mod loan;
mod request;
mod venue;

pub use self::{booking::*, item::*, loan::*, request::*, venue::*};
