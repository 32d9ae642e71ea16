mod booking;
mod common;
mod item;
mod loan;
mod request;
mod venue;

pub use self::{booking::*, common::*, item::*, loan::*, request::*, venue::*};
