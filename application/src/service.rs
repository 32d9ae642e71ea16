mod booking;
mod item;
mod loan;
mod notify;
mod request;
mod venue;

pub use self::{booking::*, item::*, loan::*, notify::*, request::*, venue::*};
