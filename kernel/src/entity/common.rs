mod identity;
mod principal;
mod time;

pub use self::{identity::*, principal::*, time::*};
