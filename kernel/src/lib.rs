pub use crate::error::*;

mod clock;
mod database;
mod entity;
mod error;
mod feed;
mod identity;
mod modify;
mod notify;
mod query;
mod schedule;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
    pub mod schedule {
        pub use crate::schedule::*;
    }
    pub mod feed {
        pub use crate::feed::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
    pub mod notify {
        pub use crate::notify::*;
    }
    pub mod identity {
        pub use crate::identity::*;
    }
    pub mod clock {
        pub use crate::clock::*;
    }
}
