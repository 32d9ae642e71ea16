use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }

    /// Random v4 identifier, unique without any coordination between callers.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}
