use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln)]
pub struct VenueName(String);

impl VenueName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
