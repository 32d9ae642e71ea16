use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct VenueColor(String);

impl VenueColor {
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }
}

impl Default for VenueColor {
    fn default() -> Self {
        Self::new("#808080")
    }
}
