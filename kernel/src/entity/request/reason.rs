use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
