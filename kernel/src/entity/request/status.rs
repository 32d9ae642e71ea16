use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const PENDING_APPROVAL: &str = "pending_approval";
const APPROVED: &str = "approved";
const REJECTED: &str = "rejected";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::PendingApproval)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PendingApproval => PENDING_APPROVAL,
            RequestStatus::Approved => APPROVED,
            RequestStatus::Rejected => REJECTED,
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Report<KernelError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            PENDING_APPROVAL => Ok(RequestStatus::PendingApproval),
            APPROVED => Ok(RequestStatus::Approved),
            REJECTED => Ok(RequestStatus::Rejected),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown request status: {value}"))),
        }
    }
}
