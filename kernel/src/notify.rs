use std::fmt::{Display, Formatter};

use serde::Serialize;
use vodca::References;

use crate::entity::UserEmail;
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct Mail {
    to: UserEmail,
    subject: String,
    html_body: String,
}

impl Mail {
    pub fn new(to: UserEmail, subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Delivery {
    Sent { message_id: Option<String> },
    /// No provider is configured; the mail was only written to the log.
    Simulated,
}

/// Outcome of a best-effort notification, reported next to the business result.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Simulated,
    Skipped,
    Failed,
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Sent => write!(f, "sent"),
            NotificationStatus::Simulated => write!(f, "simulated"),
            NotificationStatus::Skipped => write!(f, "skipped"),
            NotificationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl From<&Delivery> for NotificationStatus {
    fn from(value: &Delivery) -> Self {
        match value {
            Delivery::Sent { .. } => NotificationStatus::Sent,
            Delivery::Simulated => NotificationStatus::Simulated,
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: 'static + Sync + Send {
    async fn send(&self, mail: &Mail) -> error_stack::Result<Delivery, KernelError>;
}

pub trait DependOnNotifier: 'static + Sync + Send {
    type Notifier: Notifier;
    fn notifier(&self) -> &Self::Notifier;
}
