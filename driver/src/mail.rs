use std::time::Duration;

use serde::{Deserialize, Serialize};

use kernel::interface::notify::{Delivery, Mail, Notifier};
use kernel::{fail, KernelError};

use crate::env_opt;
use crate::error::ConvertError;

static MAIL_API_URL: &str = "MAIL_API_URL";
static MAIL_API_KEY: &str = "MAIL_API_KEY";
static MAIL_FROM: &str = "MAIL_FROM";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MailEndpoint {
    url: String,
    key: String,
    from: String,
}

impl MailEndpoint {
    pub fn new(url: impl Into<String>, key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            from: from.into(),
        }
    }
}

/// Sends mail through an HTTP mail API. Without an endpoint every send is only
/// logged and reported as [`Delivery::Simulated`].
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: Option<MailEndpoint>,
    timeout: Duration,
}

impl HttpMailer {
    pub fn new(client: reqwest::Client, endpoint: Option<MailEndpoint>) -> Self {
        Self {
            client,
            endpoint,
            timeout: SEND_TIMEOUT,
        }
    }

    /// Upper bound on a single send, response body included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env(client: reqwest::Client) -> Self {
        let endpoint = match (
            env_opt(MAIL_API_URL),
            env_opt(MAIL_API_KEY),
            env_opt(MAIL_FROM),
        ) {
            (Some(url), Some(key), Some(from)) => Some(MailEndpoint::new(url, key, from)),
            _ => {
                tracing::warn!("Mail API is not configured; notifications will be simulated");
                None
            }
        };
        Self::new(client, endpoint)
    }
}

#[derive(Serialize)]
struct MailBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct MailReceipt {
    id: Option<String>,
}

#[async_trait::async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, mail: &Mail) -> error_stack::Result<Delivery, KernelError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::info!(
                "Simulated mail to {}: {}\n{}",
                mail.to().as_ref(),
                mail.subject(),
                mail.html_body()
            );
            return Ok(Delivery::Simulated);
        };

        let body = MailBody {
            from: &endpoint.from,
            to: mail.to().as_ref().as_str(),
            subject: mail.subject(),
            html: mail.html_body(),
        };
        let response = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .convert_error()?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(fail(
                KernelError::Internal,
                format!("Mail API answered {status}: {detail}"),
            ));
        }
        let receipt = response.json::<MailReceipt>().await.ok();
        Ok(Delivery::Sent {
            message_id: receipt.and_then(|receipt| receipt.id),
        })
    }
}
