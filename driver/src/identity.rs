use reqwest::StatusCode;
use serde::Deserialize;

use kernel::interface::identity::TokenVerifier;
use kernel::prelude::entity::{Identity, UserEmail, UserId, UserName};
use kernel::{fail, KernelError};

use crate::env;
use crate::error::ConvertError;

static IDP_USERINFO_URL: &str = "IDP_USERINFO_URL";

/// Verifies bearer tokens against an OpenID Connect userinfo endpoint.
pub struct UserInfoVerifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<UserInfo> for Identity {
    fn from(value: UserInfo) -> Self {
        Identity::new(
            UserId::new(value.sub),
            value.name.map(UserName::new),
            value.email.map(UserEmail::new),
        )
    }
}

impl UserInfoVerifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_env(client: reqwest::Client) -> error_stack::Result<Self, KernelError> {
        Ok(Self::new(client, env(IDP_USERINFO_URL)?))
    }
}

#[async_trait::async_trait]
impl TokenVerifier for UserInfoVerifier {
    async fn verify(&self, token: &str) -> error_stack::Result<Identity, KernelError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await
            .convert_error()?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(fail(
                KernelError::Unauthorized,
                "Invalid or expired token",
            )),
            status if !status.is_success() => Err(fail(
                KernelError::Internal,
                format!("Identity provider answered {status}"),
            )),
            _ => {
                let info = response.json::<UserInfo>().await.convert_error()?;
                if info.sub.trim().is_empty() {
                    return Err(fail(KernelError::Unauthorized, "Token has no subject"));
                }
                Ok(Identity::from(info))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::Identity;

    use super::UserInfo;

    #[test]
    fn optional_claims() {
        let info: UserInfo = serde_json::from_str(r#"{"sub":"u-1","email":"a@example.com"}"#).unwrap();
        let identity = Identity::from(info);
        assert_eq!(identity.id().as_ref(), "u-1");
        assert!(identity.name().is_none());
        assert_eq!(
            identity.email().as_ref().map(|email| email.as_ref().as_str()),
            Some("a@example.com")
        );
    }
}
