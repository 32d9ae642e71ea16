use crate::error::ErrorStatus;
use crate::handler::AppModule;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use kernel::interface::identity::{DependOnTokenVerifier, TokenVerifier};
use kernel::prelude::entity::Principal;
use kernel::{fail, KernelError};

/// Caller resolved from the `Authorization: Bearer` header.
pub struct Authenticated(pub Principal);

#[async_trait::async_trait]
impl FromRequestParts<AppModule> for Authenticated {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        module: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| fail(KernelError::Unauthorized, "Missing bearer token"))?;
        let identity = module.token_verifier().verify(bearer.token()).await?;
        let principal = module.admins().authorize(identity);
        tracing::debug!("Authenticated {:?} as {:?}", principal.id(), principal.role());
        Ok(Self(principal))
    }
}
