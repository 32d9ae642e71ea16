use crate::entity::Identity;
use crate::KernelError;

/// Resolves a bearer token issued by the identity provider.
///
/// Invalid or expired tokens fail with [`KernelError::Unauthorized`].
#[async_trait::async_trait]
pub trait TokenVerifier: 'static + Sync + Send {
    async fn verify(&self, token: &str) -> error_stack::Result<Identity, KernelError>;
}

pub trait DependOnTokenVerifier: 'static + Sync + Send {
    type TokenVerifier: TokenVerifier;
    fn token_verifier(&self) -> &Self::TokenVerifier;
}
