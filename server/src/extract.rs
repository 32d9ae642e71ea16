use crate::error::ErrorStatus;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use kernel::{fail, KernelError};

/// JSON body whose rejections are reported as [`KernelError::Validation`].
pub struct Payload<T>(pub T);

#[async_trait::async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ErrorStatus;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(fail(KernelError::Validation, rejection.body_text()).into()),
        }
    }
}
