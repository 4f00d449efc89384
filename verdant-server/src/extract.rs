//! Request body extraction

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::ApiError;

/// `Json<T>` with the rejection swapped for the error body the clients
/// already handle. Covers wrong content type, truncated bodies, and
/// JSON that does not parse or fit the target type.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|_| {
            ApiError::bad_request(
                "Invalid JSON format in request body",
                "Please check your request data format",
            )
        })?;
        Ok(Self(value))
    }
}
