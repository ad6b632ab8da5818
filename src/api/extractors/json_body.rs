//! JSON body extractor whose rejection renders the bind errno.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Like `Json<T>`, but malformed bodies or missing fields reject with
/// `AppError::Bind` so the client gets the uniform envelope.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(JsonBody(payload): JsonBody<CreateUserRequest>) {
///     // every required field is present
/// }
/// ```
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bind(e.body_text()))?;

        Ok(JsonBody(value))
    }
}
