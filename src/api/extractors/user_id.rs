//! Numeric user id path segment.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;

/// `{id}` path parameter parsed as a storage id.
///
/// A non-numeric segment rejects with `AppError::Bind`.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bind(e.body_text()))?;

        Ok(UserId(id))
    }
}
