//! Per-request correlation identifier.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_http::request_id::RequestId;

use crate::api::middleware::REQUEST_ID_HEADER;

/// Correlation id attached by the request-id middleware.
///
/// Falls back to the raw header (or `-`) when the middleware did not run.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.header_value())
            .or_else(|| parts.headers.get(REQUEST_ID_HEADER));

        let id = header
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-")
            .to_string();

        Ok(CorrelationId(id))
    }
}
