//! Panic recovery for `CatchPanicLayer`.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::errors::AppError;

/// Turn a handler panic into the internal-error envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Recovered from handler panic");
    AppError::internal(detail).into_response()
}
