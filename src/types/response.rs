use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{Errno, OK};

/// Uniform response envelope: `{code, message, data}`.
///
/// `code == 0` means success; `data` is serialized as `null` when absent.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: OK.code,
            message: OK.message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn empty() -> Self {
        Self {
            code: OK.code,
            message: OK.message.to_string(),
            data: None,
        }
    }

    pub fn error(errno: Errno) -> Self {
        Self {
            code: errno.code,
            message: errno.message.to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(json!({ "username": "alice" }));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "code": 0, "message": "OK", "data": { "username": "alice" } })
        );
    }

    #[test]
    fn test_empty_envelope_has_null_data() {
        let value = serde_json::to_value(ApiResponse::empty()).unwrap();

        assert_eq!(value, json!({ "code": 0, "message": "OK", "data": null }));
    }

    #[test]
    fn test_error_envelope() {
        let value = serde_json::to_value(ApiResponse::error(crate::errors::ERR_BIND)).unwrap();

        assert_eq!(value["code"], 10002);
        assert!(value["data"].is_null());
    }
}
