//! JSON response envelope shared by all API routes.
//!
//! Every success response carries `{"success": true, "data": ...}` with an
//! optional human-readable `message`; failures are produced by
//! [`crate::error::AppError`]. Handlers wrap the envelope in `axum::Json`
//! themselves.

use serde::Serialize;

/// Success envelope for API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Wrap a payload with an accompanying message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with only a message, no data.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_envelope_shape() {
        let body = ApiResponse::ok(serde_json::json!({"orderNumber": "ORD1"}));
        let value = serde_json::to_value(&body).expect("serializes");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["orderNumber"], "ORD1");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_message_only_envelope() {
        let body = ApiResponse::message("Order cancelled");
        let value = serde_json::to_value(&body).expect("serializes");
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Order cancelled");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_envelope_nests_under_json_once() {
        // Handlers return Json(ApiResponse::ok(..)); the envelope itself must
        // not pre-wrap, or the response body would double-nest.
        let response = Json(ApiResponse::ok(serde_json::json!({"id": 1}))).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
