/// Wire format of the transform endpoint
///
/// `POST {base_url}/api/transform` takes a data URI and an emoji, and
/// answers with either a base64 image plus metadata or an error envelope.

use serde::{Deserialize, Serialize};

/// Request body
#[derive(Debug, Clone, Serialize)]
pub struct TransformRequestBody<'a> {
    pub image: &'a str,
    pub emoji: &'a str,
}

/// Successful response body (HTTP 2xx)
#[derive(Debug, Clone, Deserialize)]
pub struct TransformResponse {
    /// Base64 encoded image, occasionally wrapped in a data URI
    pub transformed_image: String,
    pub metadata: TransformMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformMetadata {
    pub processing_time_ms: u64,
    pub model_version: String,
    pub request_id: String,
}

/// Error envelope (HTTP non-2xx)
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = TransformRequestBody {
            image: "data:image/png;base64,AAAA",
            emoji: "😊",
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "image": "data:image/png;base64,AAAA", "emoji": "😊" })
        );
    }

    #[test]
    fn test_transform_response_deserialization() {
        let json = r#"{
            "transformed_image": "aGVsbG8=",
            "metadata": {
                "processing_time_ms": 1500,
                "model_version": "gemini-2.5-flash-image-preview",
                "request_id": "req-123"
            }
        }"#;

        let response: TransformResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.transformed_image, "aGVsbG8=");
        assert_eq!(response.metadata.processing_time_ms, 1500);
        assert_eq!(response.metadata.request_id, "req-123");
    }

    #[test]
    fn test_error_response_with_optional_fields_missing() {
        let json = r#"{ "error": { "message": "Daily limit reached", "type": "rate_limit_error" } }"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.message, "Daily limit reached");
        assert_eq!(response.error.error_type, "rate_limit_error");
        assert_eq!(response.error.code, None);
        assert_eq!(response.error.suggestion, None);
    }
}
