/// Transformation client
///
/// Issues exactly one request per call and normalizes the outcome into
/// `TransformSuccess` or `RawFailure`. It never retries and never decides
/// what a failure means; that is the classifier's job.

use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{debug, error, info};

use super::models::{ErrorResponse, TransformRequestBody, TransformResponse};
use crate::emoji::EmojiSymbol;
use crate::photo::output::decode_image_data;
use crate::photo::ImagePayload;

/// Path of the transform endpoint, relative to the base URL
pub const TRANSFORM_PATH: &str = "api/transform";

/// The unit of work sent to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub image: ImagePayload,
    pub emoji: EmojiSymbol,
}

/// A successful transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSuccess {
    pub transformed_image: Vec<u8>,
    pub processing_time_ms: u64,
    pub model_version: String,
    pub request_id: String,
}

/// A failed attempt, before classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawFailure {
    /// The request never produced an HTTP response
    #[error("transport failure: {message}")]
    Transport { message: String, timed_out: bool },

    /// Non-2xx response; `body` is None when it was not a valid error envelope
    #[error("HTTP {status}")]
    Status {
        status: u16,
        body: Option<super::models::ErrorDetail>,
    },

    /// 2xx response that could not be understood
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
}

impl From<reqwest::Error> for RawFailure {
    fn from(err: reqwest::Error) -> Self {
        RawFailure::Transport {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

/// HTTP client for `POST {base_url}/api/transform`
#[derive(Debug, Clone)]
pub struct TransformClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl TransformClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: &Url) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("emoji-face/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                error!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            endpoint: endpoint_for(base_url),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one transform request
    pub async fn transform(&self, request: TransformRequest) -> Result<TransformSuccess, RawFailure> {
        info!(
            "Sending transformation request to {} ({} {})",
            self.endpoint,
            request.emoji,
            request.emoji.name()
        );

        let body = TransformRequestBody {
            image: request.image.data_uri(),
            emoji: request.emoji.glyph(),
        };

        let response = self.http.post(self.endpoint.clone()).json(&body).send().await?;
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Err(unread_body(status, e.into())),
        };

        if status.is_success() {
            parse_success(&text)
        } else {
            Err(parse_failure(status, &text))
        }
    }
}

/// `{base}/api/transform`, ignoring trailing slashes on the base
fn endpoint_for(base_url: &Url) -> Url {
    let mut endpoint = base_url.clone();
    let path = format!("{}/{}", base_url.path().trim_end_matches('/'), TRANSFORM_PATH);
    endpoint.set_path(&path);
    endpoint
}

/// A body that could not be read still has a meaningful status
fn unread_body(status: StatusCode, failure: RawFailure) -> RawFailure {
    if status.is_success() {
        return failure;
    }
    error!("API error ({}), body could not be read: {}", status, failure);
    RawFailure::Status {
        status: status.as_u16(),
        body: None,
    }
}

fn parse_success(text: &str) -> Result<TransformSuccess, RawFailure> {
    let response: TransformResponse =
        serde_json::from_str(text).map_err(|e| RawFailure::MalformedResponse {
            message: e.to_string(),
        })?;

    let transformed_image = decode_image_data(&response.transformed_image).map_err(|e| {
        RawFailure::MalformedResponse {
            message: e.to_string(),
        }
    })?;

    info!(
        "Transformation successful, request ID: {} ({}ms, {})",
        response.metadata.request_id,
        response.metadata.processing_time_ms,
        response.metadata.model_version
    );

    Ok(TransformSuccess {
        transformed_image,
        processing_time_ms: response.metadata.processing_time_ms,
        model_version: response.metadata.model_version,
        request_id: response.metadata.request_id,
    })
}

fn parse_failure(status: StatusCode, text: &str) -> RawFailure {
    let body = match serde_json::from_str::<ErrorResponse>(text) {
        Ok(envelope) => {
            error!(
                "API error ({}): {} [type={}, code={:?}, param={:?}]",
                status,
                envelope.error.message,
                envelope.error.error_type,
                envelope.error.code,
                envelope.error.param
            );
            Some(envelope.error)
        }
        Err(e) => {
            debug!("Unparseable error body for HTTP {}: {}", status, e);
            error!("API error ({}) without a structured body", status);
            None
        }
    };

    RawFailure::Status {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::source::{select_image, RawFile};
    use mockito::Matcher;

    fn request(glyph: &str) -> TransformRequest {
        let image = select_image(RawFile {
            name: "face.jpg".to_string(),
            media_type: "image/jpeg".to_string(),
            size: 4,
            bytes: vec![1, 2, 3, 4],
        })
        .unwrap();
        TransformRequest {
            image,
            emoji: EmojiSymbol::from_glyph(glyph).unwrap(),
        }
    }

    fn client_for(server: &mockito::Server) -> TransformClient {
        TransformClient::new(&Url::parse(&server.url()).unwrap())
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let plain = TransformClient::new(&Url::parse("https://example.com").unwrap());
        let slashed = TransformClient::new(&Url::parse("https://example.com/base/").unwrap());
        assert_eq!(plain.endpoint().as_str(), "https://example.com/api/transform");
        assert_eq!(slashed.endpoint().as_str(), "https://example.com/base/api/transform");
    }

    #[tokio::test]
    async fn test_transform_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/transform")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "image": "data:image/jpeg;base64,AQIDBA==",
                "emoji": "😀"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"transformed_image":"aGVsbG8=","metadata":{"processing_time_ms":1200,"model_version":"v1","request_id":"req-1"}}"#,
            )
            .create_async()
            .await;

        let success = client_for(&server).transform(request("😀")).await.unwrap();
        mock.assert_async().await;

        assert_eq!(success.transformed_image, b"hello");
        assert_eq!(success.processing_time_ms, 1200);
        assert_eq!(success.model_version, "v1");
        assert_eq!(success.request_id, "req-1");
    }

    #[tokio::test]
    async fn test_transform_structured_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/transform")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Daily limit reached","type":"rate_limit_error","code":"rate_limit_exceeded"}}"#)
            .create_async()
            .await;

        let failure = client_for(&server).transform(request("😡")).await.unwrap_err();
        match failure {
            RawFailure::Status { status, body: Some(body) } => {
                assert_eq!(status, 429);
                assert_eq!(body.code.as_deref(), Some("rate_limit_exceeded"));
                assert_eq!(body.message, "Daily limit reached");
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transform_unparseable_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/transform")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let failure = client_for(&server).transform(request("😢")).await.unwrap_err();
        assert_eq!(failure, RawFailure::Status { status: 500, body: None });
    }

    #[test]
    fn test_unread_error_body_keeps_status() {
        let dropped = RawFailure::Transport {
            message: "connection reset".to_string(),
            timed_out: false,
        };

        assert_eq!(
            unread_body(StatusCode::BAD_GATEWAY, dropped.clone()),
            RawFailure::Status { status: 502, body: None }
        );
        assert_eq!(unread_body(StatusCode::OK, dropped.clone()), dropped);
    }

    #[tokio::test]
    async fn test_transform_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/transform")
            .with_status(200)
            .with_body(r#"{"transformed_image":"@@@","metadata":{"processing_time_ms":1,"model_version":"v1","request_id":"r"}}"#)
            .create_async()
            .await;

        let failure = client_for(&server).transform(request("😢")).await.unwrap_err();
        assert!(matches!(failure, RawFailure::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_transform_unreachable_service() {
        // Port 9 (discard) is closed on test machines
        let client = TransformClient::new(&Url::parse("http://127.0.0.1:9").unwrap());
        let failure = client.transform(request("😀")).await.unwrap_err();
        assert!(matches!(failure, RawFailure::Transport { timed_out: false, .. }));
    }
}
