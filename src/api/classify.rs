/// Error classification
///
/// Every failed transform attempt is reduced to exactly one
/// `ErrorDescriptor` here. Downstream code (the workflow and the UI)
/// only ever looks at `ErrorKind`, never at status codes or raw text.

use super::client::RawFailure;

/// Generic message when nothing better is known
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to transform image";

/// Closed set of failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RateLimitExceeded,
    InvalidImageFormat,
    UnsupportedImageType,
    ImageTooLarge,
    GeminiApiError,
    GeminiQuotaExceeded,
    ContentFiltered,
    NoFacesDetected,
    TransformationFailed,
    AiTimeout,
    /// Anything without a recognized code
    Unclassified,
}

impl ErrorKind {
    /// All kinds, in policy table order
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::RateLimitExceeded,
        ErrorKind::InvalidImageFormat,
        ErrorKind::UnsupportedImageType,
        ErrorKind::ImageTooLarge,
        ErrorKind::GeminiApiError,
        ErrorKind::GeminiQuotaExceeded,
        ErrorKind::ContentFiltered,
        ErrorKind::NoFacesDetected,
        ErrorKind::TransformationFailed,
        ErrorKind::AiTimeout,
        ErrorKind::Unclassified,
    ];

    /// Map a service `code` to a kind
    ///
    /// The deployed service reports content filtering and upstream
    /// timeouts as `gemini_content_filtered` / `gemini_timeout`; both are
    /// accepted alongside the canonical codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "gemini_content_filtered" => Some(ErrorKind::ContentFiltered),
            "gemini_timeout" => Some(ErrorKind::AiTimeout),
            _ => Self::ALL.into_iter().find(|kind| kind.code() == Some(code)),
        }
    }

    /// Canonical code, None for unclassified failures
    pub fn code(self) -> Option<&'static str> {
        match self {
            ErrorKind::RateLimitExceeded => Some("rate_limit_exceeded"),
            ErrorKind::InvalidImageFormat => Some("invalid_image_format"),
            ErrorKind::UnsupportedImageType => Some("unsupported_image_type"),
            ErrorKind::ImageTooLarge => Some("image_too_large"),
            ErrorKind::GeminiApiError => Some("gemini_api_error"),
            ErrorKind::GeminiQuotaExceeded => Some("gemini_quota_exceeded"),
            ErrorKind::ContentFiltered => Some("content_filtered"),
            ErrorKind::NoFacesDetected => Some("no_faces_detected"),
            ErrorKind::TransformationFailed => Some("transformation_failed"),
            ErrorKind::AiTimeout => Some("ai_timeout"),
            ErrorKind::Unclassified => None,
        }
    }

    /// Whether the user may retry the same image and emoji
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::RateLimitExceeded | ErrorKind::ContentFiltered)
    }

    /// Whether this failure means the daily allowance is used up
    pub fn causes_quota_lockout(self) -> bool {
        matches!(self, ErrorKind::RateLimitExceeded)
    }

    /// Suggestion shown when the service did not send one
    pub fn default_suggestion(self) -> Option<&'static str> {
        let suggestion = match self {
            ErrorKind::RateLimitExceeded => "Please wait until tomorrow to make more requests.",
            ErrorKind::InvalidImageFormat => "Please upload a valid image file (JPEG, PNG, or WebP).",
            ErrorKind::UnsupportedImageType => "Please upload a JPEG, PNG, or WebP image.",
            ErrorKind::ImageTooLarge => "Please upload a smaller image (max 10MB).",
            ErrorKind::GeminiApiError => {
                "The AI service is experiencing issues. Please try again in a few minutes."
            }
            ErrorKind::GeminiQuotaExceeded => {
                "The AI service is at capacity. Please try again in a few hours."
            }
            ErrorKind::ContentFiltered => {
                "Try using a different image or emoji that follows our content guidelines."
            }
            ErrorKind::NoFacesDetected => "Please upload an image with a clear face.",
            ErrorKind::TransformationFailed => "Please try with a different emoji or image.",
            ErrorKind::AiTimeout => "Please try again with a simpler image.",
            ErrorKind::Unclassified => return None,
        };
        Some(suggestion)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code().unwrap_or("unclassified"))
    }
}

/// UI-ready description of one failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: Option<String>,
    pub quota_exhausted: bool,
}

impl ErrorDescriptor {
    /// Build a descriptor; the policy flags come from `kind` alone
    pub fn new(kind: ErrorKind, message: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: suggestion.or_else(|| kind.default_suggestion().map(str::to_string)),
            quota_exhausted: kind.causes_quota_lockout(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Classify a failed transform attempt
///
/// 1. A structured body with a recognized `code` decides the kind.
/// 2. Otherwise, text loosely mentioning "rate limit" is treated as a
///    rate limit.
/// 3. Otherwise the failure is unclassified: the body's message if any,
///    else a message derived from the HTTP status, else a generic one.
///
/// Transport timeouts count as `ai_timeout`.
pub fn classify(failure: &RawFailure) -> ErrorDescriptor {
    match failure {
        RawFailure::Status { status, body } => {
            let status_message = format!("HTTP error! status: {}", status);
            if let Some(detail) = body {
                let message = if detail.message.trim().is_empty() {
                    status_message.clone()
                } else {
                    detail.message.clone()
                };
                if let Some(kind) = detail.code.as_deref().and_then(ErrorKind::from_code) {
                    return ErrorDescriptor::new(kind, message, detail.suggestion.clone());
                }
                if mentions_rate_limit(&detail.message) {
                    return ErrorDescriptor::new(
                        ErrorKind::RateLimitExceeded,
                        message,
                        detail.suggestion.clone(),
                    );
                }
                if !detail.message.trim().is_empty() {
                    return ErrorDescriptor::new(
                        ErrorKind::Unclassified,
                        message,
                        detail.suggestion.clone(),
                    );
                }
            }
            ErrorDescriptor::new(
                ErrorKind::Unclassified,
                status_message,
                None,
            )
        }
        RawFailure::Transport { message, timed_out } => {
            if *timed_out {
                ErrorDescriptor::new(ErrorKind::AiTimeout, "AI service took too long to respond.", None)
            } else if mentions_rate_limit(message) {
                ErrorDescriptor::new(ErrorKind::RateLimitExceeded, message.clone(), None)
            } else {
                ErrorDescriptor::new(ErrorKind::Unclassified, GENERIC_FAILURE_MESSAGE, None)
            }
        }
        RawFailure::MalformedResponse { .. } => {
            ErrorDescriptor::new(ErrorKind::Unclassified, GENERIC_FAILURE_MESSAGE, None)
        }
    }
}

/// Lenient text heuristic kept for servers that omit the code
// TODO: drop once every deployed transform service sends `code` on 429s
fn mentions_rate_limit(text: &str) -> bool {
    text.to_lowercase().contains("rate limit")
}
