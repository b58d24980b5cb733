/// Transformation workflow
///
/// The five-state machine behind the whole app:
///
/// ```text
/// SelectingImage -> SelectingEmoji -> Processing -> Result
///                                        ^    \
///                                 retry  |     -> Failed
///                                        +--------/
/// ```
///
/// `Result` and `Failed` go back to `SelectingImage` through `reset`.
/// The controller never performs I/O itself: entering `Processing` hands
/// out a `TransformTicket` that the caller runs, and the outcome comes back
/// through `complete` tagged with the ticket's token.

use tracing::{debug, info, warn};

use crate::api::{classify, ErrorDescriptor, RawFailure, TransformRequest, TransformSuccess};
use crate::emoji::EmojiSymbol;
use crate::photo::{ImagePayload, ValidationError};

/// Exactly one of these is active at a time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    SelectingImage,
    SelectingEmoji {
        image: ImagePayload,
    },
    Processing {
        image: ImagePayload,
        emoji: EmojiSymbol,
        token: u64,
    },
    Result {
        image: ImagePayload,
        emoji: EmojiSymbol,
        transformed_image: Vec<u8>,
        processing_time_ms: u64,
    },
    Failed {
        image: ImagePayload,
        emoji: EmojiSymbol,
        error: ErrorDescriptor,
    },
}

impl WorkflowState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::SelectingImage => "SelectingImage",
            WorkflowState::SelectingEmoji { .. } => "SelectingEmoji",
            WorkflowState::Processing { .. } => "Processing",
            WorkflowState::Result { .. } => "Result",
            WorkflowState::Failed { .. } => "Failed",
        }
    }

    /// The selected image, present in every state but `SelectingImage`
    pub fn image(&self) -> Option<&ImagePayload> {
        match self {
            WorkflowState::SelectingImage => None,
            WorkflowState::SelectingEmoji { image }
            | WorkflowState::Processing { image, .. }
            | WorkflowState::Result { image, .. }
            | WorkflowState::Failed { image, .. } => Some(image),
        }
    }

    /// The chosen emoji, present from `Processing` onward
    pub fn emoji(&self) -> Option<EmojiSymbol> {
        match self {
            WorkflowState::SelectingImage | WorkflowState::SelectingEmoji { .. } => None,
            WorkflowState::Processing { emoji, .. }
            | WorkflowState::Result { emoji, .. }
            | WorkflowState::Failed { emoji, .. } => Some(*emoji),
        }
    }

    /// The failure descriptor, only in `Failed`
    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            WorkflowState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// A request the caller must run, tagged with the token `complete` expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformTicket {
    pub token: u64,
    pub request: TransformRequest,
}

/// Owner of the workflow state and everything reachable from it
#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    /// "requests remaining = 0" after a quota failure
    quota_exhausted: bool,
    /// Pre-workflow upload error, shown next to the upload control
    validation_error: Option<ValidationError>,
    /// An image is being read; further picks and drops are ignored
    image_loading: bool,
    next_token: u64,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn quota_exhausted(&self) -> bool {
        self.quota_exhausted
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    /// Whether a retry would be accepted right now
    pub fn can_retry(&self) -> bool {
        self.state.error().is_some_and(ErrorDescriptor::is_retryable)
    }

    /// Claim the single image load slot
    ///
    /// Only one file is read at a time, and only in `SelectingImage`.
    /// Returns false when the load should not start.
    pub fn begin_image_load(&mut self) -> bool {
        if !matches!(self.state, WorkflowState::SelectingImage) {
            warn!("Ignoring image while in {}", self.state.name());
            return false;
        }
        if self.image_loading {
            debug!("Ignoring image, another one is still loading");
            return false;
        }
        self.image_loading = true;
        true
    }

    /// Feed the outcome of image selection
    ///
    /// A valid image moves `SelectingImage` to `SelectingEmoji`. A
    /// validation error is kept for display and the state does not move.
    /// Returns true when the state changed.
    pub fn image_selected(&mut self, selection: Result<ImagePayload, ValidationError>) -> bool {
        self.image_loading = false;
        if !matches!(self.state, WorkflowState::SelectingImage) {
            warn!("Ignoring image selection while in {}", self.state.name());
            return false;
        }

        match selection {
            Ok(image) => {
                self.validation_error = None;
                self.transition(WorkflowState::SelectingEmoji { image });
                true
            }
            Err(e) => {
                match &e {
                    ValidationError::NotAnImage { media_type } => {
                        info!("Image rejected: {} is not an image type", media_type)
                    }
                    ValidationError::TooLarge { size } => {
                        info!("Image rejected: {} bytes is over the limit", size)
                    }
                    ValidationError::ReadFailure(reason) => warn!("Image could not be read: {}", reason),
                }
                self.validation_error = Some(e);
                false
            }
        }
    }

    /// Choose an emoji for the selected image
    ///
    /// Only valid in `SelectingEmoji`; returns the request to run.
    pub fn emoji_chosen(&mut self, emoji: EmojiSymbol) -> Option<TransformTicket> {
        let WorkflowState::SelectingEmoji { image } = &self.state else {
            warn!("Ignoring emoji {} while in {}", emoji, self.state.name());
            return None;
        };
        let image = image.clone();
        Some(self.start_processing(image, emoji))
    }

    /// Re-run the failed request with the same image and emoji
    ///
    /// Rejected unless the current failure is retryable.
    pub fn retry(&mut self) -> Option<TransformTicket> {
        let WorkflowState::Failed { image, emoji, error } = &self.state else {
            warn!("Ignoring retry while in {}", self.state.name());
            return None;
        };
        if !error.is_retryable() {
            warn!("Retry refused for non-retryable failure {}", error.kind);
            return None;
        }

        let (image, emoji) = (image.clone(), *emoji);
        info!("🔁 Retrying {} with the same image", emoji);
        Some(self.start_processing(image, emoji))
    }

    /// Apply the outcome of the request issued with `token`
    ///
    /// Outcomes for anything but the current in-flight request are stale
    /// and dropped. Returns true when the outcome was applied.
    pub fn complete(&mut self, token: u64, outcome: Result<TransformSuccess, RawFailure>) -> bool {
        let (image, emoji) = match std::mem::take(&mut self.state) {
            WorkflowState::Processing { image, emoji, token: current } if current == token => {
                (image, emoji)
            }
            other => {
                debug!(
                    "Discarding stale transform outcome (token {}, state {})",
                    token,
                    other.name()
                );
                self.state = other;
                return false;
            }
        };

        let next = match outcome {
            Ok(success) => {
                debug!(
                    "Transform {} done by {} in {}ms",
                    success.request_id, success.model_version, success.processing_time_ms
                );
                WorkflowState::Result {
                    image,
                    emoji,
                    transformed_image: success.transformed_image,
                    processing_time_ms: success.processing_time_ms,
                }
            }
            Err(failure) => {
                let error = classify(&failure);
                warn!("Transform failed ({}): {} [{}]", failure, error.message, error.kind);
                if error.quota_exhausted {
                    self.quota_exhausted = true;
                }
                WorkflowState::Failed { image, emoji, error }
            }
        };
        // `self.state` was taken above
        debug!("Workflow: Processing -> {}", next.name());
        self.state = next;
        true
    }

    /// Start over from any state
    ///
    /// Discards image, emoji, result, error and the quota flag. An
    /// in-flight request is abandoned; its outcome will be discarded.
    pub fn reset(&mut self) {
        self.validation_error = None;
        self.quota_exhausted = false;
        self.image_loading = false;
        self.transition(WorkflowState::SelectingImage);
    }

    fn start_processing(&mut self, image: ImagePayload, emoji: EmojiSymbol) -> TransformTicket {
        self.next_token += 1;
        let token = self.next_token;
        let request = TransformRequest {
            image: image.clone(),
            emoji,
        };
        self.transition(WorkflowState::Processing { image, emoji, token });
        TransformTicket { token, request }
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!("Workflow: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ErrorDetail;
    use crate::api::{ErrorKind, TransformClient};
    use crate::photo::source::{select_image, RawFile};
    use reqwest::Url;

    fn image(media_type: &str, size: u64) -> Result<ImagePayload, ValidationError> {
        select_image(RawFile {
            name: "face".to_string(),
            media_type: media_type.to_string(),
            size,
            bytes: vec![0xFF, 0xD8, 0xFF],
        })
    }

    fn emoji(glyph: &str) -> EmojiSymbol {
        EmojiSymbol::from_glyph(glyph).unwrap()
    }

    fn success(ms: u64) -> TransformSuccess {
        TransformSuccess {
            transformed_image: b"png".to_vec(),
            processing_time_ms: ms,
            model_version: "v1".to_string(),
            request_id: "req-1".to_string(),
        }
    }

    fn coded_failure(code: &str) -> RawFailure {
        RawFailure::Status {
            status: 422,
            body: Some(ErrorDetail {
                message: format!("{} happened", code),
                error_type: "test".to_string(),
                param: None,
                code: Some(code.to_string()),
                suggestion: None,
            }),
        }
    }

    /// Controller parked in `Failed` with the given failure
    fn failed_with(failure: RawFailure) -> WorkflowController {
        let mut controller = WorkflowController::new();
        controller.image_selected(image("image/png", 1024));
        let ticket = controller.emoji_chosen(emoji("😀")).unwrap();
        assert!(controller.complete(ticket.token, Err(failure)));
        controller
    }

    #[test]
    fn test_valid_image_moves_to_emoji_selection() {
        let mut controller = WorkflowController::new();
        assert!(controller.image_selected(image("image/jpeg", 2 * 1024 * 1024)));
        assert!(matches!(controller.state(), WorkflowState::SelectingEmoji { .. }));
        assert!(controller.validation_error().is_none());
    }

    #[test]
    fn test_invalid_image_stays_in_image_selection() {
        let mut controller = WorkflowController::new();
        assert!(!controller.image_selected(image("text/plain", 10)));
        assert_eq!(controller.state(), &WorkflowState::SelectingImage);
        assert!(matches!(
            controller.validation_error(),
            Some(ValidationError::NotAnImage { .. })
        ));

        // A later valid image clears the stale error
        controller.image_selected(image("image/png", 10));
        assert!(controller.validation_error().is_none());
    }

    #[test]
    fn test_one_image_load_at_a_time() {
        let mut controller = WorkflowController::new();
        assert!(controller.begin_image_load());
        // Second file of a multi-file drop
        assert!(!controller.begin_image_load());

        assert!(controller.image_selected(image("image/png", 10)));
        // Image chosen, nothing more to load
        assert!(!controller.begin_image_load());

        controller.reset();
        assert!(controller.begin_image_load());
    }

    #[test]
    fn test_rejected_image_frees_the_load_slot() {
        let mut controller = WorkflowController::new();
        assert!(controller.begin_image_load());
        controller.image_selected(image("text/plain", 10));
        assert!(controller.begin_image_load());
    }

    #[test]
    fn test_emoji_choice_enters_processing_exactly_once() {
        let mut controller = WorkflowController::new();
        controller.image_selected(image("image/png", 1024));
        let selected = controller.state().image().cloned().unwrap();

        let ticket = controller.emoji_chosen(emoji("😀")).unwrap();
        assert_eq!(ticket.request.image, selected);
        assert_eq!(ticket.request.emoji, emoji("😀"));
        assert_eq!(
            controller.state(),
            &WorkflowState::Processing {
                image: selected,
                emoji: emoji("😀"),
                token: ticket.token,
            }
        );

        // No second request while one is in flight
        assert!(controller.emoji_chosen(emoji("😡")).is_none());
        assert_eq!(controller.state().emoji(), Some(emoji("😀")));
    }

    #[test]
    fn test_emoji_ignored_without_image() {
        let mut controller = WorkflowController::new();
        assert!(controller.emoji_chosen(emoji("😀")).is_none());
        assert_eq!(controller.state(), &WorkflowState::SelectingImage);
    }

    #[test]
    fn test_scenario_success_result() {
        let mut controller = WorkflowController::new();
        controller.image_selected(image("image/jpeg", 2 * 1024 * 1024));
        let ticket = controller.emoji_chosen(emoji("😀")).unwrap();

        assert!(controller.complete(ticket.token, Ok(success(1200))));
        match controller.state() {
            WorkflowState::Result { processing_time_ms, emoji: chosen, .. } => {
                assert_eq!(*processing_time_ms, 1200);
                assert_eq!(*chosen, emoji("😀"));
            }
            other => panic!("expected Result, got {other:?}"),
        }
        assert!(!controller.quota_exhausted());
    }

    #[test]
    fn test_scenario_rate_limit_locks_out() {
        let controller = failed_with(RawFailure::Status {
            status: 429,
            body: Some(ErrorDetail {
                message: "Daily limit reached".to_string(),
                error_type: "rate_limit_error".to_string(),
                param: None,
                code: Some("rate_limit_exceeded".to_string()),
                suggestion: None,
            }),
        });

        let error = controller.state().error().unwrap();
        assert_eq!(error.kind, ErrorKind::RateLimitExceeded);
        assert!(controller.quota_exhausted());
        assert!(!controller.can_retry());
    }

    #[test]
    fn test_scenario_server_error_is_retryable() {
        let controller = failed_with(RawFailure::Status { status: 500, body: None });
        let error = controller.state().error().unwrap();
        assert_eq!(error.kind, ErrorKind::Unclassified);
        assert_eq!(error.message, "HTTP error! status: 500");
        assert!(controller.can_retry());
        assert!(!controller.quota_exhausted());
    }

    #[test]
    fn test_retry_reuses_image_and_emoji() {
        let mut controller = failed_with(coded_failure("ai_timeout"));
        let image_before = controller.state().image().cloned().unwrap();

        let ticket = controller.retry().unwrap();
        assert_eq!(ticket.request.image, image_before);
        assert_eq!(ticket.request.emoji, emoji("😀"));
        assert!(matches!(controller.state(), WorkflowState::Processing { .. }));
        assert!(controller.state().error().is_none());

        // Retries are unlimited for retryable kinds
        controller.complete(ticket.token, Err(coded_failure("ai_timeout")));
        assert!(controller.retry().is_some());
    }

    #[test]
    fn test_retry_gated_for_non_retryable_kinds() {
        for code in ["rate_limit_exceeded", "content_filtered"] {
            let mut controller = failed_with(coded_failure(code));
            assert!(controller.retry().is_none(), "{code}");
            assert!(matches!(controller.state(), WorkflowState::Failed { .. }));
        }
    }

    #[test]
    fn test_reset_from_every_state() {
        let states: Vec<WorkflowController> = vec![
            WorkflowController::new(),
            {
                let mut c = WorkflowController::new();
                c.image_selected(image("image/png", 1));
                c
            },
            {
                let mut c = WorkflowController::new();
                c.image_selected(image("image/png", 1));
                c.emoji_chosen(emoji("😀"));
                c
            },
            {
                let mut c = WorkflowController::new();
                c.image_selected(image("image/png", 1));
                let ticket = c.emoji_chosen(emoji("😀")).unwrap();
                c.complete(ticket.token, Ok(success(5)));
                c
            },
            failed_with(coded_failure("rate_limit_exceeded")),
            {
                let mut c = WorkflowController::new();
                c.image_selected(image("video/mp4", 1));
                c
            },
        ];

        for mut controller in states {
            controller.reset();
            assert_eq!(controller.state(), &WorkflowState::SelectingImage);
            assert!(controller.state().image().is_none());
            assert!(controller.state().emoji().is_none());
            assert!(controller.state().error().is_none());
            assert!(controller.validation_error().is_none());
            assert!(!controller.quota_exhausted());

            controller.reset();
            assert_eq!(controller.state(), &WorkflowState::SelectingImage);
        }
    }

    #[test]
    fn test_late_response_after_reset_is_discarded() {
        let mut controller = WorkflowController::new();
        controller.image_selected(image("image/png", 1));
        let stale = controller.emoji_chosen(emoji("😀")).unwrap();
        controller.reset();

        controller.image_selected(image("image/png", 2));
        let fresh = controller.emoji_chosen(emoji("😡")).unwrap();
        assert_ne!(stale.token, fresh.token);

        assert!(!controller.complete(stale.token, Ok(success(1))));
        assert!(matches!(controller.state(), WorkflowState::Processing { .. }));

        assert!(controller.complete(fresh.token, Ok(success(2))));
        assert!(matches!(controller.state(), WorkflowState::Result { .. }));
    }

    #[tokio::test]
    async fn test_end_to_end_against_service() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/transform")
            .with_status(200)
            .with_body(r#"{"transformed_image":"cG5n","metadata":{"processing_time_ms":1200,"model_version":"v1","request_id":"req-9"}}"#)
            .create_async()
            .await;
        let client = TransformClient::new(&Url::parse(&server.url()).unwrap());

        let mut controller = WorkflowController::new();
        controller.image_selected(image("image/jpeg", 2 * 1024 * 1024));
        let ticket = controller.emoji_chosen(emoji("😀")).unwrap();
        let outcome = client.transform(ticket.request).await;
        controller.complete(ticket.token, outcome);

        assert!(matches!(
            controller.state(),
            WorkflowState::Result { processing_time_ms: 1200, .. }
        ));
    }
}
