/// Failure panel for the `Failed` workflow state
///
/// Titles and icons are chosen from the error kind. The retry button only
/// exists when the controller would accept a retry.
use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::api::{ErrorDescriptor, ErrorKind};
use crate::Message;

pub fn view(error: &ErrorDescriptor, can_retry: bool) -> Element<Message> {
    let mut content: Column<Message> = column![
        text(icon(error.kind)).size(64),
        text(title(error.kind)).size(24),
        text(error.message.as_str()).style(text::secondary),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    if let Some(suggestion) = &error.suggestion {
        content = content.push(
            container(row![text("💡"), text(suggestion.as_str()).size(14)].spacing(8))
                .padding(12)
                .style(container::rounded_box),
        );
    }

    let retry = can_retry.then(|| {
        button("Try Again")
            .on_press(Message::Retry)
            .padding(10)
            .style(button::primary)
    });

    let reset_label = if error.kind == ErrorKind::RateLimitExceeded {
        "Try Tomorrow"
    } else {
        "Start Over"
    };
    let reset = button(reset_label)
        .on_press(Message::Reset)
        .padding(10)
        .style(button::secondary);

    content = content.push(row![].push_maybe(retry).push(reset).spacing(16));

    if error.kind == ErrorKind::RateLimitExceeded {
        content = content.push(
            text("Rate limits reset daily at midnight UTC")
                .size(12)
                .style(text::secondary),
        );
    }

    container(content)
        .padding(32)
        .max_width(480)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

pub fn title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::RateLimitExceeded => "Rate Limit Reached",
        ErrorKind::InvalidImageFormat => "Invalid Image Format",
        ErrorKind::UnsupportedImageType => "Unsupported Image Type",
        ErrorKind::ImageTooLarge => "Image Too Large",
        ErrorKind::GeminiApiError => "AI Service Unavailable",
        ErrorKind::GeminiQuotaExceeded => "AI Service Busy",
        ErrorKind::ContentFiltered => "Content Filtered",
        ErrorKind::NoFacesDetected => "No Faces Detected",
        ErrorKind::TransformationFailed => "Transformation Failed",
        ErrorKind::AiTimeout => "Request Timeout",
        ErrorKind::Unclassified => "Something Went Wrong",
    }
}

fn icon(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::RateLimitExceeded => "⏰",
        ErrorKind::InvalidImageFormat
        | ErrorKind::UnsupportedImageType
        | ErrorKind::ImageTooLarge => "📷",
        ErrorKind::GeminiApiError | ErrorKind::GeminiQuotaExceeded => "🤖",
        ErrorKind::ContentFiltered => "🚫",
        ErrorKind::NoFacesDetected => "👤",
        ErrorKind::TransformationFailed => "🎭",
        ErrorKind::AiTimeout => "⏳",
        ErrorKind::Unclassified => "😕",
    }
}
