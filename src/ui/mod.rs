/// View builders, one per workflow screen
///
/// - `emoji_grid` - search box, recents and catalog
/// - `error_panel` - the `Failed` screen
/// - `result_view` - original vs transformed comparison
///
/// The smaller screens (step indicator, quota banner, upload, processing)
/// live here.

pub mod emoji_grid;
pub mod error_panel;
pub mod result_view;

use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::emoji::EmojiSymbol;
use crate::photo::ValidationError;
use crate::state::workflow::WorkflowState;
use crate::Message;

/// Step indicator: Upload Image, Select Emoji, Get Result
pub fn steps(state: &WorkflowState) -> Element<Message> {
    let active = match state {
        WorkflowState::SelectingImage => Some(1),
        WorkflowState::SelectingEmoji { .. } => Some(2),
        WorkflowState::Result { .. } => Some(3),
        WorkflowState::Processing { .. } | WorkflowState::Failed { .. } => None,
    };

    row![
        step(1, "Upload Image", active),
        text("→").style(text::secondary),
        step(2, "Select Emoji", active),
        text("→").style(text::secondary),
        step(3, "Get Result", active),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
    .into()
}

fn step<'a>(number: u8, label: &'static str, active: Option<u8>) -> Element<'a, Message> {
    let style = if active == Some(number) {
        text::primary
    } else {
        text::secondary
    };
    row![
        text(number.to_string()).size(16).style(style),
        text(label).size(14).style(style),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Shown while the daily allowance is used up
pub fn quota_banner<'a>() -> Element<'a, Message> {
    container(
        text("You've reached the daily limit of 5 transformations. Try again tomorrow!")
            .style(text::danger),
    )
    .padding(16)
    .style(container::rounded_box)
    .into()
}

/// `SelectingImage`: pick or drop a photo
pub fn upload(error: Option<&ValidationError>) -> Element<Message> {
    let drop_zone = container(
        column![
            text("📸").size(64),
            text("Drop your image here").size(22),
            button("Browse...")
                .on_press(Message::PickImage)
                .padding(10)
                .style(button::primary),
            text("Supports JPG, PNG, GIF, WebP (max 10MB)")
                .size(12)
                .style(text::secondary),
        ]
        .spacing(16)
        .align_x(Alignment::Center),
    )
    .padding(48)
    .width(Length::Fill)
    .center_x(Length::Fill)
    .style(container::rounded_box);

    let mut content: Column<Message> = column![drop_zone].spacing(16).max_width(640);

    if let Some(error) = error {
        content = content.push(text(error.to_string()).style(text::danger));
    }

    content.into()
}

/// `Processing`: the chosen emoji and a waiting message
pub fn processing<'a>(emoji: EmojiSymbol) -> Element<'a, Message> {
    column![
        text(emoji.glyph()).size(72),
        text("Transforming your image...").size(18).style(text::secondary),
    ]
    .spacing(16)
    .align_x(Alignment::Center)
    .into()
}
