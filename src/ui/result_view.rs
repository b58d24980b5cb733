/// Comparison of the original and transformed image
///
/// Either side by side, or stacked with a slider that fades from the
/// original to the transformed image.
use iced::widget::{button, column, container, image, row, slider, stack, text, Column};
use iced::{Alignment, Element, Length};

use crate::photo::output::ImageInfo;
use crate::Message;

/// Maximum height of each image in the comparison
const IMAGE_HEIGHT: f32 = 420.0;

/// How the two images are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    #[default]
    SideBySide,
    Slider,
}

/// Slider position when a result is first shown, in percent
pub const DEFAULT_BLEND: f32 = 50.0;

pub fn view<'a>(
    original: &'a image::Handle,
    transformed: &'a image::Handle,
    mode: CompareMode,
    blend: f32,
    processing_time_ms: u64,
    info: Option<&ImageInfo>,
    status: Option<&'a str>,
) -> Element<'a, Message> {
    let toggle = row![
        mode_button("Side by Side", CompareMode::SideBySide, mode),
        mode_button("Slider", CompareMode::Slider, mode),
    ]
    .spacing(8);

    let comparison: Element<Message> = match mode {
        CompareMode::SideBySide => row![
            labeled("Original", original),
            labeled("Transformed", transformed),
        ]
        .spacing(24)
        .into(),
        CompareMode::Slider => faded(original, transformed, blend),
    };

    let mut details = format!("Processed in {}", format_seconds(processing_time_ms));
    if let Some(info) = info {
        details.push_str(&format!(
            " • {}×{} {}",
            info.width,
            info.height,
            info.format.to_mime_type()
        ));
    }

    let actions = row![
        button("Download Result")
            .on_press(Message::SaveResult)
            .padding(10)
            .style(button::success),
        button("Transform Another")
            .on_press(Message::Reset)
            .padding(10)
            .style(button::secondary),
    ]
    .spacing(16);

    let mut content: Column<Message> = column![
        toggle,
        container(comparison).padding(24).style(container::rounded_box),
        text(details).size(14).style(text::secondary),
        actions,
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    if let Some(status) = status {
        content = content.push(text(status).size(14));
    }

    content.into()
}

fn labeled<'a>(label: &'a str, handle: &'a image::Handle) -> Element<'a, Message> {
    column![
        text(label).size(14).style(text::secondary),
        image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_HEIGHT)),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .width(Length::FillPortion(1))
    .into()
}

fn mode_button<'a>(label: &'a str, target: CompareMode, current: CompareMode) -> Element<'a, Message> {
    let style = if target == current {
        button::primary
    } else {
        button::secondary
    };
    button(text(label).size(14))
        .on_press(Message::CompareModeChanged(target))
        .padding([6, 12])
        .style(style)
        .into()
}

/// Transformed image over the original, `blend` percent opaque
fn faded<'a>(
    original: &'a image::Handle,
    transformed: &'a image::Handle,
    blend: f32,
) -> Element<'a, Message> {
    let layer = |handle: &image::Handle| {
        image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_HEIGHT))
    };

    column![
        stack![layer(original), layer(transformed).opacity(blend_opacity(blend))],
        row![
            text("Original").size(12).style(text::secondary),
            slider(0.0..=100.0, blend, Message::BlendChanged).width(Length::Fill),
            text("Transformed").size(12).style(text::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ]
    .spacing(12)
    .width(Length::Fill)
    .into()
}

/// Slider percent to layer opacity, clamped to 0..=1
fn blend_opacity(blend: f32) -> f32 {
    (blend / 100.0).clamp(0.0, 1.0)
}

/// "1.2 seconds"
fn format_seconds(ms: u64) -> String {
    format!("{:.1} seconds", ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(1200), "1.2 seconds");
        assert_eq!(format_seconds(0), "0.0 seconds");
        assert_eq!(format_seconds(15_040), "15.0 seconds");
    }

    #[test]
    fn test_blend_opacity() {
        assert_eq!(blend_opacity(0.0), 0.0);
        assert_eq!(blend_opacity(DEFAULT_BLEND), 0.5);
        assert_eq!(blend_opacity(100.0), 1.0);
        assert_eq!(blend_opacity(140.0), 1.0);
        assert_eq!(blend_opacity(-5.0), 0.0);
    }

    #[test]
    fn test_side_by_side_is_the_default_mode() {
        assert_eq!(CompareMode::default(), CompareMode::SideBySide);
    }
}
