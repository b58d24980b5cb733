/// Emoji picker: search box, "Recently Used" row and the catalog grid
use iced::widget::{button, column, container, text, text_input, Column};
use iced::{Element, Length};
use iced_aw::Wrap;

use crate::emoji::{search, EmojiSymbol, RecencyList};
use crate::Message;

/// Size of the emoji glyphs in the grid
const GLYPH_SIZE: u16 = 32;

pub fn view<'a>(query: &'a str, recent: &'a RecencyList) -> Element<'a, Message> {
    let search_box = text_input("Search emojis...", query)
        .on_input(Message::SearchChanged)
        .padding(12)
        .size(18);

    let mut content: Column<Message> = column![search_box].spacing(20);

    // Recents only make sense next to the unfiltered catalog
    if !recent.is_empty() && query.is_empty() {
        content = content.push(
            column![
                text("Recently Used").size(14).style(text::secondary),
                grid(recent.iter()),
            ]
            .spacing(8),
        );
    }

    let matches: Vec<EmojiSymbol> = search(query).collect();
    let catalog: Element<Message> = if matches.is_empty() {
        text(format!("No emojis found matching \"{}\"", query))
            .style(text::secondary)
            .into()
    } else {
        grid(matches.into_iter())
    };

    content = content.push(
        container(catalog)
            .padding(16)
            .width(Length::Fill)
            .style(container::rounded_box),
    );

    content.into()
}

fn grid<'a>(symbols: impl Iterator<Item = EmojiSymbol>) -> Element<'a, Message> {
    let buttons: Vec<Element<Message>> = symbols.map(emoji_button).collect();
    Wrap::with_elements(buttons)
        .spacing(8.0)
        .line_spacing(8.0)
        .into()
}

fn emoji_button<'a>(symbol: EmojiSymbol) -> Element<'a, Message> {
    button(text(symbol.glyph()).size(GLYPH_SIZE))
        .on_press(Message::EmojiChosen(symbol))
        .padding(8)
        .style(button::text)
        .into()
}
