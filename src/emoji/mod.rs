/// Emoji selection module
///
/// This module handles:
/// - The fixed catalog of expression emoji and name search (catalog.rs)
/// - The persisted "Recently Used" list (recent.rs)

pub mod catalog;
pub mod recent;

pub use catalog::{search, EmojiSymbol};
pub use recent::{RecencyList, RecentEmojis};
