/// Fixed catalog of facial-expression emoji
///
/// The catalog is process-wide constant data: every symbol the user can
/// pick, in display order, with the name used for search and accessibility.

/// A single expression symbol from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmojiSymbol {
    glyph: &'static str,
    name: &'static str,
}

impl EmojiSymbol {
    const fn new(glyph: &'static str, name: &'static str) -> Self {
        Self { glyph, name }
    }

    /// The emoji itself (one code point or a short sequence)
    pub fn glyph(&self) -> &'static str {
        self.glyph
    }

    /// Stable display name (e.g. "Grinning")
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve a glyph string back to its catalog entry
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        CATALOG.iter().copied().find(|symbol| symbol.glyph == glyph)
    }
}

impl std::fmt::Display for EmojiSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph)
    }
}

/// Every selectable symbol, in declaration (display) order
pub const CATALOG: [EmojiSymbol; 89] = [
    EmojiSymbol::new("😀", "Grinning"),
    EmojiSymbol::new("😃", "Happy"),
    EmojiSymbol::new("😄", "Smile"),
    EmojiSymbol::new("😁", "Beaming"),
    EmojiSymbol::new("😆", "Laughing"),
    EmojiSymbol::new("😅", "Sweat Smile"),
    EmojiSymbol::new("😂", "Joy"),
    EmojiSymbol::new("🤣", "Rolling"),
    EmojiSymbol::new("😊", "Blush"),
    EmojiSymbol::new("😇", "Innocent"),
    EmojiSymbol::new("🙂", "Slight Smile"),
    EmojiSymbol::new("🙃", "Upside Down"),
    EmojiSymbol::new("😉", "Wink"),
    EmojiSymbol::new("😌", "Relieved"),
    EmojiSymbol::new("😍", "Heart Eyes"),
    EmojiSymbol::new("🥰", "Smiling Hearts"),
    EmojiSymbol::new("😘", "Kiss"),
    EmojiSymbol::new("😗", "Kissing"),
    EmojiSymbol::new("😙", "Kiss Smile"),
    EmojiSymbol::new("😚", "Kiss Closed"),
    EmojiSymbol::new("😋", "Yum"),
    EmojiSymbol::new("😛", "Tongue"),
    EmojiSymbol::new("😝", "Tongue Wink"),
    EmojiSymbol::new("😜", "Crazy"),
    EmojiSymbol::new("🤪", "Zany"),
    EmojiSymbol::new("🤨", "Raised Eyebrow"),
    EmojiSymbol::new("🧐", "Monocle"),
    EmojiSymbol::new("🤓", "Nerd"),
    EmojiSymbol::new("😎", "Cool"),
    EmojiSymbol::new("🤩", "Star Eyes"),
    EmojiSymbol::new("🥳", "Party"),
    EmojiSymbol::new("😏", "Smirk"),
    EmojiSymbol::new("😒", "Unamused"),
    EmojiSymbol::new("😞", "Disappointed"),
    EmojiSymbol::new("😔", "Pensive"),
    EmojiSymbol::new("😟", "Worried"),
    EmojiSymbol::new("😕", "Confused"),
    EmojiSymbol::new("🙁", "Frown"),
    EmojiSymbol::new("☹️", "Sad"),
    EmojiSymbol::new("😣", "Persevere"),
    EmojiSymbol::new("😖", "Confounded"),
    EmojiSymbol::new("😫", "Tired"),
    EmojiSymbol::new("😩", "Weary"),
    EmojiSymbol::new("🥺", "Pleading"),
    EmojiSymbol::new("😢", "Cry"),
    EmojiSymbol::new("😭", "Sob"),
    EmojiSymbol::new("😤", "Triumph"),
    EmojiSymbol::new("😠", "Angry"),
    EmojiSymbol::new("😡", "Rage"),
    EmojiSymbol::new("🤬", "Cursing"),
    EmojiSymbol::new("🤯", "Exploding"),
    EmojiSymbol::new("😳", "Flushed"),
    EmojiSymbol::new("🥵", "Hot"),
    EmojiSymbol::new("🥶", "Cold"),
    EmojiSymbol::new("😱", "Scream"),
    EmojiSymbol::new("😨", "Fearful"),
    EmojiSymbol::new("😰", "Anxious"),
    EmojiSymbol::new("😥", "Sad Sweat"),
    EmojiSymbol::new("😓", "Sweat"),
    EmojiSymbol::new("🤗", "Hug"),
    EmojiSymbol::new("🤔", "Thinking"),
    EmojiSymbol::new("🤭", "Hand Mouth"),
    EmojiSymbol::new("🤫", "Shush"),
    EmojiSymbol::new("🤥", "Lying"),
    EmojiSymbol::new("😶", "No Mouth"),
    EmojiSymbol::new("😐", "Neutral"),
    EmojiSymbol::new("😑", "Expressionless"),
    EmojiSymbol::new("😬", "Grimace"),
    EmojiSymbol::new("🙄", "Eye Roll"),
    EmojiSymbol::new("😯", "Hushed"),
    EmojiSymbol::new("😦", "Frowning"),
    EmojiSymbol::new("😧", "Anguished"),
    EmojiSymbol::new("😮", "Open Mouth"),
    EmojiSymbol::new("😲", "Astonished"),
    EmojiSymbol::new("🥱", "Yawn"),
    EmojiSymbol::new("😴", "Sleep"),
    EmojiSymbol::new("🤤", "Drool"),
    EmojiSymbol::new("😪", "Sleepy"),
    EmojiSymbol::new("😵", "Dizzy"),
    EmojiSymbol::new("🤐", "Zipper"),
    EmojiSymbol::new("🥴", "Woozy"),
    EmojiSymbol::new("🤢", "Nauseated"),
    EmojiSymbol::new("🤮", "Vomit"),
    EmojiSymbol::new("🤧", "Sneeze"),
    EmojiSymbol::new("😷", "Mask"),
    EmojiSymbol::new("🤒", "Thermometer"),
    EmojiSymbol::new("🤕", "Bandage"),
    EmojiSymbol::new("🤑", "Money"),
    EmojiSymbol::new("🤠", "Cowboy"),
];

/// Search the catalog by display name
///
/// Case-insensitive substring match. An empty query yields the whole
/// catalog in declaration order. The returned iterator is lazy and can be
/// cloned to restart it.
pub fn search(query: &str) -> Search {
    Search {
        needle: query.to_lowercase(),
        position: 0,
    }
}

/// Lazy iterator returned by [`search`]
#[derive(Debug, Clone)]
pub struct Search {
    needle: String,
    position: usize,
}

impl Iterator for Search {
    type Item = EmojiSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(symbol) = CATALOG.get(self.position) {
            self.position += 1;
            if self.needle.is_empty() || symbol.name.to_lowercase().contains(&self.needle) {
                return Some(*symbol);
            }
        }
        None
    }
}
