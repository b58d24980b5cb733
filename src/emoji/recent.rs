/// Recently used emoji
///
/// A short most-recent-first list that survives restarts. The list itself
/// is plain data; `RecentEmojis` pairs it with the store it is persisted to.

use tracing::{debug, warn};

use super::catalog::EmojiSymbol;
use crate::state::store::Store;

/// Bounded, deduplicated, most-recent-first list of symbols
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecencyList {
    symbols: Vec<EmojiSymbol>,
}

impl RecencyList {
    /// Maximum number of remembered symbols
    pub const CAPACITY: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from persisted glyph strings
    ///
    /// Unknown glyphs are dropped, later duplicates are dropped, and the
    /// result is truncated to capacity. Order is preserved.
    pub fn from_glyphs<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut symbols: Vec<EmojiSymbol> = Vec::with_capacity(Self::CAPACITY);
        for glyph in glyphs {
            if symbols.len() == Self::CAPACITY {
                break;
            }
            match EmojiSymbol::from_glyph(glyph.as_ref()) {
                Some(symbol) if !symbols.contains(&symbol) => symbols.push(symbol),
                Some(_) => {}
                None => debug!("Dropping unknown recent emoji {:?}", glyph.as_ref()),
            }
        }
        Self { symbols }
    }

    /// Move `symbol` to the front, inserting it if absent
    pub fn record_use(&mut self, symbol: EmojiSymbol) {
        self.symbols.retain(|existing| *existing != symbol);
        self.symbols.insert(0, symbol);
        self.symbols.truncate(Self::CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = EmojiSymbol> + '_ {
        self.symbols.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Glyph strings in list order, the persisted representation
    pub fn glyphs(&self) -> Vec<&'static str> {
        self.symbols.iter().map(|symbol| symbol.glyph()).collect()
    }
}

/// The recency list together with its backing store
///
/// Loaded once at startup. `record_use` is the only mutation and writes
/// through immediately.
pub struct RecentEmojis {
    list: RecencyList,
    store: Store,
}

impl RecentEmojis {
    /// Load the persisted list, starting empty if it cannot be read
    pub fn load(store: Store) -> Self {
        let list = match store.load_recent_emojis() {
            Ok(list) => list,
            Err(e) => {
                warn!("⚠️  Could not load recent emojis, starting fresh: {}", e);
                RecencyList::new()
            }
        };
        debug!("Loaded {} recent emojis", list.len());
        Self { list, store }
    }

    pub fn list(&self) -> &RecencyList {
        &self.list
    }

    /// Record a selection and persist the updated list
    ///
    /// A failed write is logged; the in-memory list is still updated.
    pub fn record_use(&mut self, symbol: EmojiSymbol) -> &RecencyList {
        self.list.record_use(symbol);
        if let Err(e) = self.store.save_recent_emojis(&self.list) {
            warn!("⚠️  Could not persist recent emojis: {}", e);
        }
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::catalog::CATALOG;
    use proptest::prelude::*;

    fn sym(glyph: &str) -> EmojiSymbol {
        EmojiSymbol::from_glyph(glyph).unwrap()
    }

    #[test]
    fn test_record_use_moves_existing_to_front() {
        let mut list = RecencyList::new();
        list.record_use(sym("😀"));
        list.record_use(sym("😡"));
        list.record_use(sym("😀"));
        assert_eq!(list.glyphs(), vec!["😀", "😡"]);
    }

    #[test]
    fn test_record_use_drops_oldest_past_capacity() {
        let mut list = RecencyList::new();
        for symbol in CATALOG.iter().take(9) {
            list.record_use(*symbol);
        }
        assert_eq!(list.len(), RecencyList::CAPACITY);
        assert_eq!(list.iter().next(), Some(CATALOG[8]));
        assert!(!list.iter().any(|s| s == CATALOG[0]));
    }

    #[test]
    fn test_from_glyphs_sanitizes() {
        let list = RecencyList::from_glyphs(["😀", "🍌", "😀", "😡"]);
        assert_eq!(list.glyphs(), vec!["😀", "😡"]);
    }

    #[test]
    fn test_recent_emojis_persist_through_store() {
        let store = Store::in_memory().unwrap();
        let mut recent = RecentEmojis::load(store);
        recent.record_use(sym("😢"));
        recent.record_use(sym("😊"));

        let reloaded = recent.store.load_recent_emojis().unwrap();
        assert_eq!(reloaded.glyphs(), vec!["😊", "😢"]);
    }

    proptest! {
        #[test]
        fn prop_recency_invariant(picks in proptest::collection::vec(0usize..CATALOG.len(), 1..60)) {
            let mut list = RecencyList::new();
            for &index in &picks {
                list.record_use(CATALOG[index]);
            }

            let glyphs = list.glyphs();
            let mut unique = glyphs.clone();
            unique.sort_unstable();
            unique.dedup();

            prop_assert_eq!(unique.len(), glyphs.len());
            prop_assert!(list.len() <= RecencyList::CAPACITY);
            prop_assert_eq!(list.iter().next(), Some(CATALOG[*picks.last().unwrap()]));
        }
    }
}
