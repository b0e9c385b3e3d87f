//! Per-node selector state and the store that owns it.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Splits on newlines, trims each line and drops the blank ones.
pub fn parse_replacement_words(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorState {
    pub words: Vec<String>,
    /// Raw text the word list was parsed from, `None` before the first run.
    pub last_raw_text: Option<String>,
    /// Next index the auto-increment sequence will use.
    pub cursor_index: usize,
    /// Index last delivered to the UI, used to spot manual edits.
    pub last_pushed_ui_index: Option<usize>,
}

impl SelectorState {
    /// Reparses the word list when `raw` differs from the cached text,
    /// resetting the cursor and override tracking. Returns whether it did.
    pub fn sync_words(&mut self, raw: &str) -> bool {
        if self.last_raw_text.as_deref() == Some(raw) {
            return false;
        }
        self.words = parse_replacement_words(raw);
        self.last_raw_text = Some(raw.to_string());
        self.cursor_index = 0;
        self.last_pushed_ui_index = None;
        true
    }
}

/// Keyed storage of `SelectorState`, one entry per node identifier.
///
/// Entries live as long as the store; the host keeps one store per process.
pub trait SelectorStateStore: Send + Sync {
    fn load(&self, node_id: &str) -> Option<SelectorState>;
    fn save(&self, node_id: &str, state: SelectorState);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemoryStateStore {
    states: Mutex<HashMap<String, SelectorState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectorStateStore for InMemoryStateStore {
    fn load(&self, node_id: &str) -> Option<SelectorState> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(node_id)
            .cloned()
    }

    fn save(&self, node_id: &str, state: SelectorState) {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(node_id.to_string(), state);
    }

    fn len(&self) -> usize {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_blank_lines_and_trims() {
        let words = parse_replacement_words("  sunset \n\n\t\r\ndawn\r\n   \nnoon");
        assert_eq!(words, vec!["sunset", "dawn", "noon"]);
        assert!(parse_replacement_words(" \n \t ").is_empty());
    }

    #[test]
    fn sync_resets_cursor_only_on_change() {
        let mut state = SelectorState::default();
        assert!(state.sync_words("a\nb"));
        state.cursor_index = 1;
        state.last_pushed_ui_index = Some(1);

        assert!(!state.sync_words("a\nb"));
        assert_eq!(state.cursor_index, 1);

        assert!(state.sync_words("a\nb\nc"));
        assert_eq!(state.cursor_index, 0);
        assert_eq!(state.last_pushed_ui_index, None);
        assert_eq!(state.words.len(), 3);
    }

    #[test]
    fn empty_text_still_counts_as_seen() {
        let mut state = SelectorState::default();
        assert!(state.sync_words(""));
        assert!(!state.sync_words(""));
        assert!(state.words.is_empty());
    }

    #[test]
    fn store_keeps_nodes_apart() {
        let store = InMemoryStateStore::new();
        assert!(store.is_empty());
        let mut a = SelectorState::default();
        a.cursor_index = 2;
        store.save("a", a.clone());
        store.save("b", SelectorState::default());
        assert_eq!(store.load("a"), Some(a));
        assert_eq!(store.load("b").map(|s| s.cursor_index), Some(0));
        assert_eq!(store.load("c"), None);
        assert_eq!(store.len(), 2);
    }
}
