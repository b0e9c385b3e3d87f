//! How the selector picks this run's index and the index shown next.

use log::debug;
use serde::{Deserialize, Serialize};

use super::state::SelectorState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Internal cursor drives auto-increment; a UI index that differs from the
    /// last pushed one is taken as a manual override.
    #[default]
    Decoupled,
    /// The UI index is the index used; the cursor is never consulted.
    UiAuthoritative,
}

/// What to do when the host supplies no node identifier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierPolicy {
    /// Fall back to the instance id, then to a generated token.
    #[default]
    Lenient,
    /// Fall back to the instance id only, otherwise fail the invocation.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub use_index: usize,
    /// Index the UI should display after this run.
    pub next_ui_index: usize,
    pub manual_override: bool,
}

/// Clamps a UI index into `[0, len)`. `len` must be non-zero.
pub fn clamp_index(requested: i64, len: usize) -> usize {
    if requested <= 0 {
        0
    } else {
        (requested as u64).min(len as u64 - 1) as usize
    }
}

impl SelectionPolicy {
    /// Picks the index for this run. `state.words` must be non-empty.
    pub fn select(self, state: &mut SelectorState, requested: i64, auto_increment: bool) -> Selection {
        let len = state.words.len();
        let clamped = clamp_index(requested, len);

        match self {
            SelectionPolicy::UiAuthoritative => {
                let next_ui_index = if auto_increment {
                    (clamped + 1) % len
                } else {
                    clamped
                };
                Selection {
                    use_index: clamped,
                    next_ui_index,
                    manual_override: false,
                }
            }
            SelectionPolicy::Decoupled if auto_increment => {
                let manual_override =
                    matches!(state.last_pushed_ui_index, Some(pushed) if pushed != clamped);
                let use_index = if manual_override {
                    debug!(
                        "PromptSelector: manual change to {} (last pushed {:?})",
                        clamped, state.last_pushed_ui_index
                    );
                    clamped
                } else {
                    state.cursor_index % len
                };
                state.cursor_index = (use_index + 1) % len;
                Selection {
                    use_index,
                    next_ui_index: state.cursor_index,
                    manual_override,
                }
            }
            SelectionPolicy::Decoupled => {
                state.cursor_index = clamped;
                Selection {
                    use_index: clamped,
                    next_ui_index: clamped,
                    manual_override: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(words: &[&str]) -> SelectorState {
        let mut state = SelectorState::default();
        state.sync_words(&words.join("\n"));
        state
    }

    #[test]
    fn clamp_covers_negative_and_overflow() {
        assert_eq!(clamp_index(-5, 4), 0);
        assert_eq!(clamp_index(0, 4), 0);
        assert_eq!(clamp_index(2, 4), 2);
        assert_eq!(clamp_index(999, 4), 3);
        assert_eq!(clamp_index(i64::MAX, 1), 0);
    }

    #[test]
    fn decoupled_auto_walks_the_cursor_and_wraps() {
        let mut state = state_with(&["a", "b", "c"]);
        let mut used = Vec::new();
        let mut ui = 0;
        for _ in 0..4 {
            let sel = SelectionPolicy::Decoupled.select(&mut state, ui, true);
            used.push(sel.use_index);
            ui = sel.next_ui_index as i64;
            state.last_pushed_ui_index = Some(sel.next_ui_index);
        }
        assert_eq!(used, vec![0, 1, 2, 0]);
    }

    #[test]
    fn decoupled_without_push_history_ignores_ui_index() {
        let mut state = state_with(&["a", "b", "c"]);
        let sel = SelectionPolicy::Decoupled.select(&mut state, 2, true);
        assert_eq!(sel.use_index, 0);
        assert!(!sel.manual_override);
    }

    #[test]
    fn decoupled_override_resumes_after_edited_index() {
        let mut state = state_with(&["a", "b", "c", "d"]);
        state.last_pushed_ui_index = Some(1);
        state.cursor_index = 1;
        let sel = SelectionPolicy::Decoupled.select(&mut state, 3, true);
        assert!(sel.manual_override);
        assert_eq!(sel.use_index, 3);
        assert_eq!(sel.next_ui_index, 0);
        assert_eq!(state.cursor_index, 0);
    }

    #[test]
    fn decoupled_manual_mode_pins_cursor() {
        let mut state = state_with(&["a", "b", "c"]);
        let sel = SelectionPolicy::Decoupled.select(&mut state, 7, false);
        assert_eq!(sel.use_index, 2);
        assert_eq!(sel.next_ui_index, 2);
        assert_eq!(state.cursor_index, 2);
    }

    #[test]
    fn ui_authoritative_uses_supplied_index() {
        let mut state = state_with(&["a", "b", "c"]);
        state.cursor_index = 1;
        let sel = SelectionPolicy::UiAuthoritative.select(&mut state, 2, true);
        assert_eq!(sel.use_index, 2);
        assert_eq!(sel.next_ui_index, 0);
        let sel = SelectionPolicy::UiAuthoritative.select(&mut state, 1, false);
        assert_eq!(sel.use_index, 1);
        assert_eq!(sel.next_ui_index, 1);
        assert_eq!(state.cursor_index, 1);
    }
}
