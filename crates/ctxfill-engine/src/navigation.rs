//! Keyboard navigation over the visible candidate list.

use ctxfill_core::{CompletionError, EngineConfig, Result};

use crate::candidates::Candidate;

/// Keys the completion popup reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Up,
    Down,
    Enter,
    Tab,
    Escape,
    Backspace,
    Other,
}

/// What the popup does with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Not handled; the host applies its default behavior
    PassThrough,
    SelectPrevious,
    SelectNext,
    Commit,
    Dismiss,
}

impl KeyAction {
    /// Whether the host should suppress its own handling of the key
    pub fn prevents_default(self) -> bool {
        !matches!(self, KeyAction::PassThrough)
    }
}

/// Maps keys to actions while the popup is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Enter is left to the host instead of committing
    pub pass_through_enter: bool,
    /// Tab is left to the host instead of committing
    pub pass_through_tab: bool,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pass_through_enter: false,
            pass_through_tab: true,
        }
    }
}

impl From<&EngineConfig> for KeyBindings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            pass_through_enter: config.pass_through_enter(),
            pass_through_tab: config.pass_through_tab(),
        }
    }
}

impl KeyBindings {
    pub fn action(&self, key: NavigationKey, visible: bool) -> KeyAction {
        if !visible {
            return KeyAction::PassThrough;
        }
        match key {
            NavigationKey::Up => KeyAction::SelectPrevious,
            NavigationKey::Down => KeyAction::SelectNext,
            NavigationKey::Enter if !self.pass_through_enter => KeyAction::Commit,
            NavigationKey::Tab if !self.pass_through_tab => KeyAction::Commit,
            NavigationKey::Escape => KeyAction::Dismiss,
            // Backspace edits the buffer; the host reports the edit and a
            // rescan follows
            _ => KeyAction::PassThrough,
        }
    }
}

/// Selection state of the candidate popup.
///
/// The selected index always lies inside the visible window while the
/// window is non-empty.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    candidates: Vec<Candidate>,
    selected: usize,
    visible: bool,
    max_options: usize,
}

impl NavigationState {
    /// `max_options` caps the visible window; 0 means unlimited
    pub fn new(max_options: usize) -> Self {
        Self {
            max_options,
            ..Self::default()
        }
    }

    /// Replace the candidate list.
    ///
    /// The selection resets to the first entry when the list changed or the
    /// popup was hidden, and the popup is shown exactly when the list is
    /// non-empty.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        let changed = self.candidates.len() != candidates.len()
            || self
                .candidates
                .iter()
                .zip(&candidates)
                .any(|(old, new)| old.name != new.name);

        self.candidates = candidates;
        // Becoming visible always starts at the first entry
        if changed || !self.visible || self.selected >= self.window_len() {
            self.selected = 0;
        }
        self.visible = !self.candidates.is_empty();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// All matching candidates, including those past the visible window
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidates shown in the popup
    pub fn visible_window(&self) -> &[Candidate] {
        &self.candidates[..self.window_len()]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Candidate> {
        if !self.visible {
            return None;
        }
        self.visible_window().get(self.selected)
    }

    pub fn cycle_down(&mut self) {
        let len = self.window_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    pub fn cycle_up(&mut self) {
        let len = self.window_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + len - 1) % len;
    }

    /// Select an entry of the visible window; `false` when out of range
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.window_len() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Take the selected candidate and hide the popup
    pub fn commit(&mut self) -> Result<Candidate> {
        let len = self.window_len();
        let candidate = self
            .visible_window()
            .get(self.selected)
            .cloned()
            .ok_or(CompletionError::EmptyCandidateSelection {
                index: self.selected,
                len,
            })?;
        self.hide();
        Ok(candidate)
    }

    /// Hide and forget the candidate list
    pub fn cancel(&mut self) {
        self.candidates.clear();
        self.selected = 0;
        self.visible = false;
    }

    /// Hide the popup, keeping the candidates around
    pub fn hide(&mut self) {
        self.visible = false;
    }

    fn window_len(&self) -> usize {
        match self.max_options {
            0 => self.candidates.len(),
            max => self.candidates.len().min(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxfill_core::NodeKind;
    use pretty_assertions::assert_eq;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            kind: NodeKind::String,
            has_children: false,
            highlight: None,
        }
    }

    fn state(names: &[&str], max: usize) -> NavigationState {
        let mut state = NavigationState::new(max);
        state.set_candidates(names.iter().map(|n| candidate(n)).collect());
        state
    }

    #[test]
    fn test_cycling_wraps() {
        let mut nav = state(&["a", "b", "c"], 0);
        assert_eq!(nav.selected_index(), 0);

        nav.cycle_up();
        assert_eq!(nav.selected_index(), 2);
        nav.cycle_down();
        assert_eq!(nav.selected_index(), 0);
        nav.cycle_down();
        nav.cycle_down();
        nav.cycle_down();
        assert_eq!(nav.selected_index(), 0);
    }

    #[test]
    fn test_window_caps_selection() {
        let mut nav = state(&["a", "b", "c", "d", "e", "f"], 4);
        assert_eq!(nav.candidates().len(), 6);
        assert_eq!(nav.visible_window().len(), 4);

        for _ in 0..10 {
            nav.cycle_down();
            assert!(nav.selected_index() < 4);
        }
        assert!(!nav.select(5));
        assert!(nav.select(3));
        assert_eq!(nav.selected().unwrap().name, "d");
    }

    #[test]
    fn test_empty_list_hides() {
        let mut nav = state(&[], 4);
        assert!(!nav.is_visible());
        nav.cycle_down();
        nav.cycle_up();
        assert_eq!(nav.selected_index(), 0);
        assert!(nav.selected().is_none());
        assert!(matches!(
            nav.commit(),
            Err(CompletionError::EmptyCandidateSelection { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_selection_resets_when_list_changes() {
        let mut nav = state(&["a", "b", "c"], 0);
        nav.cycle_down();
        nav.cycle_down();

        // Same names keep the selection
        nav.set_candidates(vec![candidate("a"), candidate("b"), candidate("c")]);
        assert_eq!(nav.selected_index(), 2);

        nav.set_candidates(vec![candidate("b"), candidate("c")]);
        assert_eq!(nav.selected_index(), 0);
    }

    #[test]
    fn test_commit_hides() {
        let mut nav = state(&["a", "b"], 0);
        nav.cycle_down();
        let picked = nav.commit().unwrap();
        assert_eq!(picked.name, "b");
        assert!(!nav.is_visible());
        assert!(nav.selected().is_none());
    }

    #[test]
    fn test_reshown_list_starts_at_first_entry() {
        let mut nav = state(&["a", "b"], 0);
        nav.cycle_down();
        assert_eq!(nav.commit().unwrap().name, "b");

        // Same names as before the commit, but the popup was hidden
        nav.set_candidates(vec![candidate("a"), candidate("b")]);
        assert!(nav.is_visible());
        assert_eq!(nav.selected_index(), 0);

        nav.cycle_down();
        nav.hide();
        nav.set_candidates(vec![candidate("a"), candidate("b")]);
        assert_eq!(nav.selected_index(), 0);
    }

    #[test]
    fn test_cancel_clears() {
        let mut nav = state(&["a"], 0);
        nav.cancel();
        assert!(!nav.is_visible());
        assert!(nav.candidates().is_empty());
    }

    #[test]
    fn test_key_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action(NavigationKey::Down, true), KeyAction::SelectNext);
        assert_eq!(keys.action(NavigationKey::Up, true), KeyAction::SelectPrevious);
        assert_eq!(keys.action(NavigationKey::Enter, true), KeyAction::Commit);
        assert_eq!(keys.action(NavigationKey::Tab, true), KeyAction::PassThrough);
        assert_eq!(keys.action(NavigationKey::Escape, true), KeyAction::Dismiss);
        assert_eq!(keys.action(NavigationKey::Backspace, true), KeyAction::PassThrough);
        assert_eq!(keys.action(NavigationKey::Enter, false), KeyAction::PassThrough);

        let tab_commits = KeyBindings {
            pass_through_enter: true,
            pass_through_tab: false,
        };
        assert_eq!(tab_commits.action(NavigationKey::Tab, true), KeyAction::Commit);
        assert_eq!(tab_commits.action(NavigationKey::Enter, true), KeyAction::PassThrough);
        assert!(!KeyAction::PassThrough.prevents_default());
        assert!(KeyAction::Commit.prevents_default());
    }
}
