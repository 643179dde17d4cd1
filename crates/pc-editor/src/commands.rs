//! Undo/Redo history.
//!
//! Every history-significant mutation records a full snapshot of the state
//! it replaced. Undo swaps the present with the newest past snapshot; redo
//! swaps it back. Mutations that leave the state unchanged record nothing.
//!
//! Resize gestures use **snapshot batching**: the state is captured once at
//! the start of the gesture, mutations are applied live, and a single entry
//! is recorded when the gesture ends.

use crate::state::{CanvasState, StateMutation};

/// Default maximum number of past snapshots kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// A stored snapshot and the label of the transition that left it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub state: CanvasState,
    pub description: String,
}

/// Bounded past/future snapshot stacks. The newest entry is last.
pub struct History {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// State captured at the start of the outermost batch.
    batch_snapshot: Option<CanvasState>,
    batch_description: String,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::with_capacity(max_depth),
            future: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_description: String::new(),
        }
    }

    /// Start a batch group. All mutations until `end_batch()` are applied
    /// live but recorded as one undo step.
    pub fn begin_batch(&mut self, state: &CanvasState, description: &str) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(state.clone());
            self.batch_description = description.to_string();
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and the state
    /// differs from the captured snapshot, one entry is recorded.
    pub fn end_batch(&mut self, state: &CanvasState) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        let Some(before) = self.batch_snapshot.take() else {
            return false;
        };
        if before == *state {
            log::debug!("batch '{}' left state unchanged", self.batch_description);
            return false;
        }
        let description = std::mem::take(&mut self.batch_description);
        self.record(before, description);
        true
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Apply `mutation` to `state` and record the replaced snapshot.
    ///
    /// Returns whether the state changed. Inside a batch the mutation is
    /// applied without recording.
    pub fn execute(&mut self, state: &mut CanvasState, mutation: StateMutation) -> bool {
        let description = mutation.description();
        if self.batch_depth > 0 {
            state.apply(mutation);
            return true;
        }

        let before = state.clone();
        state.apply(mutation);
        if *state == before {
            log::debug!("{description}: no change, nothing recorded");
            return false;
        }
        self.record(before, description.to_string());
        true
    }

    /// Restore the newest past snapshot. Returns the undone description.
    pub fn undo(&mut self, state: &mut CanvasState) -> Option<String> {
        if self.batch_depth > 0 {
            log::debug!("undo ignored during '{}'", self.batch_description);
            return None;
        }
        let entry = self.past.pop()?;
        let present = std::mem::replace(state, entry.state);
        log::debug!("undo: {}", entry.description);
        self.future.push(HistoryEntry {
            state: present,
            description: entry.description.clone(),
        });
        Some(entry.description)
    }

    /// Restore the newest future snapshot. Returns the redone description.
    pub fn redo(&mut self, state: &mut CanvasState) -> Option<String> {
        if self.batch_depth > 0 {
            log::debug!("redo ignored during '{}'", self.batch_description);
            return None;
        }
        let entry = self.future.pop()?;
        let present = std::mem::replace(state, entry.state);
        log::debug!("redo: {}", entry.description);
        self.push_past(HistoryEntry {
            state: present,
            description: entry.description.clone(),
        });
        Some(entry.description)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Past snapshots, most recent first.
    pub fn past(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.past.iter().rev()
    }

    /// Future snapshots, next redo first.
    pub fn future(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.future.iter().rev()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn record(&mut self, before: CanvasState, description: String) {
        log::debug!("record: {description}");
        self.push_past(HistoryEntry {
            state: before,
            description,
        });
        // Clear redo stack on new action
        self.future.clear();
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push(entry);
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::id::PanelId;
    use pc_core::model::{Panel, PanelShape, Rect};
    use pretty_assertions::assert_eq;

    fn add(id: &str) -> StateMutation {
        StateMutation::AddPanel(Box::new(Panel::new(
            PanelId::intern(id),
            PanelShape::Rectangle,
            Rect::new(0.0, 0.0, 100.0, 100.0),
        )))
    }

    #[test]
    fn execute_then_undo_restores() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        let original = state.clone();

        assert!(history.execute(&mut state, add("h1")));
        assert_eq!(state.panels.len(), 1);
        assert_eq!(history.undo(&mut state).as_deref(), Some("Add panel"));
        assert_eq!(state, original);
        assert!(history.can_redo());
    }

    #[test]
    fn redo_reapplies() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        history.execute(&mut state, add("h2"));
        let after = state.clone();
        history.undo(&mut state);
        assert_eq!(history.redo(&mut state).as_deref(), Some("Add panel"));
        assert_eq!(state, after);
        assert!(!history.can_redo());
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn new_action_clears_future() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        history.execute(&mut state, add("h3"));
        history.undo(&mut state);
        assert_eq!(history.future_len(), 1);
        history.execute(&mut state, add("h4"));
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn unchanged_state_records_nothing() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        let changed = history.execute(
            &mut state,
            StateMutation::RemovePanel {
                id: PanelId::intern("nobody"),
            },
        );
        assert!(!changed);
        assert_eq!(history.past_len(), 0);
    }

    #[test]
    fn depth_is_capped() {
        let mut state = CanvasState::new();
        let mut history = History::new(3);
        for i in 0..5 {
            history.execute(&mut state, add(&format!("cap-{i}")));
        }
        assert_eq!(history.past_len(), 3);
        // Oldest two snapshots were evicted.
        let oldest = history.past().last().map(|e| e.state.panels.len());
        assert_eq!(oldest, Some(2));
    }

    #[test]
    fn batch_records_one_entry() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        history.execute(&mut state, add("b1"));
        let before = state.clone();

        history.begin_batch(&state, "Resize panel");
        for w in [120.0, 140.0, 160.0] {
            history.execute(
                &mut state,
                StateMutation::UpdatePanelDimensions {
                    id: PanelId::intern("b1"),
                    width: w,
                    height: 100.0,
                },
            );
        }
        assert!(history.end_batch(&state));
        assert_eq!(history.past_len(), 2);
        assert_eq!(state.panels[0].width, 160.0);

        assert_eq!(history.undo(&mut state).as_deref(), Some("Resize panel"));
        assert_eq!(state, before);
    }

    #[test]
    fn empty_batch_records_nothing() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        history.begin_batch(&state, "Resize panel");
        assert!(!history.end_batch(&state));
        assert_eq!(history.past_len(), 0);
        assert!(!history.is_batching());
    }

    #[test]
    fn undo_is_ignored_mid_batch() {
        let mut state = CanvasState::new();
        let mut history = History::default();
        history.execute(&mut state, add("b2"));
        history.begin_batch(&state, "Resize panel");
        assert_eq!(history.undo(&mut state), None);
        history.end_batch(&state);
        assert!(history.undo(&mut state).is_some());
    }
}
