// State management module
//
// This module provides the StateManager which owns AppState behind Arc<RwLock<T>>,
// hands out independent snapshots, and emits change events when a commit
// actually changes something.

use crate::models::{AppState, ElementId, TodoList};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when a commit alters the state
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The lists or any of their items changed
    ListsChanged { list_count: usize },

    /// The active view changed (`None` is the lists view)
    ViewChanged { current_list: Option<usize> },

    /// The edit marker moved or was cleared
    EditingChanged { editing: Option<ElementId> },
}

/// A partial state used by [`StateManager::set_snapshot`].
///
/// Each field that is `Some` overwrites the matching field of the
/// authoritative state; `None` leaves it untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatePatch {
    pub lists: Option<Vec<TodoList>>,
    pub current_list: Option<Option<usize>>,
    pub editing: Option<Option<ElementId>>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(mut self, lists: Vec<TodoList>) -> Self {
        self.lists = Some(lists);
        self
    }

    pub fn current_list(mut self, current_list: Option<usize>) -> Self {
        self.current_list = Some(current_list);
        self
    }

    pub fn editing(mut self, editing: Option<ElementId>) -> Self {
        self.editing = Some(editing);
        self
    }

    /// Shorthand for clearing the edit marker.
    pub fn clear_editing(self) -> Self {
        self.editing(None)
    }

    fn apply(self, state: &mut AppState) {
        if let Some(lists) = self.lists {
            state.lists = lists;
        }
        if let Some(current_list) = self.current_list {
            state.current_list = current_list;
        }
        if let Some(editing) = self.editing {
            state.editing = editing;
        }
    }
}

/// State owner with change notification
///
/// This is the central state component that:
/// - Owns [`AppState`] behind `Arc<RwLock<T>>` (clones share the same state)
/// - Hands out deep, independent snapshots for handlers to mutate
/// - Merges committed patches and emits [`StateChange`] events
///   only when the merged state differs from the previous one
///
/// # Usage
///
/// - [`snapshot()`](Self::snapshot) to get a copy to mutate
/// - [`set_snapshot()`](Self::set_snapshot) to commit it back
/// - [`subscribe()`](Self::subscribe) to listen for commits (the renderer)
pub struct StateManager {
    state: Arc<RwLock<AppState>>,

    /// Buffer of 100 events; a single subscriber drains it after every dispatch
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with an empty state
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    /// Create a StateManager owning the given initial state
    pub fn with_state(state: AppState) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(state)),
            state_tx,
        }
    }

    /// Get an independent copy of the current state
    ///
    /// The copy can be freely mutated; nothing changes until it is committed
    /// with [`set_snapshot`](Self::set_snapshot).
    pub fn snapshot(&self) -> AppState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let list_count = state_manager.read(|state| state.lists.len());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Merge a patch into the state and emit change events
    ///
    /// 1. Captures the old state
    /// 2. Overwrites every field the patch carries
    /// 3. Compares old and new structurally
    /// 4. Emits one event per changed field group
    ///
    /// # Returns
    /// The events that were emitted (empty when nothing changed)
    pub fn set_snapshot(&self, patch: StatePatch) -> Vec<StateChange> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        patch.apply(&mut state);

        let changes = Self::detect_changes(&old_state, &state);
        drop(state);

        self.emit(&changes);
        changes
    }

    /// Replace the whole state at once (used when loading from storage)
    pub fn replace(&self, new_state: AppState) -> Vec<StateChange> {
        self.set_snapshot(
            StatePatch::new()
                .lists(new_state.lists)
                .current_list(new_state.current_list)
                .editing(new_state.editing),
        )
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn emit(&self, changes: &[StateChange]) {
        for change in changes {
            // Nobody listening is fine
            let _ = self.state_tx.send(change.clone());
        }
    }

    fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.lists != new.lists {
            changes.push(StateChange::ListsChanged {
                list_count: new.lists.len(),
            });
        }

        if old.current_list != new.current_list {
            changes.push(StateChange::ViewChanged {
                current_list: new.current_list,
            });
        }

        if old.editing != new.editing {
            changes.push(StateChange::EditingChanged {
                editing: new.editing,
            });
        }

        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_manager() {
        let manager = StateManager::new();
        let state = manager.snapshot();

        assert!(state.lists.is_empty());
        assert!(state.current_list.is_none());
        assert!(state.editing.is_none());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let manager = StateManager::new();
        let mut copy = manager.snapshot();
        copy.push_list("Groceries");

        assert!(manager.read(|s| s.lists.is_empty()));
    }

    #[test]
    fn test_set_snapshot_emits_lists_changed() {
        let manager = StateManager::new();
        let mut data = manager.snapshot();
        data.push_list("Groceries");

        let changes = manager.set_snapshot(StatePatch::new().lists(data.lists));

        assert_eq!(changes, vec![StateChange::ListsChanged { list_count: 1 }]);
        assert_eq!(manager.read(|s| s.lists[0].name.clone()), "Groceries");
    }

    #[test]
    fn test_unchanged_commit_emits_nothing() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe();

        let data = manager.snapshot();
        let changes = manager.set_snapshot(StatePatch::new().lists(data.lists).clear_editing());

        assert!(changes.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let manager = StateManager::new();
        let mut data = manager.snapshot();
        let id = data.push_list("Groceries");
        manager.set_snapshot(StatePatch::new().lists(data.lists).current_list(Some(0)));

        let changes = manager.set_snapshot(StatePatch::new().editing(Some(id)));

        assert_eq!(changes, vec![StateChange::EditingChanged { editing: Some(id) }]);
        let state = manager.snapshot();
        assert_eq!(state.lists.len(), 1);
        assert_eq!(state.current_list, Some(0));
    }

    #[test]
    fn test_multiple_field_changes() {
        let manager = StateManager::new();
        let mut data = manager.snapshot();
        let id = data.push_list("Groceries");

        let changes = manager.set_snapshot(
            StatePatch::new()
                .lists(data.lists)
                .current_list(Some(0))
                .editing(Some(id)),
        );

        assert_eq!(changes.len(), 3);
        assert!(matches!(changes[0], StateChange::ListsChanged { .. }));
        assert!(matches!(changes[1], StateChange::ViewChanged { current_list: Some(0) }));
        assert!(matches!(changes[2], StateChange::EditingChanged { .. }));
    }

    #[test]
    fn test_replace() {
        let manager = StateManager::new();
        let mut state = AppState::default();
        state.push_list("Chores");
        state.current_list = Some(0);

        manager.replace(state.clone());
        assert_eq!(manager.snapshot(), state);
    }

    #[test]
    fn test_subscribe_to_changes() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe();

        manager.set_snapshot(StatePatch::new().current_list(Some(2)));

        let event = rx.try_recv();
        assert!(event.is_ok());
        assert_eq!(
            event.unwrap(),
            StateChange::ViewChanged {
                current_list: Some(2)
            }
        );
    }

    #[test]
    fn test_clone_state_manager() {
        let manager1 = StateManager::new();
        let manager2 = manager1.clone();

        manager1.set_snapshot(StatePatch::new().current_list(Some(1)));

        assert_eq!(manager2.snapshot().current_list, Some(1));
    }
}
