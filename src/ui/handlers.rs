// Event handlers
//
// Every handler follows the same discipline: take a snapshot, mutate the
// copy, commit it back with StateManager::set_snapshot. Nothing mutates the
// authoritative state in place. Controls address elements by ElementId; an id
// that no longer resolves is logged and ignored.

use crate::models::{AppState, ElementId};
use crate::render::{ADD_ITEMS_FORM, ADD_LISTS_FORM, ITEM_CHECKBOX_PREFIX};
use crate::state::{StateChange, StateManager, StatePatch};
use crate::ui::dialog::Confirm;

/// What a handler did with an event
#[derive(Clone, Debug, PartialEq)]
pub enum HandlerOutcome {
    /// A new snapshot was committed (the changes may be empty if it was identical)
    Committed(Vec<StateChange>),

    /// The event did not concern this handler, or its target no longer exists
    Ignored,

    /// The user declined the confirmation prompt
    Declined,
}

impl HandlerOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// Combine the outcomes of two handlers that saw the same event.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Committed(mut a), Self::Committed(b)) => {
                a.extend(b);
                Self::Committed(a)
            }
            (committed @ Self::Committed(_), _) | (_, committed @ Self::Committed(_)) => committed,
            (Self::Declined, _) | (_, Self::Declined) => Self::Declined,
            _ => Self::Ignored,
        }
    }
}

/// Which sequence a delete control targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteScope {
    /// Items of the active list in the items view, lists otherwise (`data-delete`)
    View,
    /// Always an item of the active list (`data-delete-item`)
    Item,
    /// Always a list (`data-delete-list`)
    List,
}

fn parse_id(raw: &str) -> Option<ElementId> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!("Ignoring control with malformed id {:?}", raw);
            None
        }
    }
}

/// Add a new item or list, or save the name of the one being edited.
///
/// Blank input (after trimming) and unknown forms are ignored.
pub fn add_item_or_list(state: &StateManager, form_id: &str, value: &str) -> HandlerOutcome {
    let name = value.trim();
    if name.is_empty() {
        tracing::debug!("Ignoring blank submission on {}", form_id);
        return HandlerOutcome::Ignored;
    }

    let mut data = state.snapshot();
    let editing = data.editing;

    if form_id == ADD_ITEMS_FORM {
        let Some(list) = data.active_list_mut() else {
            tracing::warn!("Item submitted without an active list");
            return HandlerOutcome::Ignored;
        };

        match editing.and_then(|id| list.position_of(id)) {
            Some(position) => {
                let item = &mut list.items[position];
                tracing::info!("Renaming item {} to {:?}", item.id, name);
                item.name = name.to_string();
            }
            None => {
                let id = list.push_item(name);
                tracing::info!("Added item {} to {:?}", id, list.name);
            }
        }
    } else if form_id == ADD_LISTS_FORM {
        match editing.and_then(|id| data.position_of_list(id)) {
            Some(position) => {
                let list = &mut data.lists[position];
                tracing::info!("Renaming list {} to {:?}", list.id, name);
                list.name = name.to_string();
            }
            None => {
                let id = data.push_list(name);
                tracing::info!("Created list {} ({:?})", id, name);
            }
        }
    } else {
        tracing::debug!("Ignoring submission from unknown form {:?}", form_id);
        return HandlerOutcome::Ignored;
    }

    HandlerOutcome::Committed(
        state.set_snapshot(StatePatch::new().lists(data.lists).clear_editing()),
    )
}

/// Write a checkbox's state into the matching item's `done` flag.
pub fn toggle_item(
    state: &StateManager,
    target_id: &str,
    input_type: &str,
    checked: bool,
) -> HandlerOutcome {
    if input_type != "checkbox" {
        return HandlerOutcome::Ignored;
    }

    let Some(id) = target_id
        .strip_prefix(ITEM_CHECKBOX_PREFIX)
        .and_then(parse_id)
    else {
        return HandlerOutcome::Ignored;
    };

    let mut data = state.snapshot();
    let Some(item) = data.active_list_mut().and_then(|list| list.item_mut(id)) else {
        tracing::warn!("Toggle for unknown item {}", id);
        return HandlerOutcome::Ignored;
    };

    item.done = checked;
    tracing::info!("Item {} done={}", id, checked);

    HandlerOutcome::Committed(state.set_snapshot(StatePatch::new().lists(data.lists)))
}

/// Mark an item (items view) or a list (lists view) as being edited.
pub fn edit_item_or_list(state: &StateManager, raw_id: &str) -> HandlerOutcome {
    let Some(id) = parse_id(raw_id) else {
        return HandlerOutcome::Ignored;
    };

    let exists = state.read(|data| match data.current_list {
        Some(_) => data
            .active_list()
            .is_some_and(|list| list.item(id).is_some()),
        None => data.list(id).is_some(),
    });

    if !exists {
        tracing::warn!("Edit for unknown element {}", id);
        return HandlerOutcome::Ignored;
    }

    tracing::debug!("Editing {}", id);
    HandlerOutcome::Committed(state.set_snapshot(StatePatch::new().editing(Some(id))))
}

/// Delete an item or a list after the user confirms.
pub fn delete_item_or_list(
    state: &StateManager,
    raw_id: &str,
    scope: DeleteScope,
    confirm: &dyn Confirm,
) -> HandlerOutcome {
    let Some(id) = parse_id(raw_id) else {
        return HandlerOutcome::Ignored;
    };

    let mut data = state.snapshot();
    let delete_item = match scope {
        DeleteScope::View => data.is_items_view(),
        DeleteScope::Item => true,
        DeleteScope::List => false,
    };

    let position = if delete_item {
        data.active_list().and_then(|list| list.position_of(id))
    } else {
        data.position_of_list(id)
    };

    let Some(position) = position else {
        tracing::warn!("Delete for unknown element {}", id);
        return HandlerOutcome::Ignored;
    };

    let kind = if delete_item { "item" } else { "list" };
    let message = format!("Are you sure you want to delete this {kind}? This cannot be reversed.");
    if !confirm.confirm(&message) {
        tracing::debug!("Delete of {} {} declined", kind, id);
        return HandlerOutcome::Declined;
    }

    let mut patch = StatePatch::new();
    if delete_item {
        if let Some(list) = data.active_list_mut() {
            list.remove_item(position);
        }
    } else {
        data.remove_list(position);
        if let Some(current_list) = adjust_current_list(&data, position) {
            patch = patch.current_list(current_list);
        }
    }

    tracing::info!("Deleted {} {} at position {}", kind, id, position);
    HandlerOutcome::Committed(state.set_snapshot(patch.lists(data.lists).clear_editing()))
}

/// Keep the items view on the same list after a list at `removed` is gone.
///
/// Returns the new selector when it has to move: back to the lists view if
/// the active list itself was removed, one down if an earlier list was.
fn adjust_current_list(data: &AppState, removed: usize) -> Option<Option<usize>> {
    let current = data.current_list?;
    if current == removed {
        Some(None)
    } else if current > removed {
        Some(Some(current - 1))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dialog::{AlwaysConfirm, MockConfirm, NeverConfirm};

    fn manager_with(lists: &[(&str, &[&str])]) -> StateManager {
        let mut state = AppState::default();
        for (name, items) in lists {
            state.push_list(*name);
            let list = state.lists.last_mut().unwrap();
            for item in *items {
                list.push_item(*item);
            }
        }
        StateManager::with_state(state)
    }

    fn open_list(manager: &StateManager, index: usize) {
        manager.set_snapshot(StatePatch::new().current_list(Some(index)));
    }

    #[test]
    fn test_add_list() {
        let manager = StateManager::new();

        let outcome = add_item_or_list(&manager, ADD_LISTS_FORM, "Groceries");

        assert_eq!(
            outcome,
            HandlerOutcome::Committed(vec![StateChange::ListsChanged { list_count: 1 }])
        );
        let state = manager.snapshot();
        assert_eq!(state.lists[0].name, "Groceries");
        assert!(state.lists[0].items.is_empty());
    }

    #[test]
    fn test_add_blank_is_ignored() {
        let manager = manager_with(&[("Groceries", &["Milk"])]);
        open_list(&manager, 0);
        let before = manager.snapshot();

        assert_eq!(add_item_or_list(&manager, ADD_ITEMS_FORM, "   \t"), HandlerOutcome::Ignored);
        assert_eq!(add_item_or_list(&manager, ADD_LISTS_FORM, ""), HandlerOutcome::Ignored);
        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_add_item_appends_unfinished() {
        let manager = manager_with(&[("Groceries", &["Milk"])]);
        open_list(&manager, 0);

        let outcome = add_item_or_list(&manager, ADD_ITEMS_FORM, "  Eggs  ");

        assert!(outcome.is_committed());
        let items = manager.read(|s| s.lists[0].items.clone());
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Eggs");
        assert!(!items[1].done);
    }

    #[test]
    fn test_add_item_without_active_list() {
        let manager = manager_with(&[("Groceries", &[])]);
        assert_eq!(add_item_or_list(&manager, ADD_ITEMS_FORM, "Milk"), HandlerOutcome::Ignored);

        open_list(&manager, 4);
        assert_eq!(add_item_or_list(&manager, ADD_ITEMS_FORM, "Milk"), HandlerOutcome::Ignored);
    }

    #[test]
    fn test_add_from_unknown_form() {
        let manager = StateManager::new();
        assert_eq!(add_item_or_list(&manager, "search", "x"), HandlerOutcome::Ignored);
    }

    #[test]
    fn test_save_edit_renames_and_clears_marker() {
        let manager = manager_with(&[("Groceries", &["Milk", "Eggs"])]);
        open_list(&manager, 0);
        let eggs = manager.read(|s| s.lists[0].items[1].id);
        edit_item_or_list(&manager, &eggs.to_string());

        add_item_or_list(&manager, ADD_ITEMS_FORM, "Free-range eggs");

        let state = manager.snapshot();
        assert_eq!(state.lists[0].items.len(), 2);
        assert_eq!(state.lists[0].items[1].name, "Free-range eggs");
        assert_eq!(state.lists[0].items[1].id, eggs);
        assert!(state.editing.is_none());
    }

    #[test]
    fn test_rename_list() {
        let manager = manager_with(&[("Groceries", &[]), ("Chores", &[])]);
        let chores = manager.read(|s| s.lists[1].id);
        edit_item_or_list(&manager, &chores.to_string());

        add_item_or_list(&manager, ADD_LISTS_FORM, "House chores");

        let names: Vec<_> = manager.read(|s| s.lists.iter().map(|l| l.name.clone()).collect());
        assert_eq!(names, vec!["Groceries", "House chores"]);
    }

    #[test]
    fn test_toggle_only_touches_target() {
        let manager = manager_with(&[("Groceries", &["Milk", "Eggs", "Bread"])]);
        open_list(&manager, 0);
        let eggs = manager.read(|s| s.lists[0].items[1].id);

        let outcome = toggle_item(&manager, &format!("item-{eggs}"), "checkbox", true);

        assert!(outcome.is_committed());
        let done: Vec<bool> = manager.read(|s| s.lists[0].items.iter().map(|i| i.done).collect());
        assert_eq!(done, vec![false, true, false]);

        toggle_item(&manager, &format!("item-{eggs}"), "checkbox", false);
        assert!(!manager.read(|s| s.lists[0].items[1].done));
    }

    #[test]
    fn test_toggle_ignores_other_inputs() {
        let manager = manager_with(&[("Groceries", &["Milk"])]);
        open_list(&manager, 0);
        let milk = manager.read(|s| s.lists[0].items[0].id);

        assert_eq!(
            toggle_item(&manager, &format!("item-{milk}"), "text", true),
            HandlerOutcome::Ignored
        );
        assert_eq!(toggle_item(&manager, "new-item", "checkbox", true), HandlerOutcome::Ignored);
        assert_eq!(
            toggle_item(&manager, &format!("item-{}", ElementId::new()), "checkbox", true),
            HandlerOutcome::Ignored
        );
    }

    #[test]
    fn test_edit_sets_marker() {
        let manager = manager_with(&[("Groceries", &[])]);
        let id = manager.read(|s| s.lists[0].id);

        let outcome = edit_item_or_list(&manager, &id.to_string());

        assert_eq!(
            outcome,
            HandlerOutcome::Committed(vec![StateChange::EditingChanged { editing: Some(id) }])
        );
        assert_eq!(manager.read(|s| s.lists.len()), 1);
    }

    #[test]
    fn test_edit_stale_or_malformed_id() {
        let manager = manager_with(&[("Groceries", &["Milk"])]);
        let list_id = manager.read(|s| s.lists[0].id);
        open_list(&manager, 0);

        // List ids are not editable from the items view
        assert_eq!(edit_item_or_list(&manager, &list_id.to_string()), HandlerOutcome::Ignored);
        assert_eq!(edit_item_or_list(&manager, "3"), HandlerOutcome::Ignored);
        assert!(manager.read(|s| s.editing.is_none()));
    }

    #[test]
    fn test_delete_item_confirmed() {
        let manager = manager_with(&[("Groceries", &["Milk", "Eggs", "Bread"])]);
        open_list(&manager, 0);
        let eggs = manager.read(|s| s.lists[0].items[1].id);

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|message| {
                message == "Are you sure you want to delete this item? This cannot be reversed."
            })
            .times(1)
            .return_const(true);

        let outcome = delete_item_or_list(&manager, &eggs.to_string(), DeleteScope::View, &confirm);

        assert!(outcome.is_committed());
        let names: Vec<_> =
            manager.read(|s| s.lists[0].items.iter().map(|i| i.name.clone()).collect());
        assert_eq!(names, vec!["Milk", "Bread"]);
    }

    #[test]
    fn test_delete_declined_leaves_state() {
        let manager = manager_with(&[("Groceries", &["Milk"])]);
        let id = manager.read(|s| s.lists[0].id);
        let before = manager.snapshot();

        let outcome = delete_item_or_list(&manager, &id.to_string(), DeleteScope::View, &NeverConfirm);

        assert_eq!(outcome, HandlerOutcome::Declined);
        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_delete_unknown_id_never_prompts() {
        let manager = manager_with(&[("Groceries", &[])]);
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();

        let outcome = delete_item_or_list(
            &manager,
            &ElementId::new().to_string(),
            DeleteScope::View,
            &confirm,
        );

        assert_eq!(outcome, HandlerOutcome::Ignored);
    }

    #[test]
    fn test_delete_list_clears_edit_marker() {
        let manager = manager_with(&[("Groceries", &[]), ("Chores", &[])]);
        let (groceries, chores) = manager.read(|s| (s.lists[0].id, s.lists[1].id));
        edit_item_or_list(&manager, &chores.to_string());

        delete_item_or_list(&manager, &groceries.to_string(), DeleteScope::View, &AlwaysConfirm);

        let state = manager.snapshot();
        assert_eq!(state.lists.len(), 1);
        assert_eq!(state.lists[0].id, chores);
        assert!(state.editing.is_none());
    }

    #[test]
    fn test_delete_list_from_items_view_keeps_selection() {
        let manager = manager_with(&[("Groceries", &[]), ("Chores", &["Dishes"])]);
        let groceries = manager.read(|s| s.lists[0].id);
        open_list(&manager, 1);

        delete_item_or_list(&manager, &groceries.to_string(), DeleteScope::List, &AlwaysConfirm);

        let state = manager.snapshot();
        assert_eq!(state.current_list, Some(0));
        assert_eq!(state.active_list().unwrap().name, "Chores");
    }

    #[test]
    fn test_delete_active_list_returns_to_lists_view() {
        let manager = manager_with(&[("Groceries", &[])]);
        let groceries = manager.read(|s| s.lists[0].id);
        open_list(&manager, 0);

        delete_item_or_list(&manager, &groceries.to_string(), DeleteScope::List, &AlwaysConfirm);

        assert!(manager.read(|s| s.current_list.is_none() && s.lists.is_empty()));
    }

    #[test]
    fn test_delete_item_scope_needs_active_list() {
        let manager = manager_with(&[("Groceries", &["Milk"])]);
        let milk = manager.read(|s| s.lists[0].items[0].id);

        let outcome = delete_item_or_list(&manager, &milk.to_string(), DeleteScope::Item, &AlwaysConfirm);

        assert_eq!(outcome, HandlerOutcome::Ignored);
    }

    #[test]
    fn test_outcome_merge() {
        let committed = HandlerOutcome::Committed(vec![]);
        assert!(HandlerOutcome::Ignored.merge(committed.clone()).is_committed());
        assert_eq!(
            HandlerOutcome::Ignored.merge(HandlerOutcome::Declined),
            HandlerOutcome::Declined
        );
        assert_eq!(
            HandlerOutcome::Ignored.merge(HandlerOutcome::Ignored),
            HandlerOutcome::Ignored
        );
    }
}
