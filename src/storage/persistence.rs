// Load/save bridge between a KeyValueStore and AppState.

use super::{KeyValueStore, Result};
use crate::models::{AppState, DEFAULT_LIST_NAME, Item, TodoList};
use serde::Deserialize;

/// Shape accepted when reading a blob.
///
/// Older single-list blobs keep their items under `listItems`; those are
/// folded into one list on load.
#[derive(Deserialize)]
struct StoredState {
    #[serde(default)]
    lists: Option<Vec<TodoList>>,

    #[serde(default, rename = "listItems")]
    list_items: Option<Vec<Item>>,
}

impl StoredState {
    fn into_app_state(self) -> AppState {
        let lists = match (self.lists, self.list_items) {
            (Some(lists), _) => lists,
            (None, Some(items)) => {
                tracing::info!("Migrating single-list blob with {} items", items.len());
                let mut list = TodoList::new(DEFAULT_LIST_NAME);
                list.items = items;
                vec![list]
            }
            (None, None) => Vec::new(),
        };

        AppState {
            lists,
            ..AppState::default()
        }
    }
}

/// Read the state stored under `key`.
///
/// A missing key or a blob that does not parse yields an empty state. Only a
/// failed read is an error: the stored blob may still be intact, so callers
/// must not overwrite it.
///
/// # Errors
/// Returns the store error when the value cannot be read.
pub fn read_state<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<AppState> {
    let Some(raw) = store.get(key)? else {
        tracing::info!("No saved state under {:?}, starting empty", key);
        return Ok(AppState::default());
    };

    match serde_json::from_str::<StoredState>(&raw) {
        Ok(stored) => {
            let state = stored.into_app_state();
            tracing::info!(
                "Loaded {} lists ({} items) from {:?}",
                state.lists.len(),
                state.item_count(),
                key
            );
            Ok(state)
        }
        Err(e) => {
            tracing::warn!("Saved state under {:?} is malformed, discarding: {}", key, e);
            Ok(AppState::default())
        }
    }
}

/// Like [`read_state`], but a failed read also yields an empty state.
///
/// The view state (`current_list`, `editing`) is always reset.
pub fn load_state<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> AppState {
    read_state(store, key).unwrap_or_else(|e| {
        tracing::warn!("Failed to read saved state under {:?}: {}", key, e);
        AppState::default()
    })
}

/// Serialize `state` and write it under `key`.
pub fn save_state<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, state: &AppState) -> Result<()> {
    let json = serde_json::to_string(state)?;
    store.set(key, &json)?;

    tracing::debug!("Saved {} lists under {:?}", state.lists.len(), key);
    Ok(())
}
