use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Name given to the list created when a legacy single-list blob is migrated.
pub const DEFAULT_LIST_NAME: &str = "My List";

/// Stable identifier for a list or an item.
///
/// Assigned once at creation time and carried by every rendered control, so a
/// control rendered before a deletion can never address the wrong element.
/// Positions are only used for iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generate a fresh random identifier.
    ///
    /// Also backfills ids missing from blobs written before ids existed.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A single to-do entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default = "ElementId::new")]
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            done: false,
        }
    }
}

/// A named, ordered sequence of items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    #[serde(default = "ElementId::new")]
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl TodoList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Position of the item with the given id.
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn item(&self, id: ElementId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ElementId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Append a new unfinished item and return its id.
    pub fn push_item(&mut self, name: impl Into<String>) -> ElementId {
        let item = Item::new(name);
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove the item at `index`, shifting later items down by one.
    ///
    /// Returns `None` when the index is out of range.
    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Number of items marked done.
    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }
}

/// Single source of truth for the widget.
///
/// `lists` is the persisted content. `current_list` and `editing` are view
/// state: the former is derived from the `list` URL parameter and the latter
/// marks the element whose name the add form is currently editing. Neither is
/// written to storage.
///
/// Never mutate the authoritative copy directly: take a snapshot from
/// [`StateManager`](crate::state::StateManager), change it, and commit it back
/// with [`set_snapshot`](crate::state::StateManager::set_snapshot).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub lists: Vec<TodoList>,

    #[serde(skip)]
    pub current_list: Option<usize>,

    #[serde(skip)]
    pub editing: Option<ElementId>,
}

impl AppState {
    /// True when the items view of a single list is active.
    pub fn is_items_view(&self) -> bool {
        self.current_list.is_some()
    }

    /// The list selected by `current_list`, if it exists.
    pub fn active_list(&self) -> Option<&TodoList> {
        self.current_list.and_then(|index| self.lists.get(index))
    }

    pub fn active_list_mut(&mut self) -> Option<&mut TodoList> {
        self.current_list.and_then(|index| self.lists.get_mut(index))
    }

    pub fn position_of_list(&self, id: ElementId) -> Option<usize> {
        self.lists.iter().position(|list| list.id == id)
    }

    pub fn list(&self, id: ElementId) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn list_mut(&mut self, id: ElementId) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|list| list.id == id)
    }

    /// Append a new empty list and return its id.
    pub fn push_list(&mut self, name: impl Into<String>) -> ElementId {
        let list = TodoList::new(name);
        let id = list.id;
        self.lists.push(list);
        id
    }

    /// Remove the list at `index`, shifting later lists down by one.
    pub fn remove_list(&mut self, index: usize) -> Option<TodoList> {
        (index < self.lists.len()).then(|| self.lists.remove(index))
    }

    /// Name of the element currently being edited, resolved against the
    /// sequence shown by the active view.
    pub fn editing_name(&self) -> Option<&str> {
        let id = self.editing?;
        match self.current_list {
            Some(_) => self.active_list()?.item(id).map(|item| item.name.as_str()),
            None => self.list(id).map(|list| list.name.as_str()),
        }
    }

    /// Total number of items across all lists.
    pub fn item_count(&self) -> usize {
        self.lists.iter().map(|list| list.items.len()).sum()
    }
}
