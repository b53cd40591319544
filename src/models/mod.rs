//! Data models for ListKeeper.
//!
//! - [`AppState`]: the lists plus the view state (selected list, element being edited)
//! - [`TodoList`] and [`Item`]: the persisted content, identified by [`ElementId`]
//! - [`Settings`]: runtime settings loaded from `ListKeeper.yaml`
//!
//! # Architecture Note
//!
//! `AppState` is a plain value with structural equality. It is owned by
//! [`StateManager`](crate::state::StateManager), which hands out independent
//! snapshots and replaces the whole value on commit.

pub mod app_state;
pub mod config;

pub use app_state::{AppState, DEFAULT_LIST_NAME, ElementId, Item, TodoList};
pub use config::Settings;
