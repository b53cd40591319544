// ListKeeper - persistent to-do lists with a state-driven markup renderer
//
// This is the library crate containing the state container, templates, event
// handlers and persistence. The binary crate (main.rs) is a headless host
// that feeds DOM events from stdin and writes markup to a file.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod render;
pub mod state;
pub mod storage;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{AppState, ElementId, Item, Settings, TodoList};
pub use render::render;
pub use state::{StateChange, StateManager, StatePatch};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use ui::{AppController, DomEvent, HandlerOutcome, Location};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
