// UI module - DOM event handling and the application controller
//
// This module contains:
// - DomEvent: the submit/change/click events seen by the root container
// - EventRouter + handlers: add, toggle, edit and delete
// - Location: the `list` query parameter selecting the view
// - Confirm / Surface: the dialog and markup collaborators
// - AppController: subscribes to state changes, renders and persists

pub mod controller;
pub mod dialog;
pub mod events;
pub mod handlers;
pub mod location;
pub mod router;
pub mod surface;

pub use controller::AppController;
pub use dialog::{AlwaysConfirm, Confirm, NeverConfirm, TerminalConfirm};
pub use events::DomEvent;
pub use handlers::{DeleteScope, HandlerOutcome};
pub use location::Location;
pub use router::EventRouter;
pub use surface::{FileSurface, MemorySurface, Surface};
