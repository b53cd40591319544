// Application controller - wires state, rendering and persistence together
//
// This module contains the AppController which coordinates between:
// - StateManager (authoritative state + change events)
// - EventRouter (DOM events -> handlers)
// - the template renderer
// - a Surface (where markup goes) and a KeyValueStore (where state goes)
//
// The controller is the single subscriber of the state change stream. After
// every dispatch it drains the stream; if anything changed it renders once,
// patches the surface, and then persists the state.

use crate::metrics::Metrics;
use crate::models::AppState;
use crate::render;
use crate::state::{StateChange, StateManager, StatePatch};
use crate::storage::{self, KeyValueStore, StorageError};
use crate::ui::dialog::Confirm;
use crate::ui::events::DomEvent;
use crate::ui::handlers::HandlerOutcome;
use crate::ui::location::Location;
use crate::ui::router::EventRouter;
use crate::ui::surface::Surface;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Owns one widget instance.
///
/// # Example
/// ```ignore
/// let store = FileStore::open("storage")?;
/// let surface = FileSurface::new("index.html", "To-Do Lists")?;
/// let mut app = AppController::new(store, surface, &Location::parse("?list=0"), "todos")?;
///
/// app.dispatch(&DomEvent::submit("add-items", "Milk"), &AlwaysConfirm)?;
/// ```
pub struct AppController<S: KeyValueStore, F: Surface> {
    state_manager: StateManager,
    router: EventRouter,
    changes: broadcast::Receiver<StateChange>,
    store: S,
    surface: F,
    storage_key: String,
    markup: String,
    metrics: Arc<Metrics>,

    /// False when the saved state could not be read; the blob is left alone
    persist: bool,
}

impl<S: KeyValueStore, F: Surface> AppController<S, F> {
    /// Load the saved state and run the initial render.
    ///
    /// The edit marker always starts cleared and the view comes from
    /// `location`. If the store cannot be read, the widget starts empty and
    /// never saves during this session, so the unreadable blob survives.
    ///
    /// # Errors
    /// Fails only if the initial save cannot be written.
    pub fn new(
        store: S,
        surface: F,
        location: &Location,
        storage_key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let storage_key = storage_key.into();

        let (mut initial, persist) = match storage::read_state(&store, &storage_key) {
            Ok(state) => (state, true),
            Err(e) => {
                tracing::error!(
                    "Failed to read saved state under {:?}, saving disabled: {}",
                    storage_key,
                    e
                );
                (AppState::default(), false)
            }
        };
        initial.editing = None;
        initial.current_list = location.current_list();

        let state_manager = StateManager::with_state(initial);
        let changes = state_manager.subscribe();

        let mut controller = Self {
            router: EventRouter::new(state_manager.clone()),
            state_manager,
            changes,
            store,
            surface,
            storage_key,
            markup: String::new(),
            metrics: Arc::new(Metrics::new()),
            persist,
        };

        tracing::info!(
            "Widget initialized: {} lists, view={:?}",
            controller.state_manager.read(|s| s.lists.len()),
            controller.state_manager.read(|s| s.current_list)
        );

        controller.render_and_save()?;
        Ok(controller)
    }

    /// Route one event, then re-render and persist if the state changed.
    ///
    /// # Errors
    /// Returns the store error if the post-render save fails. The state and
    /// the surface are already updated at that point.
    pub fn dispatch(
        &mut self,
        event: &DomEvent,
        confirm: &dyn Confirm,
    ) -> Result<HandlerOutcome, StorageError> {
        self.metrics.record_event();

        let outcome = self.router.dispatch(event, confirm);
        match &outcome {
            HandlerOutcome::Committed(changes) => {
                self.metrics.record_commit();
                tracing::debug!("Committed {} changes", changes.len());
            }
            HandlerOutcome::Declined => self.metrics.record_declined(),
            HandlerOutcome::Ignored => {}
        }

        let flushed = self.flush();

        // The surface is patched even when the save failed
        if outcome.is_committed() && matches!(event, DomEvent::Submit { .. }) {
            self.surface.clear_input();
        }

        flushed?;
        Ok(outcome)
    }

    /// Switch views without reloading, as following a `?list=N` link would.
    pub fn navigate(&mut self, location: &Location) -> Result<(), StorageError> {
        self.state_manager.set_snapshot(
            StatePatch::new()
                .current_list(location.current_list())
                .clear_editing(),
        );
        self.flush().map(|_| ())
    }

    /// Drain pending change events; render and save once if there were any.
    ///
    /// Returns whether a render happened.
    pub fn flush(&mut self) -> Result<bool, StorageError> {
        let mut changed = false;

        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    tracing::trace!("State change received: {:?}", change);
                    changed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} state change events, re-rendering", skipped);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if changed {
            self.render_and_save()?;
        }
        Ok(changed)
    }

    fn render_and_save(&mut self) -> Result<(), StorageError> {
        let snapshot = self.state_manager.snapshot();

        let started = Instant::now();
        let markup = render::render(&snapshot);
        self.metrics.record_render(started.elapsed());

        self.surface.patch(&markup);
        self.markup = markup;

        if !self.persist {
            tracing::debug!("Saving disabled, keeping the stored blob untouched");
            return Ok(());
        }

        // Render complete; persist what was just shown
        match storage::save_state(&mut self.store, &self.storage_key, &snapshot) {
            Ok(()) => {
                self.metrics.record_save();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_save_error();
                tracing::error!("Failed to save state under {:?}: {}", self.storage_key, e);
                Err(e)
            }
        }
    }

    /// Markup of the last render
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Independent copy of the current state
    pub fn state(&self) -> AppState {
        self.state_manager.snapshot()
    }

    pub fn state_manager(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &F {
        &self.surface
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }
}
