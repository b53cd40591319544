// Event router
//
// Binds the three DOM event kinds seen by the root container to handlers.
// Submit -> add, change -> toggle, click -> edit then delete. Edit and delete
// both run for every click; each is a no-op unless its own attribute is set.

use crate::state::StateManager;
use crate::ui::dialog::Confirm;
use crate::ui::events::{DATA_DELETE, DATA_DELETE_ITEM, DATA_DELETE_LIST, DATA_EDIT, DomEvent};
use crate::ui::handlers::{self, DeleteScope, HandlerOutcome};

/// Routes DOM events on the root container to handlers.
#[derive(Clone)]
pub struct EventRouter {
    state_manager: StateManager,
}

impl EventRouter {
    pub fn new(state_manager: StateManager) -> Self {
        Self { state_manager }
    }

    pub fn dispatch(&self, event: &DomEvent, confirm: &dyn Confirm) -> HandlerOutcome {
        tracing::trace!("Dispatching {:?}", event);

        match event {
            DomEvent::Submit { form_id, value } => {
                handlers::add_item_or_list(&self.state_manager, form_id, value)
            }
            DomEvent::Change {
                target_id,
                input_type,
                checked,
            } => handlers::toggle_item(&self.state_manager, target_id, input_type, *checked),
            DomEvent::Click { .. } => self.handle_click(event, confirm),
        }
    }

    fn handle_click(&self, event: &DomEvent, confirm: &dyn Confirm) -> HandlerOutcome {
        let edited = match event.attribute(DATA_EDIT) {
            Some(id) => handlers::edit_item_or_list(&self.state_manager, id),
            None => HandlerOutcome::Ignored,
        };

        let delete_target = [
            (DATA_DELETE, DeleteScope::View),
            (DATA_DELETE_ITEM, DeleteScope::Item),
            (DATA_DELETE_LIST, DeleteScope::List),
        ]
        .into_iter()
        .find_map(|(attribute, scope)| event.attribute(attribute).map(|id| (id, scope)));

        let deleted = match delete_target {
            Some((id, scope)) => {
                handlers::delete_item_or_list(&self.state_manager, id, scope, confirm)
            }
            None => HandlerOutcome::Ignored,
        };

        edited.merge(deleted)
    }
}
