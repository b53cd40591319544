// DOM-level events delivered to the root container.
//
// The host reads these as JSON lines, so they are serde-tagged:
//   {"type":"submit","form_id":"add-lists","value":"Groceries"}
//   {"type":"change","target_id":"item-<id>","input_type":"checkbox","checked":true}
//   {"type":"click","attributes":{"data-delete":"<id>"}}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DATA_EDIT: &str = "data-edit";
pub const DATA_DELETE: &str = "data-delete";
pub const DATA_DELETE_ITEM: &str = "data-delete-item";
pub const DATA_DELETE_LIST: &str = "data-delete-list";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomEvent {
    /// A form was submitted; `value` is the content of its text input
    Submit { form_id: String, value: String },

    /// An input changed state
    Change {
        target_id: String,
        #[serde(default = "default_input_type")]
        input_type: String,
        #[serde(default)]
        checked: bool,
    },

    /// A click landed on an element carrying these attributes
    Click {
        #[serde(default)]
        attributes: IndexMap<String, String>,
    },
}

fn default_input_type() -> String {
    "checkbox".to_string()
}

impl DomEvent {
    pub fn submit(form_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Submit {
            form_id: form_id.into(),
            value: value.into(),
        }
    }

    pub fn checkbox(target_id: impl Into<String>, checked: bool) -> Self {
        Self::Change {
            target_id: target_id.into(),
            input_type: default_input_type(),
            checked,
        }
    }

    /// A click on an element carrying a single attribute.
    pub fn click(attribute: &str, value: impl ToString) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert(attribute.to_string(), value.to_string());
        Self::Click { attributes }
    }

    /// Value of a click attribute; absent or empty attributes are `None`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::Click { attributes } => attributes
                .get(name)
                .map(String::as_str)
                .filter(|value| !value.is_empty()),
            _ => None,
        }
    }
}
