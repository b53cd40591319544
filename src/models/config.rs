use serde::{Deserialize, Serialize};

/// Runtime settings from `ListKeeper.yaml`
///
/// Every field may be overridden by a `LISTKEEPER_<FIELD>` environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the persisted key-value store
    pub data_dir: String,

    /// Store key under which the whole state blob is written
    pub storage_key: String,

    /// File the rendered markup is written to after every render
    pub markup_file: String,

    /// Directory for rotating log files
    pub log_dir: String,

    pub debug_mode: bool,

    pub console_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            markup_file: default_markup_file(),
            log_dir: default_log_dir(),
            debug_mode: false,
            console_output: false,
        }
    }
}

fn default_data_dir() -> String {
    "storage".to_string()
}

fn default_storage_key() -> String {
    crate::storage::DEFAULT_STORAGE_KEY.to_string()
}

fn default_markup_file() -> String {
    "index.html".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}
