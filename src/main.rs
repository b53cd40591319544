//! ListKeeper - headless host for the to-do list widget
//!
//! # Overview
//!
//! This binary drives one widget instance without a browser. It initializes:
//! - Settings ([`ConfigManager`]) from `ListKeeper.yaml` plus `LISTKEEPER_*` overrides
//! - Logging infrastructure (file rotation + optional console output on stderr)
//! - A file-backed key-value store standing in for browser local storage
//! - A file surface receiving the rendered page after every render
//! - The [`AppController`] for the requested location
//!
//! # Input
//!
//! Events arrive on stdin, one per line:
//! - JSON [`DomEvent`]s, e.g. `{"type":"submit","form_id":"add-lists","value":"Groceries"}`
//! - Locations starting with `?`, e.g. `?list=0`, which switch views like following a link
//!
//! A delete prompts on stderr; the answer is read from the next stdin line.
//!
//! # Execution Flow
//!
//! 1. Load settings from the configuration directory
//! 2. Initialize logging → `<log_dir>/listkeeper.<date>`
//! 3. Open the store, load state, run the initial render
//! 4. Dispatch events until stdin closes
//! 5. Log session metrics

use anyhow::{Context, Result};
use clap::Parser;
use listkeeper::ui::{FileSurface, TerminalConfirm};
use listkeeper::{APP_NAME, AppController, ConfigManager, DomEvent, FileStore, Location, VERSION};
use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding ListKeeper.yaml; relative settings paths resolve against it
    #[arg(short, long, default_value = "ListKeeper Data")]
    config_dir: String,

    /// Page location selecting the initial view, e.g. "?list=0"
    #[arg(short, long, default_value = "")]
    location: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_settings()?;

    let log_dir = config_manager.resolve(&settings.log_dir);
    let _guard = listkeeper::logging::setup_logging_with_console(
        log_dir.as_str(),
        APP_NAME,
        settings.debug_mode,
        settings.console_output,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let store = FileStore::open(config_manager.resolve(&settings.data_dir))
        .context("Failed to open the state store")?;
    let surface = FileSurface::new(config_manager.resolve(&settings.markup_file), "To-Do Lists")?;
    tracing::info!("Rendering to {}", surface.path());

    let mut app = AppController::new(
        store,
        surface,
        &Location::parse(&cli.location),
        settings.storage_key.as_str(),
    )
    .context("Failed to initialize the widget")?;

    let input = Rc::new(RefCell::new(std::io::stdin().lock()));
    let confirm = TerminalConfirm::new(Rc::clone(&input));

    loop {
        let mut line = String::new();
        let read = input
            .borrow_mut()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('?') {
            if let Err(e) = app.navigate(&Location::parse(line)) {
                tracing::error!("Navigation to {} failed: {}", line, e);
            }
            continue;
        }

        let event: DomEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping malformed event {:?}: {}", line, e);
                continue;
            }
        };

        match app.dispatch(&event, &confirm) {
            Ok(outcome) => tracing::debug!("Event handled: {:?}", outcome),
            Err(e) => tracing::error!("Event handled but state was not saved: {}", e),
        }
    }

    app.metrics().log_summary();
    tracing::info!("Input closed, shutting down");

    Ok(())
}
