// Render surface collaborator.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Where rendered markup ends up.
#[cfg_attr(test, mockall::automock)]
pub trait Surface {
    /// Replace the root container's content with `markup`.
    fn patch(&mut self, markup: &str);

    /// Clear the text input of the add form after a successful submission.
    fn clear_input(&mut self) {}
}

/// Keeps the latest markup in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    pub markup: String,
    pub patches: usize,
    pub input_clears: usize,
}

impl Surface for MemorySurface {
    fn patch(&mut self, markup: &str) {
        self.markup = markup.to_string();
        self.patches += 1;
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }
}

/// Writes every render into an HTML page on disk.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: Utf8PathBuf,
    title: String,
}

impl FileSurface {
    pub fn new<P: AsRef<Utf8Path>>(path: P, title: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {}", parent))?;
            }
        }

        Ok(Self {
            path,
            title: title.into(),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn page(&self, markup: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div id=\"app\">{}</div>\n</body>\n</html>\n",
            crate::render::escape_html(&self.title),
            markup
        )
    }
}

impl Surface for FileSurface {
    fn patch(&mut self, markup: &str) {
        // The DOM patch cannot fail; a failed write is logged and the next render retries
        if let Err(e) = fs::write(&self.path, self.page(markup)) {
            tracing::error!("Failed to write markup to {}: {}", self.path, e);
        }
    }
}
