// Confirmation dialog collaborator.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// Asks the user to confirm a destructive action.
///
/// Blocks until the user answers, like the browser's `confirm()`.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Accepts every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

/// Terminal prompt: writes the question to stderr and reads the answer as
/// the next line of a shared input.
///
/// The input is shared with the event reader so the answer is simply the
/// line following the event that triggered the prompt.
pub struct TerminalConfirm<R: BufRead> {
    input: Rc<RefCell<R>>,
}

impl<R: BufRead> TerminalConfirm<R> {
    pub fn new(input: Rc<RefCell<R>>) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Confirm for TerminalConfirm<R> {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{message} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Failed to read confirmation answer: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
