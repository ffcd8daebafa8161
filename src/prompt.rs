//! User interaction seam
//!
//! The sync engine never reads stdin directly; it asks a [`UserInteraction`]
//! and acts on the answer. The binary wires in [`ConsolePrompt`]; tests wire
//! in a scripted implementation with queued responses.
//!
//! Declining a prompt (`None`) is always meaningful: it cancels the decision
//! rather than defaulting, and callers decide what cancellation means at
//! that stage.

use std::io::{BufRead, Write};

use crate::styling::{PROMPT_SYMBOL, error_message, progress_message, warning_message};

/// A choice offered during the sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Proceed without syncing further.
    Continue,
    /// Stop the pass, leave everything untouched.
    Abort,
    /// Stash local changes, then continue switching branches.
    StashAndSwitch,
    /// Commit local changes, then continue switching branches.
    CommitAndSwitch,
    /// Update the branch with `pull --rebase`.
    PullRebase,
    /// Leave the stash alone after syncing.
    KeepStashed,
    /// Pop the stash back onto the synced branch.
    ReapplyStash,
}

impl SyncDecision {
    /// Label shown to the user for this option.
    pub fn label(&self) -> &'static str {
        match self {
            SyncDecision::Continue => "Continue without syncing",
            SyncDecision::Abort => "Abort",
            SyncDecision::StashAndSwitch => "Stash changes and switch",
            SyncDecision::CommitAndSwitch => "Commit changes and switch",
            SyncDecision::PullRebase => "Pull with rebase",
            SyncDecision::KeepStashed => "Keep changes stashed",
            SyncDecision::ReapplyStash => "Reapply stashed changes",
        }
    }
}

/// Severity of a non-interactive notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// How the sync engine talks to whoever is driving it.
pub trait UserInteraction {
    /// Offer a choice. `None` means the user declined to choose (EOF,
    /// empty input, or an explicit cancel).
    fn prompt_choice(&self, message: &str, options: &[SyncDecision]) -> Option<SyncDecision>;

    /// Ask for a free-form line of text, e.g. a commit message.
    fn prompt_text(&self, message: &str) -> Option<String>;

    /// Show a notice without waiting for input.
    fn notify(&self, severity: Severity, message: &str);
}

/// Terminal implementation: prompts on stderr, answers from stdin.
///
/// Prompts go to stderr so `$(gitlink open ...)` still works with stdout
/// captured.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        let stdin = std::io::stdin();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }
}

impl UserInteraction for ConsolePrompt {
    fn prompt_choice(&self, message: &str, options: &[SyncDecision]) -> Option<SyncDecision> {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{PROMPT_SYMBOL} {message}");
        for (i, option) in options.iter().enumerate() {
            let _ = writeln!(stderr, "  {}) {}", i + 1, option.label());
        }
        let _ = write!(stderr, "> ");
        let _ = stderr.flush();
        drop(stderr);

        let line = self.read_line()?;
        if line.is_empty() {
            return None;
        }
        let index: usize = line.parse().ok()?;
        options.get(index.checked_sub(1)?).copied()
    }

    fn prompt_text(&self, message: &str) -> Option<String> {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "{PROMPT_SYMBOL} {message}: ");
        let _ = stderr.flush();
        drop(stderr);

        self.read_line()
    }

    fn notify(&self, severity: Severity, message: &str) {
        let formatted = match severity {
            Severity::Info => progress_message(message),
            Severity::Warning => warning_message(message),
            Severity::Error => error_message(message),
        };
        anstream::eprintln!("{formatted}");
    }
}
