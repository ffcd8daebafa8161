//! Jump between GitHub URLs and synchronized local checkouts.
//!
//! Gitlink resolves a `https://github.com/owner/repo/blob/branch/path#L10-L20`
//! URL to a local clone under `<repos-root>/owner/repo`, reconciled to the
//! requested branch, and conversely formats such a URL from a local file and
//! line selection.
//!
//! The library API is not stable. If you're building tooling that integrates
//! with gitlink, please open an issue to discuss your use case.

pub mod config;
pub mod flows;
pub mod git;
pub mod link;
pub mod prompt;
pub mod shell_exec;
pub mod store;
pub mod styling;
pub mod sync;

// Re-export the types most callers need
pub use config::GitlinkConfig;
pub use link::LinkSpec;
pub use prompt::{Severity, SyncDecision, UserInteraction};
