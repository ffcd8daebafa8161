//! Gitlink error types and formatting
//!
//! One typed enum, [`GitError`], covers the whole failure taxonomy: parse
//! errors (bad link), acquisition errors (clone), sync errors (checkout,
//! rebase, stash), timeouts, and cancellation. Use `.into()` to convert to
//! `anyhow::Error` while preserving the type for pattern matching; Display
//! produces styled output for users.

use color_print::cformat;

use crate::styling::{error_message, hint_message, info_message};

/// Domain errors for link handling and repository synchronization.
///
/// Each variant stores the data needed to construct a user-facing message.
/// Display produces styled output with a symbol line and, where it helps, a
/// hint line.
#[derive(Debug, Clone)]
pub enum GitError {
    /// The input string does not match the GitHub URL grammar.
    InvalidLink { url: String },

    /// Cloning a repository failed (nonexistent, inaccessible, or network).
    CloneFailed {
        owner: String,
        repo: String,
        error: String,
    },

    /// The requested branch exists neither locally nor on the remote.
    BranchNotFound { branch: String, remote: String },

    /// Checking out a branch failed for a reason other than "not found".
    CheckoutFailed { branch: String, error: String },

    /// `pull --rebase` stopped on conflicts; the repository is left in the
    /// state git leaves it, never force-reset.
    RebaseConflict { branch: String, git_output: String },

    /// The user chose to commit but supplied no commit message.
    EmptyCommitMessage,

    /// An operation needs a named branch but HEAD is detached.
    DetachedHead,

    /// The repository has no remote whose URL points at GitHub.
    NoGitHubRemote,

    /// The given path is not inside a git working tree.
    NotInRepository { path: std::path::PathBuf },

    /// A link points at a file that does not exist on the synced branch.
    FileNotInCheckout { file_path: String, branch: String },

    /// A network-bound git command exceeded the configured deadline.
    NetworkTimeout { operation: String, seconds: u64 },

    /// The user declined a required decision. Not a failure: the pass stops
    /// mutating state and the process exits 0 with a neutral notice.
    Cancelled,

    /// Catch-all for git failures with no dedicated variant.
    Other { message: String },
}

impl std::error::Error for GitError {}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::InvalidLink { url } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("Not a GitHub URL: <bold>{url}</>")),
                hint_message(cformat!(
                    "Expected <bright-black>https://github.com/owner/repo[/blob/branch/path][#L10[-L20]]</>"
                ))
            ),

            GitError::CloneFailed { owner, repo, error } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("Failed to clone <bold>{owner}/{repo}</>")),
                hint_message(error.trim())
            ),

            GitError::BranchNotFound { branch, remote } => write!(
                f,
                "{}",
                error_message(cformat!(
                    "Branch <bold>{branch}</> not found locally or on <bold>{remote}</>"
                ))
            ),

            GitError::CheckoutFailed { branch, error } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("Could not check out <bold>{branch}</>")),
                hint_message(error.trim())
            ),

            GitError::RebaseConflict { branch, git_output } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "Rebase of <bold>{branch}</> stopped on conflicts"
                )),
                hint_message(cformat!(
                    "Resolve conflicts manually, then <bright-black>git rebase --continue</> (or <bright-black>git rebase --abort</>)\n{}",
                    git_output.trim()
                ))
            ),

            GitError::EmptyCommitMessage => write!(
                f,
                "{}",
                error_message("Commit aborted: no commit message provided")
            ),

            GitError::DetachedHead => write!(
                f,
                "{}\n{}",
                error_message("Not on a branch (detached HEAD)"),
                hint_message(cformat!(
                    "Links need a branch name; run <bright-black>git switch <<branch>></> first"
                ))
            ),

            GitError::NoGitHubRemote => write!(
                f,
                "{}\n{}",
                error_message("No GitHub remote found"),
                hint_message(cformat!(
                    "Add one with <bright-black>git remote add origin git@github.com:owner/repo.git</>"
                ))
            ),

            GitError::NotInRepository { path } => write!(
                f,
                "{}",
                error_message(cformat!(
                    "<bold>{}</> is not inside a git repository",
                    path.display()
                ))
            ),

            GitError::FileNotInCheckout { file_path, branch } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{file_path}</> does not exist on branch <bold>{branch}</>"
                )),
                hint_message("The link may point at a file that was moved or deleted")
            ),

            GitError::NetworkTimeout { operation, seconds } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{operation}</> did not finish within {seconds}s"
                )),
                hint_message(cformat!(
                    "Raise <bright-black>network-timeout-secs</> in the config, or check connectivity"
                ))
            ),

            GitError::Cancelled => write!(f, "{}", info_message("Cancelled")),

            GitError::Other { message } => write!(f, "{}", error_message(message)),
        }
    }
}

/// Process exit code for a top-level error.
///
/// Cancellation is a first-class outcome, not a failure.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<GitError>() {
        Some(GitError::Cancelled) => 0,
        _ => 1,
    }
}
