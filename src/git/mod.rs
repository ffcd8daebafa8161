//! Git operations via the `git` CLI
//!
//! Everything here shells out rather than linking libgit2: the behavior must
//! match what a user gets running git by hand, hooks and config included.

mod error;
mod remote;
mod repository;
mod url;

pub use error::{GitError, exit_code};
pub use remote::{GitHubRemote, resolve_github_remote};
pub use repository::Repository;
pub use url::RemoteUrl;
