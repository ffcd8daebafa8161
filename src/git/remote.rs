//! GitHub remote resolution
//!
//! When generating a link from a local file we need to know which GitHub
//! repository the checkout pushes to. A repository can have several remotes
//! (origin, upstream, a fork); `origin` wins when it points at GitHub,
//! otherwise the first GitHub remote in git's listing order does.

use super::repository::Repository;
use super::url::RemoteUrl;

/// A remote that resolves to a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRemote {
    /// Remote name as configured, e.g. `origin`.
    pub name: String,
    pub owner: String,
    pub repo: String,
}

/// Find the GitHub remote to attribute links to.
///
/// Prefers `origin`; falls back to the first remote whose URL parses as a
/// github.com repository. `Ok(None)` means the repository has remotes but
/// none on GitHub (or no remotes at all).
pub fn resolve_github_remote(repo: &Repository) -> anyhow::Result<Option<GitHubRemote>> {
    let remotes = repo.remotes()?;

    let mut first_match: Option<GitHubRemote> = None;
    for (name, url) in &remotes {
        let Some(parsed) = RemoteUrl::parse(url) else {
            continue;
        };
        if !parsed.is_github() {
            continue;
        }
        let candidate = GitHubRemote {
            name: name.clone(),
            owner: parsed.owner,
            repo: parsed.repo,
        };
        if name == "origin" {
            return Ok(Some(candidate));
        }
        if first_match.is_none() {
            first_match = Some(candidate);
        }
    }

    Ok(first_match)
}
