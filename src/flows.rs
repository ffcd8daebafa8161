//! End-to-end flows: open a link, generate a link
//!
//! These tie the parser, store, and sync engine together. They return data
//! ([`OpenTarget`], a URL string) rather than printing; the binary decides
//! how to present results.

use std::path::PathBuf;

use crate::config::GitlinkConfig;
use crate::git::{GitError, Repository, resolve_github_remote};
use crate::link::LinkSpec;
use crate::prompt::UserInteraction;
use crate::store::RepositoryStore;
use crate::sync::{CancelPolicy, SyncOutcome, SyncRequest, sync};

/// Where an opened link lands: a checkout, optionally a file and selection
/// within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTarget {
    /// Root of the synchronized checkout.
    pub repo_path: PathBuf,
    /// Absolute path of the linked file; `None` for a bare repository link.
    pub file_path: Option<PathBuf>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
}

/// Resolve a GitHub URL to a local, synchronized checkout.
///
/// An aborted sync (declined dirty-tree prompt) still opens the target; the
/// user chose to keep their state, not to stop looking at the code. A file
/// missing from the checkout after sync is an error, since the link points
/// at something that isn't there.
pub fn open_link(
    url: &str,
    config: &GitlinkConfig,
    store: &RepositoryStore,
    ui: &dyn UserInteraction,
) -> anyhow::Result<OpenTarget> {
    let spec = LinkSpec::parse(url, &config.default_branch).ok_or_else(|| {
        GitError::InvalidLink {
            url: url.to_string(),
        }
    })?;

    let repo = store.ensure(&spec, &config.default_branch, ui)?;

    let outcome = sync(
        &repo,
        ui,
        &SyncRequest {
            target_branch: &spec.branch,
            remote: "origin",
            auto_sync: config.auto_sync,
            cancel_policy: CancelPolicy::Continue,
            network_timeout: config.network_timeout(),
        },
    )?;
    if outcome == SyncOutcome::Aborted {
        log::debug!("sync aborted, opening {} as-is", spec.slug());
    }

    let file_path = if spec.file_path.is_empty() {
        None
    } else {
        let absolute = repo.path().join(&spec.file_path);
        if !absolute.exists() {
            return Err(GitError::FileNotInCheckout {
                file_path: spec.file_path.clone(),
                branch: spec.branch.clone(),
            }
            .into());
        }
        Some(absolute)
    };

    Ok(OpenTarget {
        repo_path: repo.path().to_path_buf(),
        file_path,
        start_line: spec.start_line,
        end_line: spec.end_line,
    })
}

/// Produce a GitHub URL for a local file and optional line selection.
///
/// The checkout is synced first so the URL refers to commits the remote
/// actually has; here an aborted or cancelled sync stops the flow, because
/// a link into un-pushed or stale state would mislead whoever receives it.
pub fn generate_link(
    file: &std::path::Path,
    selection: Option<(u32, u32)>,
    config: &GitlinkConfig,
    ui: &dyn UserInteraction,
) -> anyhow::Result<String> {
    let file = dunce::canonicalize(file)
        .map_err(|_| GitError::NotInRepository {
            path: file.to_path_buf(),
        })?;
    let dir = file.parent().ok_or_else(|| GitError::NotInRepository {
        path: file.clone(),
    })?;

    let probe = Repository::at(dir);
    let root = probe.worktree_root().map_err(|_| GitError::NotInRepository {
        path: file.clone(),
    })?;
    let repo = Repository::at(&root);

    let remote = resolve_github_remote(&repo)?.ok_or(GitError::NoGitHubRemote)?;
    let branch = repo.current_branch()?.ok_or(GitError::DetachedHead)?;

    let outcome = sync(
        &repo,
        ui,
        &SyncRequest {
            target_branch: &branch,
            remote: &remote.name,
            auto_sync: config.auto_sync,
            cancel_policy: CancelPolicy::Abort,
            network_timeout: config.network_timeout(),
        },
    )?;
    if outcome == SyncOutcome::Aborted {
        return Err(GitError::Cancelled.into());
    }

    let relative = file
        .strip_prefix(&root)
        .map_err(|_| GitError::NotInRepository { path: file.clone() })?;
    let file_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let (start, end) = match selection {
        Some((s, e)) => (Some(s), Some(e)),
        None => (None, None),
    };
    let spec = LinkSpec::with_selection(remote.owner, remote.repo, branch, file_path, start, end);
    Ok(spec.to_url())
}
