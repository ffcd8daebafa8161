//! Branch synchronization engine
//!
//! [`sync`] reconciles a local checkout with a target branch on its remote.
//! The pass runs six stages in order:
//!
//! 1. Dirty working tree: offer stash / commit / abort
//! 2. Fetch (non-fatal; offline operation degrades gracefully)
//! 3. Branch resolution: local checkout, or fetch + tracking checkout
//! 4. Freshness: compare commit counts, offer pull when behind
//! 5. Pull with rebase when accepted
//! 6. Stash reapplication offer, when stage 1 stashed
//!
//! Two callers with different cancellation needs share this pass: opening a
//! link treats a declined freshness prompt as "proceed stale", generating a
//! link treats it as "stop, the link would lie". [`CancelPolicy`] carries
//! that difference.
//!
//! Concurrent passes against the same checkout are serialized with an
//! in-process per-path lock; git does not tolerate interleaved stash and
//! checkout sequences.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::time::Duration;

use color_print::cformat;
use dashmap::DashMap;

use crate::git::{GitError, Repository};
use crate::prompt::{Severity, SyncDecision, UserInteraction};

/// One lock per canonical repository path, created on first use.
static PATH_LOCKS: LazyLock<DashMap<PathBuf, Arc<Mutex<()>>>> = LazyLock::new(DashMap::new);

/// What a declined freshness prompt means to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Proceed with the stale checkout (opening a link).
    Continue,
    /// Stop the whole operation (generating a link).
    Abort,
}

/// How a sync pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The checkout is on the target branch; updates applied or declined.
    Completed,
    /// The user stopped the pass at the dirty-tree stage. Nothing was
    /// mutated; the caller decides whether to proceed anyway.
    Aborted,
}

/// Parameters for one sync pass.
#[derive(Debug, Clone)]
pub struct SyncRequest<'a> {
    /// Branch the checkout should end up on.
    pub target_branch: &'a str,
    /// Remote to fetch and pull from.
    pub remote: &'a str,
    /// When false, the freshness check and update offer are skipped; dirty
    /// handling and branch resolution still run.
    pub auto_sync: bool,
    pub cancel_policy: CancelPolicy,
    pub network_timeout: Duration,
}

/// Reconcile `repo` with `remote/target_branch`, prompting through `ui` at
/// each decision point.
///
/// Cancellation at the freshness prompt follows the request's
/// [`CancelPolicy`]; cancellation at the dirty-tree stage always returns
/// [`SyncOutcome::Aborted`] without touching the repository.
pub fn sync(
    repo: &Repository,
    ui: &dyn UserInteraction,
    req: &SyncRequest,
) -> anyhow::Result<SyncOutcome> {
    let lock = path_lock(repo);
    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

    run_pass(repo, ui, req)
}

fn path_lock(repo: &Repository) -> Arc<Mutex<()>> {
    let key = dunce::canonicalize(repo.path()).unwrap_or_else(|_| repo.path().to_path_buf());
    PATH_LOCKS.entry(key).or_default().clone()
}

fn run_pass(
    repo: &Repository,
    ui: &dyn UserInteraction,
    req: &SyncRequest,
) -> anyhow::Result<SyncOutcome> {
    let branch = req.target_branch;
    let remote = req.remote;

    // Stage 1: dirty working tree
    let mut stashed = false;
    if repo.is_dirty()? {
        let switching = repo.current_branch()? != Some(branch.to_string());
        let choice = ui.prompt_choice(
            &cformat!("Working tree has uncommitted changes. Sync to <bold>{branch}</>?"),
            &[
                SyncDecision::StashAndSwitch,
                SyncDecision::CommitAndSwitch,
                SyncDecision::Abort,
            ],
        );
        match choice {
            Some(SyncDecision::StashAndSwitch) => {
                repo.stash_push(&format!("gitlink: auto-stash before sync to {branch}"))?;
                stashed = true;
                ui.notify(Severity::Info, "Stashed local changes");
            }
            Some(SyncDecision::CommitAndSwitch) => {
                let message = ui
                    .prompt_text("Commit message")
                    .filter(|m| !m.trim().is_empty())
                    .ok_or(GitError::EmptyCommitMessage)?;
                repo.stage_all()?;
                repo.commit(&message)?;
                ui.notify(Severity::Info, "Committed local changes");
            }
            Some(SyncDecision::Abort) | None => {
                log::debug!("sync aborted at dirty-tree stage (switching={switching})");
                return Ok(SyncOutcome::Aborted);
            }
            Some(other) => {
                log::warn!("unexpected dirty-tree decision {other:?}, treating as abort");
                return Ok(SyncOutcome::Aborted);
            }
        }
    }

    // Stage 2: fetch, best effort. Offline use still gets branch switching
    // against whatever refs are already local.
    if let Err(e) = repo.fetch(remote, req.network_timeout) {
        log::warn!("fetch from {remote} failed: {e:#}");
        ui.notify(
            Severity::Warning,
            &format!("Could not fetch from {remote}; continuing with local state"),
        );
    }

    // Stage 3: land on the target branch
    if repo.current_branch()? != Some(branch.to_string()) {
        if repo.local_branch_exists(branch)? {
            repo.checkout(branch)?;
        } else {
            repo.fetch_branch(remote, branch, req.network_timeout)
                .map_err(|e| -> anyhow::Error {
                    match e.downcast::<GitError>() {
                        Ok(git_err @ GitError::NetworkTimeout { .. }) => git_err.into(),
                        _ => GitError::BranchNotFound {
                            branch: branch.to_string(),
                            remote: remote.to_string(),
                        }
                        .into(),
                    }
                })?;
            repo.checkout_tracking(remote, branch)?;
        }
        ui.notify(Severity::Info, &format!("Switched to branch {branch}"));
    }

    // Stage 4: freshness, opt-in. A failure here (no remote-tracking ref
    // yet) is not worth stopping the pass for.
    let behind = if !req.auto_sync {
        log::debug!("auto-sync disabled, skipping freshness check");
        0
    } else {
        match repo.commits_behind(remote, branch) {
            Ok(n) => n,
            Err(e) => {
                log::debug!("skipping freshness check: {e:#}");
                0
            }
        }
    };

    if behind > 0 {
        let noun = if behind == 1 { "commit" } else { "commits" };
        let choice = ui.prompt_choice(
            &cformat!("Branch <bold>{branch}</> is {behind} {noun} behind <bold>{remote}</>. Update?"),
            &[SyncDecision::PullRebase, SyncDecision::Continue],
        );
        match choice {
            // Stage 5: apply the update
            Some(SyncDecision::PullRebase) => {
                repo.pull_rebase(remote, branch, req.network_timeout)?;
                ui.notify(Severity::Info, &format!("Updated {branch} from {remote}"));
            }
            Some(SyncDecision::Continue) => {
                log::debug!("user declined update, continuing {behind} behind");
            }
            None => match req.cancel_policy {
                CancelPolicy::Continue => {
                    log::debug!("freshness prompt cancelled, continuing stale");
                }
                CancelPolicy::Abort => return Err(GitError::Cancelled.into()),
            },
            Some(other) => {
                log::warn!("unexpected freshness decision {other:?}, continuing stale");
            }
        }
    }

    // Stage 6: offer the stash back
    if stashed {
        let choice = ui.prompt_choice(
            "Reapply stashed changes?",
            &[SyncDecision::ReapplyStash, SyncDecision::KeepStashed],
        );
        if choice == Some(SyncDecision::ReapplyStash) {
            match repo.stash_pop() {
                Ok(()) => ui.notify(Severity::Info, "Reapplied stashed changes"),
                Err(e) => {
                    log::warn!("stash pop failed: {e:#}");
                    ui.notify(
                        Severity::Warning,
                        "Stash could not be reapplied cleanly; it is kept, resolve with `git stash pop` manually",
                    );
                }
            }
        } else {
            ui.notify(
                Severity::Info,
                "Changes remain stashed; restore them with `git stash pop`",
            );
        }
    }

    Ok(SyncOutcome::Completed)
}
