// Helpers are shared across several integration test binaries; not every
// binary uses every helper.
#![allow(dead_code)]

//! Test fixtures for gitlink integration tests.
//!
//! ## TestRepo
//!
//! `TestRepo` creates an isolated git repository in a temporary directory.
//! Identity and behavior settings are written as *local* repo config, so the
//! library code under test (which spawns plain `git` with the inherited
//! environment) sees them too; fixture-side git commands additionally run
//! with `GIT_CONFIG_GLOBAL`/`GIT_CONFIG_SYSTEM` isolation and deterministic
//! timestamps.
//!
//! ## ScriptedUi
//!
//! The sync engine prompts through the `UserInteraction` trait. `ScriptedUi`
//! replays queued answers and records notices; an unqueued prompt panics so
//! tests fail loudly when the engine asks something unexpected.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Command;

use gitlink::prompt::{Severity, SyncDecision, UserInteraction};
use tempfile::TempDir;

#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

/// Isolate a git command from host config and pin timestamps.
pub fn configure_git_cmd(cmd: &mut Command, git_config_path: &Path) {
    cmd.env("GIT_CONFIG_GLOBAL", git_config_path);
    cmd.env("GIT_CONFIG_SYSTEM", NULL_DEVICE);
    cmd.env("GIT_AUTHOR_DATE", "2025-01-01T00:00:00Z");
    cmd.env("GIT_COMMITTER_DATE", "2025-01-01T00:00:00Z");
    cmd.env("LC_ALL", "C");
    cmd.env("GIT_TERMINAL_PROMPT", "0");
}

/// Fresh repository with one commit on `main`.
#[rstest::fixture]
pub fn repo() -> TestRepo {
    TestRepo::new()
}

/// Repository with a bare `origin` remote tracking `main`.
#[rstest::fixture]
pub fn repo_with_remote(mut repo: TestRepo) -> TestRepo {
    repo.setup_remote("main");
    repo
}

/// Isolated git repository in a temp directory.
pub struct TestRepo {
    temp_dir: TempDir,
    root: PathBuf,
    gitconfig: PathBuf,
    pub remote: Option<PathBuf>,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let gitconfig = temp_dir.path().join("test-gitconfig");
        std::fs::write(
            &gitconfig,
            "[user]\n\tname = Test User\n\temail = test@example.com\n\
             [init]\n\tdefaultBranch = main\n[commit]\n\tgpgsign = false\n",
        )
        .unwrap();

        let root = temp_dir.path().join("repo");
        std::fs::create_dir(&root).unwrap();

        let this = Self {
            temp_dir,
            root,
            gitconfig,
            remote: None,
        };
        this.run_git(&["init", "--initial-branch", "main"]);
        // Local config so the code under test commits and stashes without
        // depending on any global identity.
        this.run_git(&["config", "user.name", "Test User"]);
        this.run_git(&["config", "user.email", "test@example.com"]);
        this.run_git(&["config", "commit.gpgsign", "false"]);
        this.commit_file("README.md", "# test repo\n", "Initial commit");
        this
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Scratch space outside the repository (same temp dir).
    pub fn scratch_path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn git_command(&self) -> Command {
        let mut cmd = Command::new("git");
        configure_git_cmd(&mut cmd, &self.gitconfig);
        cmd.current_dir(&self.root);
        cmd
    }

    /// Run a git command in the repo root, panicking on failure.
    pub fn run_git(&self, args: &[&str]) {
        let output = self.git_command().args(args).output().unwrap();
        check_git_status(&output, &args.join(" "));
    }

    /// Run a git command in `dir`, panicking on failure.
    pub fn run_git_in(&self, dir: &Path, args: &[&str]) {
        let output = self
            .git_command()
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        check_git_status(&output, &args.join(" "));
    }

    /// Run a git command and return trimmed stdout.
    pub fn git_output(&self, args: &[&str]) -> String {
        let output = self.git_command().args(args).output().unwrap();
        check_git_status(&output, &args.join(" "));
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Write `path` (relative to the root), stage it, and commit.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
        self.run_git(&["add", path]);
        self.run_git(&["commit", "-m", message]);
    }

    pub fn head_sha(&self) -> String {
        self.git_output(&["rev-parse", "HEAD"])
    }

    /// Create a bare remote in the temp dir, add it as `origin`, push the
    /// branch, and set the remote HEAD.
    pub fn setup_remote(&mut self, default_branch: &str) {
        let remote_path = self.temp_dir.path().join("origin.git");
        std::fs::create_dir(&remote_path).unwrap();
        self.run_git_in(
            &remote_path,
            &["init", "--bare", "--initial-branch", default_branch],
        );

        let remote_path = dunce::canonicalize(&remote_path).unwrap();
        let remote_str = remote_path.to_str().unwrap();
        self.run_git(&["remote", "add", "origin", remote_str]);
        self.run_git(&["push", "-u", "origin", default_branch]);
        self.run_git(&["remote", "set-head", "origin", default_branch]);
        self.remote = Some(remote_path);
    }

    /// Create a branch with one commit, push it, and return to `main`.
    pub fn publish_branch(&self, branch: &str, file: &str, content: &str) {
        self.run_git(&["checkout", "-b", branch]);
        self.commit_file(file, content, &format!("Add {file} on {branch}"));
        self.run_git(&["push", "-u", "origin", branch]);
        self.run_git(&["checkout", "main"]);
    }

    /// Bare-clone this repository to `<base>/<owner>/<name>.git`, the layout
    /// `RepositoryStore` expects when `clone_base` is a local directory.
    pub fn export_bare(&self, base: &Path, owner: &str, name: &str) -> PathBuf {
        let dest = base.join(owner).join(format!("{name}.git"));
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        let output = self
            .git_command()
            .current_dir(self.temp_dir.path())
            .args(["clone", "--bare"])
            .arg(&self.root)
            .arg(&dest)
            .output()
            .unwrap();
        check_git_status(&output, "clone --bare");
        dest
    }
}

fn check_git_status(output: &std::process::Output, what: &str) {
    assert!(
        output.status.success(),
        "git {what} failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Scripted `UserInteraction`: replays queued answers, records notices.
#[derive(Default)]
pub struct ScriptedUi {
    choices: RefCell<VecDeque<Option<SyncDecision>>>,
    texts: RefCell<VecDeque<Option<String>>>,
    pub notices: RefCell<Vec<(Severity, String)>>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next choice prompt. `None` simulates the
    /// user declining (EOF or cancel).
    pub fn answer(self, choice: Option<SyncDecision>) -> Self {
        self.choices.borrow_mut().push_back(choice);
        self
    }

    /// Queue an answer for the next text prompt.
    pub fn text(self, text: Option<&str>) -> Self {
        self.texts.borrow_mut().push_back(text.map(str::to_string));
        self
    }

    pub fn warnings(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter(|(sev, _)| *sev == Severity::Warning)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

impl UserInteraction for ScriptedUi {
    fn prompt_choice(&self, message: &str, options: &[SyncDecision]) -> Option<SyncDecision> {
        let answer = self
            .choices
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected choice prompt: {message}"));
        if let Some(choice) = answer {
            assert!(
                options.contains(&choice),
                "scripted answer {choice:?} not among offered options {options:?}"
            );
        }
        answer
    }

    fn prompt_text(&self, message: &str) -> Option<String> {
        self.texts
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected text prompt: {message}"))
    }

    fn notify(&self, severity: Severity, message: &str) {
        self.notices
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}
