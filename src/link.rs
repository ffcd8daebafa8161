//! GitHub URL parsing and formatting
//!
//! A [`LinkSpec`] is the parsed form of a GitHub file URL:
//!
//! ```text
//! https://github.com/acme/widgets/blob/main/src/lib.rs#L10-L20
//!         \_________/ \__/ \_____/      \__/ \________/  \__/
//!             host   owner   repo     branch  file path  lines
//! ```
//!
//! Parsing and formatting are inverses for every representable spec, with
//! one normalization: a single-line selection always renders as `#L10`,
//! never `#L10-L10`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches GitHub repository and blob/tree URLs with optional line anchors.
/// Anchored on both ends so trailing junk is rejected rather than ignored.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https://github\.com/([^/]+)/([^/]+?)(?:\.git)?(?:/(?:blob|tree)/([^/]+)/(.+?))?(?:#L(\d+)(?:-L(\d+))?)?$",
    )
    .expect("link regex is valid")
});

/// A parsed GitHub link: coordinates of a repository, branch, file, and
/// optional line selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Repository-relative path, `/`-separated. Empty for a bare repo URL.
    pub file_path: String,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
}

impl LinkSpec {
    /// Parse a GitHub URL. Returns `None` for anything that isn't a
    /// well-formed `https://github.com/...` repository or blob URL.
    ///
    /// A bare repository URL (`https://github.com/acme/widgets`) parses
    /// with `default_branch` and an empty file path. A reversed line range
    /// (`#L20-L10`) is rejected outright rather than silently swapped.
    pub fn parse(url: &str, default_branch: &str) -> Option<Self> {
        let caps = LINK_RE.captures(url.trim())?;

        let owner = caps.get(1)?.as_str().to_string();
        let repo = caps.get(2)?.as_str().to_string();
        let branch = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| default_branch.to_string());
        let file_path = caps
            .get(4)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        // Line anchors only make sense on a file URL
        let start_line = caps.get(5).and_then(|m| m.as_str().parse::<u32>().ok());
        let end_line = caps.get(6).and_then(|m| m.as_str().parse::<u32>().ok());
        if (start_line.is_some() || end_line.is_some()) && file_path.is_empty() {
            return None;
        }
        if let (Some(start), Some(end)) = (start_line, end_line) {
            if end < start {
                return None;
            }
        }
        if start_line == Some(0) || end_line == Some(0) {
            return None;
        }

        Some(Self {
            owner,
            repo,
            branch,
            file_path,
            start_line,
            end_line,
        })
    }

    /// Build a spec from repository coordinates and a line selection,
    /// normalizing a single-line range to `end_line: None`.
    pub fn with_selection(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        file_path: impl Into<String>,
        start_line: Option<u32>,
        end_line: Option<u32>,
    ) -> Self {
        let (start_line, end_line) = match (start_line, end_line) {
            (Some(s), Some(e)) if e == s => (Some(s), None),
            other => other,
        };
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            file_path: file_path.into(),
            start_line,
            end_line,
        }
    }

    /// Render back into a GitHub URL.
    ///
    /// With an empty file path this produces the bare repository URL; line
    /// anchors render as `#L10` for a single line and `#L10-L20` for a
    /// range.
    pub fn to_url(&self) -> String {
        let mut url = format!("https://github.com/{}/{}", self.owner, self.repo);
        if !self.file_path.is_empty() {
            url.push_str(&format!("/blob/{}/{}", self.branch, self.file_path));
            match (self.start_line, self.end_line) {
                (Some(s), Some(e)) if e != s => url.push_str(&format!("#L{s}-L{e}")),
                (Some(s), _) => url.push_str(&format!("#L{s}")),
                (None, _) => {}
            }
        }
        url
    }

    /// `owner/repo`, handy for messages.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
