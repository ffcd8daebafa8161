//! Remote URL parsing
//!
//! Git remotes come in several shapes that all name the same repository:
//!
//! ```text
//! https://github.com/acme/widgets.git
//! git@github.com:acme/widgets.git
//! git@github.com:/acme/widgets       (leading slash after the colon)
//! ssh://git@github.com/acme/widgets
//! ```
//!
//! [`RemoteUrl::parse`] normalizes all of these to `(host, owner, repo)`.

/// A parsed git remote URL, reduced to host and repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

impl RemoteUrl {
    /// Parse a remote URL in https, scp-like ssh, or ssh:// form.
    ///
    /// Returns `None` for URLs that don't resolve to exactly
    /// `host/owner/repo`; extra path segments are rejected rather than
    /// truncated.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();

        if let Some(rest) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        {
            return Self::from_host_path(rest);
        }

        if let Some(rest) = url.strip_prefix("ssh://") {
            // ssh://git@host/owner/repo
            let rest = rest.split_once('@').map(|(_, r)| r).unwrap_or(rest);
            return Self::from_host_path(rest);
        }

        // scp-like: user@host:owner/repo or user@host:/owner/repo
        if let Some((user_host, path)) = url.split_once(':') {
            let host = user_host.split_once('@').map(|(_, h)| h)?;
            let path = path.strip_prefix('/').unwrap_or(path);
            return Self::from_owner_repo(host, path);
        }

        None
    }

    fn from_host_path(host_path: &str) -> Option<Self> {
        let (host, path) = host_path.split_once('/')?;
        Self::from_owner_repo(host, path)
    }

    fn from_owner_repo(host: &str, path: &str) -> Option<Self> {
        let mut parts = path.split('/');
        let owner = parts.next()?;
        let repo = parts.next()?.trim_end_matches(".git");
        if host.is_empty() || owner.is_empty() || repo.is_empty() || parts.next().is_some() {
            return None;
        }
        Some(Self {
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Whether this remote lives on github.com.
    pub fn is_github(&self) -> bool {
        self.host == "github.com"
    }
}
