//! Remote revision resolution
//!
//! Resolves the newest revision of the upstream branch through the hosting
//! provider's commits-listing API rather than a clone: one HTTPS request
//! returning a JSON array of commit descriptors, newest first.

use async_trait::async_trait;
use serde::Deserialize;

use crate::revision::RevisionId;

/// Default metadata API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Errors raised while resolving the newest upstream revision.
///
/// All of these are fatal to a run; no retries happen beyond what the
/// transport performs by default.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Revision query to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Revision query to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Revision query to {url} returned a malformed body: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No commits found for branch {branch} of {repository}")]
    EmptyHistory { repository: String, branch: String },
}

/// One entry of the commits-listing response. Only the identifier is read.
#[derive(Debug, Deserialize)]
struct CommitDescriptor {
    sha: String,
}

/// Source of the newest revision of a named upstream branch.
#[async_trait]
pub trait RevisionSource: Send + Sync {
    async fn latest_revision(
        &self,
        repository: &str,
        branch: &str,
    ) -> std::result::Result<RevisionId, RemoteError>;
}

/// [`RevisionSource`] backed by the hosting provider's commits API.
#[derive(Debug)]
pub struct CommitsApi {
    client: reqwest::Client,
    base_url: String,
}

impl CommitsApi {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Point the resolver at a different API base. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn commits_url(&self, repository: &str, branch: &str) -> String {
        format!(
            "{}/repos/{}/commits?sha={}&per_page=1",
            self.base_url, repository, branch
        )
    }
}

impl Default for CommitsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevisionSource for CommitsApi {
    async fn latest_revision(
        &self,
        repository: &str,
        branch: &str,
    ) -> std::result::Result<RevisionId, RemoteError> {
        let url = self.commits_url(repository, branch);
        tracing::debug!(%url, "Querying newest upstream revision");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, "kitsync")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| RemoteError::Request {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let descriptors: Vec<CommitDescriptor> =
            response.json().await.map_err(|e| RemoteError::MalformedBody {
                url: url.clone(),
                source: e,
            })?;

        descriptors
            .into_iter()
            .next()
            .map(|descriptor| RevisionId::new(descriptor.sha))
            .ok_or_else(|| RemoteError::EmptyHistory {
                repository: repository.to_string(),
                branch: branch.to_string(),
            })
    }
}
