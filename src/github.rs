//! Client for the GitHub dependency-graph snapshot endpoint.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::model::SnapshotDocument;
use crate::traits::{RepositoryTarget, SnapshotTransport, SubmissionReceipt, SubmitError};

pub const USER_AGENT: &str = "ivy-dependency-submission";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Posts snapshots to `{base_url}/repos/{owner}/{repo}/dependency-graph/snapshots`.
pub struct GithubSnapshotClient {
    client: Client,
    base_url: String,
}

impl GithubSnapshotClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SubmitError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn snapshots_url(&self, target: &RepositoryTarget) -> String {
        format!(
            "{}/repos/{}/{}/dependency-graph/snapshots",
            self.base_url, target.owner, target.name
        )
    }
}

#[async_trait]
impl SnapshotTransport for GithubSnapshotClient {
    #[instrument(skip(self, token, snapshot), fields(owner = %target.owner, repo = %target.name))]
    async fn submit(
        &self,
        target: &RepositoryTarget,
        token: &str,
        snapshot: &SnapshotDocument,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let url = self.snapshots_url(target);
        let body = serde_json::to_vec(snapshot)?;
        debug!(url = %url, bytes = body.len(), "Posting dependency snapshot");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_JSON)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        info!(status = status.as_u16(), "Snapshot accepted");
        Ok(SubmissionReceipt {
            status: status.as_u16(),
            body: text,
        })
    }
}
