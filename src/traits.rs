use crate::model::{DependencyCoordinate, SnapshotDocument};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No dependencies found in {0}")]
    NoDependencies(String),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Dependency submission failed: {status}")]
    Rejected { status: u16, body: String },
    #[error("Dependency submission error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SubmitError {
    /// Server-provided diagnostic body, when the request got that far.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            SubmitError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Owner and name of the repository a snapshot is filed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub owner: String,
    pub name: String,
}

/// Successful response from the snapshot endpoint.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub status: u16,
    pub body: String,
}

pub trait ManifestParser: Send + Sync {
    /// Returns the manifest format this parser handles (e.g., "ivy").
    fn format_id(&self) -> &str;

    /// Extracts dependency coordinates from raw manifest text.
    ///
    /// `source` names the manifest in error messages. An input with no
    /// matching declarations is an error, never an empty success.
    fn parse(&self, source: &str, content: &str)
        -> Result<Vec<DependencyCoordinate>, ParseError>;
}

#[async_trait]
pub trait SnapshotTransport: Send + Sync {
    /// Sends one snapshot. Implementations must not retry.
    async fn submit(
        &self,
        target: &RepositoryTarget,
        token: &str,
        snapshot: &SnapshotDocument,
    ) -> Result<SubmissionReceipt, SubmitError>;
}
