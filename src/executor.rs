use crate::config::{ConfigError, SubmissionConfig};
use crate::harvest::builder::{build_snapshot, SnapshotContext};
use crate::model::SnapshotDocument;
use crate::traits::{
    ManifestParser, ParseError, SnapshotTransport, SubmissionReceipt, SubmitError,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Terminal failure of a submission run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read manifest {path}: {source}")]
    ReadManifest {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug)]
pub struct SubmissionOutcome {
    pub receipt: SubmissionReceipt,
    /// Dependency tags found in the manifest
    pub declared: usize,
    /// Unique package URLs submitted
    pub resolved: usize,
}

/// Runs one manifest through parse → build → submit.
pub struct SubmissionExecutor<P, T> {
    parser: P,
    transport: T,
}

impl<P, T> SubmissionExecutor<P, T>
where
    P: ManifestParser,
    T: SnapshotTransport,
{
    pub fn new(parser: P, transport: T) -> Self {
        Self { parser, transport }
    }

    /// Reads and parses the manifest and assembles the snapshot. No network.
    pub async fn prepare(
        &self,
        config: &SubmissionConfig,
        manifest_path: &str,
    ) -> Result<(SnapshotDocument, usize), RunError> {
        let content = tokio::fs::read_to_string(manifest_path)
            .await
            .map_err(|source| RunError::ReadManifest {
                path: manifest_path.to_string(),
                source,
            })?;

        let coordinates = self.parser.parse(manifest_path, &content)?;
        info!(
            format = self.parser.format_id(),
            count = coordinates.len(),
            "Parsed manifest"
        );

        let context = SnapshotContext::from_config(config, manifest_path);
        Ok((build_snapshot(&coordinates, &context), coordinates.len()))
    }

    #[instrument(skip(self, config), fields(repo = %config.repository.name))]
    pub async fn execute(
        &self,
        config: &SubmissionConfig,
        manifest_path: &str,
    ) -> Result<SubmissionOutcome, RunError> {
        let (snapshot, declared) = self.prepare(config, manifest_path).await?;
        let resolved: usize = snapshot
            .manifests
            .values()
            .map(|m| m.resolved.len())
            .sum();

        debug!(sha = %snapshot.sha, git_ref = %snapshot.git_ref, "Submitting snapshot");
        let receipt = self
            .transport
            .submit(&config.repository, &config.token, &snapshot)
            .await?;

        info!(status = receipt.status, resolved, "Finished submission");
        Ok(SubmissionOutcome {
            receipt,
            declared,
            resolved,
        })
    }
}
