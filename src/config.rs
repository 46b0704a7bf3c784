//! Invocation context read from the CI environment.
//!
//! All lookups go through [`SubmissionConfig::from_lookup`] so tests can
//! supply variables without touching the process environment. Empty values
//! are treated the same as unset ones.

use std::fmt;

use thiserror::Error;

use crate::traits::RepositoryTarget;

pub const DEFAULT_MANIFEST_PATH: &str = "ivy.xml";
pub const DEFAULT_JOB_ID: &str = "ivy-dependency-submission";
pub const DEFAULT_WORKFLOW: &str = "ivy-workflow";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const TOKEN_FALLBACK_VAR: &str = "GITHUB_AUTH_TOKEN";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing GITHUB_TOKEN for dependency submission.")]
    MissingToken,
    #[error("Missing required GitHub environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
    #[error("GITHUB_REPOSITORY must be in owner/name form, got '{0}'")]
    InvalidRepository(String),
}

/// Everything a submission needs besides the manifest itself.
#[derive(Clone)]
pub struct SubmissionConfig {
    pub token: String,
    pub repository: RepositoryTarget,
    pub sha: String,
    pub git_ref: String,
    pub job_id: String,
    pub workflow: String,
    pub api_url: String,
}

impl SubmissionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let token = get(TOKEN_VAR)
            .or_else(|| get(TOKEN_FALLBACK_VAR))
            .ok_or(ConfigError::MissingToken)?;

        let repository = get("GITHUB_REPOSITORY");
        let sha = get("GITHUB_SHA");
        let git_ref = get("GITHUB_REF");

        let mut missing = Vec::new();
        if repository.is_none() {
            missing.push("GITHUB_REPOSITORY");
        }
        if sha.is_none() {
            missing.push("GITHUB_SHA");
        }
        if git_ref.is_none() {
            missing.push("GITHUB_REF");
        }

        let (Some(repository), Some(sha), Some(git_ref)) = (repository, sha, git_ref) else {
            return Err(ConfigError::MissingVariables(missing));
        };

        Ok(Self {
            token,
            repository: parse_repository(&repository)?,
            sha,
            git_ref,
            job_id: get("GITHUB_JOB").unwrap_or_else(|| DEFAULT_JOB_ID.to_string()),
            workflow: get("GITHUB_WORKFLOW").unwrap_or_else(|| DEFAULT_WORKFLOW.to_string()),
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

impl fmt::Debug for SubmissionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionConfig")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("sha", &self.sha)
            .field("git_ref", &self.git_ref)
            .field("job_id", &self.job_id)
            .field("workflow", &self.workflow)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Splits `owner/name`. Both halves must be present and non-empty.
pub fn parse_repository(value: &str) -> Result<RepositoryTarget, ConfigError> {
    match value.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(RepositoryTarget {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => Err(ConfigError::InvalidRepository(value.to_string())),
    }
}
