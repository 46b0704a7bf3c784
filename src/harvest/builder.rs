//! Snapshot document assembly.
//!
//! Turns extracted coordinates plus the invocation context into the
//! dependency-graph snapshot payload. Apart from a warning log this is a
//! pure transform: no I/O, and the scan time can be pinned for tests via
//! [`build_snapshot_at`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::config::{SubmissionConfig, DEFAULT_JOB_ID, DEFAULT_WORKFLOW};
use crate::model::{
    DependencyCoordinate, DependencyScope, DetectorInfo, JobInfo, ManifestFile, ManifestRecord,
    Relationship, ResolvedDependency, SnapshotDocument,
};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 0;
pub const MANIFEST_NAME: &str = "ivy";
pub const DETECTOR_NAME: &str = "ivy-manifest-parser";
pub const DETECTOR_VERSION: &str = "0.1.0";
pub const DETECTOR_URL: &str = "https://github.com/actions/dependency-review-action";

/// Invocation context the snapshot is stamped with.
#[derive(Debug, Clone, Default)]
pub struct SnapshotContext {
    /// Manifest path exactly as given on the command line
    pub manifest_path: String,
    pub sha: String,
    pub git_ref: String,
    pub job_id: Option<String>,
    pub workflow: Option<String>,
}

impl SnapshotContext {
    pub fn from_config(config: &SubmissionConfig, manifest_path: &str) -> Self {
        Self {
            manifest_path: manifest_path.to_string(),
            sha: config.sha.clone(),
            git_ref: config.git_ref.clone(),
            job_id: Some(config.job_id.clone()),
            workflow: Some(config.workflow.clone()),
        }
    }

    pub fn job_id(&self) -> &str {
        non_empty_or(self.job_id.as_deref(), DEFAULT_JOB_ID)
    }

    /// `{workflow}:{job}` with defaults substituted for absent parts.
    pub fn correlator(&self) -> String {
        format!(
            "{}:{}",
            non_empty_or(self.workflow.as_deref(), DEFAULT_WORKFLOW),
            self.job_id()
        )
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}

/// Builds a snapshot stamped with the current time.
pub fn build_snapshot(
    coordinates: &[DependencyCoordinate],
    context: &SnapshotContext,
) -> SnapshotDocument {
    build_snapshot_at(coordinates, context, Utc::now())
}

pub fn build_snapshot_at(
    coordinates: &[DependencyCoordinate],
    context: &SnapshotContext,
    scanned: DateTime<Utc>,
) -> SnapshotDocument {
    let resolved = resolve(coordinates);
    debug!(
        declared = coordinates.len(),
        unique = resolved.len(),
        "Resolved dependency set"
    );

    let mut manifests = BTreeMap::new();
    manifests.insert(
        context.manifest_path.clone(),
        ManifestRecord {
            name: MANIFEST_NAME.to_string(),
            file: ManifestFile {
                source_location: context.manifest_path.clone(),
            },
            resolved,
        },
    );

    SnapshotDocument {
        version: SNAPSHOT_SCHEMA_VERSION,
        sha: context.sha.clone(),
        git_ref: context.git_ref.clone(),
        scanned: scanned.to_rfc3339_opts(SecondsFormat::Millis, true),
        job: JobInfo {
            id: context.job_id().to_string(),
            correlator: context.correlator(),
        },
        detector: DetectorInfo {
            name: DETECTOR_NAME.to_string(),
            version: DETECTOR_VERSION.to_string(),
            url: DETECTOR_URL.to_string(),
        },
        manifests,
    }
}

/// Keys every coordinate by its package URL. Identical coordinates collapse
/// to one entry; differing revisions stay separate entries.
pub fn resolve(coordinates: &[DependencyCoordinate]) -> BTreeMap<String, ResolvedDependency> {
    let mut resolved = BTreeMap::new();
    let mut revisions: HashMap<(&str, &str), Vec<&str>> = HashMap::new();

    for coord in coordinates {
        let purl = coord.package_url();

        let seen = revisions
            .entry((coord.org.as_str(), coord.name.as_str()))
            .or_default();
        if !seen.contains(&coord.rev.as_str()) {
            seen.push(coord.rev.as_str());
        }

        resolved.insert(
            purl.clone(),
            ResolvedDependency {
                package_url: purl,
                relationship: Relationship::Direct,
                scope: DependencyScope::Runtime,
                dependencies: Vec::new(),
            },
        );
    }

    for ((org, name), revs) in revisions.iter().filter(|(_, revs)| revs.len() > 1) {
        warn!(
            org = %org,
            name = %name,
            revisions = ?revs,
            "Dependency declared with multiple revisions; submitting each"
        );
    }

    resolved
}
