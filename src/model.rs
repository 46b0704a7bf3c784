use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Package URL type used for every coordinate read from an Ivy manifest.
pub const PURL_TYPE: &str = "maven";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyCoordinate {
    pub org: String,
    pub name: String,
    pub rev: String,
}

impl DependencyCoordinate {
    pub fn new(org: impl Into<String>, name: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
            rev: rev.into(),
        }
    }

    /// Canonical package locator, e.g. `pkg:maven/com.example/foo@1.2.3`.
    pub fn package_url(&self) -> String {
        format!("pkg:{}/{}/{}@{}", PURL_TYPE, self.org, self.name, self.rev)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Direct,
    Indirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Runtime,
    Development,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub package_url: String,
    pub relationship: Relationship,
    pub scope: DependencyScope,
    pub dependencies: Vec<String>, // nested purls; always empty for flat manifests
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub version: u32,
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub scanned: String, // RFC 3339, UTC
    pub job: JobInfo,
    pub detector: DetectorInfo,
    pub manifests: BTreeMap<String, ManifestRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub id: String,
    pub correlator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorInfo {
    pub name: String,
    pub version: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    pub file: ManifestFile,
    pub resolved: BTreeMap<String, ResolvedDependency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub source_location: String,
}
