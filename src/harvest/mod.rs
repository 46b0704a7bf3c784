//! Harvest module - manifest scanning and snapshot assembly.
//!
//! - **Formats**: manifest scanners implementing [`ManifestParser`](crate::traits::ManifestParser)
//! - **Builder**: turns coordinates into a [`SnapshotDocument`](crate::model::SnapshotDocument)

pub mod builder;
pub mod formats;

pub use builder::{build_snapshot, build_snapshot_at, resolve, SnapshotContext};
pub use formats::IvyParser;
