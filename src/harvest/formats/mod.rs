//! Manifest format implementations.
//!
//! Each format implements [`ManifestParser`](crate::traits::ManifestParser).

pub mod ivy;

pub use ivy::IvyParser;
