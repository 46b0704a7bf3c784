//! Lenient scanner for Ivy `ivy.xml` manifests.
//!
//! This is a pattern scan, not an XML parse. Any `<dependency ...>` tag that
//! carries non-empty `org`, `name` and `rev` attributes is picked up, in any
//! attribute order, whether the tag is self-closing or not. Well-formedness
//! is never checked: fragments inside comments still match, and broken
//! markup that doesn't fit the shape is skipped silently.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::DependencyCoordinate;
use crate::traits::{ManifestParser, ParseError};

static DEPENDENCY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<dependency\s+([^>]*)>").expect("valid tag pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

/// Parser for Ivy module descriptors.
#[derive(Debug, Default)]
pub struct IvyParser;

impl IvyParser {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestParser for IvyParser {
    fn format_id(&self) -> &str {
        "ivy"
    }

    fn parse(
        &self,
        source: &str,
        content: &str,
    ) -> Result<Vec<DependencyCoordinate>, ParseError> {
        let coordinates = scan_dependencies(content);
        if coordinates.is_empty() {
            return Err(ParseError::NoDependencies(source.to_string()));
        }
        Ok(coordinates)
    }
}

/// Returns every dependency declared in `content`, in document order.
pub fn scan_dependencies(content: &str) -> Vec<DependencyCoordinate> {
    DEPENDENCY_TAG
        .captures_iter(content)
        .filter_map(|tag| {
            tag.get(1)
                .and_then(|attrs| coordinate_from_attrs(attrs.as_str()))
        })
        .collect()
}

fn coordinate_from_attrs(attrs: &str) -> Option<DependencyCoordinate> {
    let mut org = None;
    let mut name = None;
    let mut rev = None;

    for attr in ATTRIBUTE.captures_iter(attrs) {
        let value = match attr.get(2).or_else(|| attr.get(3)) {
            Some(v) => v.as_str(),
            None => continue,
        };
        let slot = match &attr[1] {
            "org" => &mut org,
            "name" => &mut name,
            "rev" => &mut rev,
            _ => continue,
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    match (org, name, rev) {
        (Some(org), Some(name), Some(rev))
            if !org.is_empty() && !name.is_empty() && !rev.is_empty() =>
        {
            Some(DependencyCoordinate::new(org, name, rev))
        }
        _ => None,
    }
}
