//! Domain models for the mapper.
//!
//! - [`MappingNode`] - Parsed release template, the shape every release follows
//! - [`Row`] - One CSV record, header name to raw value
//! - [`OutputDocument`] - The document being assembled for one run

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::MappingError;
use crate::transform::directive::{Directive, DirectiveKind};

// =============================================================================
// Mapping Structure
// =============================================================================

/// A node of the release template.
///
/// Built once when the mapping is loaded; traversal never changes its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingNode {
    /// Keys in the order of the mapping file.
    Object(Vec<(String, MappingNode)>),
    /// Fixed-length list.
    Sequence(Vec<MappingNode>),
    /// Copied to the output unchanged (empty strings, numbers, booleans, null).
    Literal(Value),
    /// Resolved against each row.
    Directive(Directive),
}

impl MappingNode {
    /// Build the tree from a JSON value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => MappingNode::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), MappingNode::from_value(child)))
                    .collect(),
            ),
            Value::Array(items) => {
                MappingNode::Sequence(items.iter().map(MappingNode::from_value).collect())
            }
            Value::String(s) if !s.is_empty() => MappingNode::Directive(Directive::parse(s)),
            other => MappingNode::Literal(other.clone()),
        }
    }

    /// Columns read by directives below this node, first use first, no duplicates.
    ///
    /// `constant` directives are skipped. Directives with an unknown kind are
    /// skipped too; they fail on their own when a row reaches them.
    pub fn referenced_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, out: &mut Vec<String>) {
        match self {
            MappingNode::Object(entries) => {
                for (_, child) in entries {
                    child.collect_columns(out);
                }
            }
            MappingNode::Sequence(items) => {
                for item in items {
                    item.collect_columns(out);
                }
            }
            MappingNode::Directive(directive) => {
                let reads_column = directive.kind().map(|k| k.reads_column()).unwrap_or(false);
                if reads_column && !out.contains(&directive.argument) {
                    out.push(directive.argument.clone());
                }
            }
            MappingNode::Literal(_) => {}
        }
    }

    /// Every directive leaf with its JSON-pointer-like path.
    pub fn directives(&self) -> Vec<(String, &Directive)> {
        let mut found = Vec::new();
        self.collect_directives(String::new(), &mut found);
        found
    }

    fn collect_directives<'a>(&'a self, path: String, out: &mut Vec<(String, &'a Directive)>) {
        match self {
            MappingNode::Object(entries) => {
                for (key, child) in entries {
                    child.collect_directives(format!("{}/{}", path, key), out);
                }
            }
            MappingNode::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_directives(format!("{}/{}", path, i), out);
                }
            }
            MappingNode::Directive(directive) => out.push((path, directive)),
            MappingNode::Literal(_) => {}
        }
    }

    /// Count directive leaves per resolved kind; unknown kinds are counted under `None`.
    pub fn kind_counts(&self) -> HashMap<Option<DirectiveKind>, usize> {
        let mut counts = HashMap::new();
        for (_, directive) in self.directives() {
            *counts.entry(directive.kind().ok()).or_insert(0) += 1;
        }
        counts
    }
}

// =============================================================================
// Input Record
// =============================================================================

/// One CSV record: header name to raw cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value for the same header.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The row as a JSON object of strings, keys in the given header order.
    pub fn to_json(&self, headers: &[String]) -> Value {
        let mut obj = Map::new();
        for header in headers {
            if let Some(value) = self.fields.get(header) {
                obj.insert(header.clone(), Value::String(value.clone()));
            }
        }
        Value::Object(obj)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

// =============================================================================
// Output Document
// =============================================================================

/// Top-level key holding the list of releases.
pub const RELEASES_KEY: &str = "releases";
/// Section holding the publisher name.
pub const PUBLISHER_KEY: &str = "publisher";
/// Section holding the publish date.
pub const PUBLISHING_META_KEY: &str = "publishingMeta";
/// Per-release metadata section.
pub const RELEASE_META_KEY: &str = "releaseMeta";
/// Release identifier inside [`RELEASE_META_KEY`].
pub const RELEASE_ID_KEY: &str = "releaseID";

/// The document written at the end of a run.
///
/// Everything from the mapping except the release template, with the
/// publisher name and publish date filled in and the releases appended in
/// row order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDocument {
    document: Map<String, Value>,
    releases: Vec<Value>,
}

impl OutputDocument {
    /// Prepare the document from the mapping's top level.
    ///
    /// `publisher.name` and `publishingMeta.date` are overwritten, creating
    /// the sections when the mapping omits them.
    pub fn new(
        template: Map<String, Value>,
        publisher_name: &str,
        publish_date: &str,
    ) -> Result<Self, MappingError> {
        let mut document = template;

        set_field(&mut document, PUBLISHER_KEY, "name", publisher_name)?;
        set_field(&mut document, PUBLISHING_META_KEY, "date", publish_date)?;
        // Keeps the key where the mapping put it.
        document.insert(RELEASES_KEY.to_string(), Value::Array(Vec::new()));

        Ok(Self {
            document,
            releases: Vec::new(),
        })
    }

    pub fn extend_releases(&mut self, releases: impl IntoIterator<Item = Value>) {
        self.releases.extend(releases);
    }

    pub fn releases(&self) -> &[Value] {
        &self.releases
    }

    pub fn into_value(self) -> Value {
        let mut document = self.document;
        document.insert(RELEASES_KEY.to_string(), Value::Array(self.releases));
        Value::Object(document)
    }
}

fn set_field(
    document: &mut Map<String, Value>,
    section: &str,
    field: &str,
    value: &str,
) -> Result<(), MappingError> {
    let entry = document
        .entry(section.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    match entry {
        Value::Object(obj) => {
            obj.insert(field.to_string(), Value::String(value.to_string()));
            Ok(())
        }
        _ => Err(MappingError::InvalidSection(section.to_string())),
    }
}
