//! Mapping definition loading.
//!
//! A mapping is an Open Contracting document whose first release is a
//! template: every non-empty string in it is a directive.
//!
//! ```json
//! {
//!     "publisher": {"name": ""},
//!     "publishingMeta": {"date": ""},
//!     "releases": [{
//!         "releaseMeta": {"ocid": "ocid", "locale": "constant:en_us"},
//!         "tender": {"value": {"amount": "number:amount"}}
//!     }]
//! }
//! ```

use serde_json::{Map, Value};

use crate::error::{MappingError, MappingResult};
use crate::models::{MappingNode, OutputDocument, RELEASES_KEY};

/// A loaded mapping: the document around the releases, and the release template.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDefinition {
    /// Top level of the mapping, `releases` still in place.
    pub document: Map<String, Value>,
    /// Parsed `releases[0]`.
    pub release_schema: MappingNode,
    /// Number of entries under `releases`; only the first is used.
    pub template_count: usize,
}

impl MappingDefinition {
    /// Parse mapping bytes.
    pub fn from_slice(bytes: &[u8]) -> MappingResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Parse an already decoded JSON mapping.
    pub fn from_value(value: Value) -> MappingResult<Self> {
        let Value::Object(document) = value else {
            return Err(MappingError::NotAnObject);
        };

        let templates = match document.get(RELEASES_KEY) {
            None => return Err(MappingError::MissingReleaseTemplate("no \"releases\" key")),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(MappingError::MissingReleaseTemplate("\"releases\" is not an array")),
        };
        let template = templates
            .first()
            .ok_or(MappingError::MissingReleaseTemplate("\"releases\" is empty"))?;

        let release_schema = MappingNode::from_value(template);
        let template_count = templates.len();

        Ok(Self {
            document,
            release_schema,
            template_count,
        })
    }

    /// Start the output document for a run.
    pub fn output_document(&self, publisher_name: &str, publish_date: &str) -> MappingResult<OutputDocument> {
        OutputDocument::new(self.document.clone(), publisher_name, publish_date)
    }

    /// Columns the release template reads.
    pub fn referenced_columns(&self) -> Vec<String> {
        self.release_schema.referenced_columns()
    }
}
