//! Error types for the OCDS mapper.
//!
//! One error enum per layer:
//!
//! - [`MapperError`] - Directive resolution against a CSV row (the core)
//! - [`MappingError`] - Invalid mapping definition
//! - [`CsvError`] - CSV reading errors
//! - [`SourceError`] - Loading a file or URL
//! - [`OutputError`] - Serializing or writing the output document
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::transform::directive::DirectiveKind;

// =============================================================================
// Core Errors
// =============================================================================

/// Errors raised while resolving directives against a row.
///
/// Every variant is fatal for the whole conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapperError {
    /// A directive references a column that is not a CSV header.
    #[error("Mapping uses invalid CSV header \"{0}\"")]
    MissingColumn(String),

    /// An `integer` or `number` directive sourced a value of the wrong shape.
    #[error("\"{value}\" is not {expected}. Maybe mapping \"{directive}\" is invalid.")]
    ValueConversion {
        value: String,
        directive: String,
        expected: &'static str,
    },

    /// The directive prefix is not a known kind.
    #[error(
        "Invalid column type \"{kind}:\" -- valid column types are: {}.",
        DirectiveKind::NAMES.join(", ")
    )]
    UnknownDirectiveKind { kind: String },
}

// =============================================================================
// Mapping Definition Errors
// =============================================================================

/// Errors in the shape of the mapping definition.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping is not valid JSON.
    #[error("Mapping is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top level of the mapping is not a JSON object.
    #[error("Mapping must be a JSON object at the top level")]
    NotAnObject,

    /// No release template under `releases`.
    #[error("Mapping has no release template: {0}")]
    MissingReleaseTemplate(&'static str),

    /// A section that has to hold an object holds something else.
    #[error("Mapping section \"{0}\" must be a JSON object")]
    InvalidSection(String),
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors during CSV reading.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Malformed CSV (unbalanced quotes, ragged rows, ...).
    #[error("Invalid CSV: {0}")]
    Parse(#[from] csv::Error),

    /// No header row.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// Delimiter is not a single byte.
    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    InvalidDelimiter(char),
}

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while opening a mapping or CSV source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read a local file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} while fetching {url}")]
    Status { url: String, status: u16 },

    /// The URL scheme cannot be loaded.
    #[error("Unsupported URL scheme \"{0}\"")]
    UnsupportedScheme(String),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while producing the JSON text.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Could not write the output file.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core mapping error.
    #[error("{0}")]
    Mapper(#[from] MapperError),

    /// Mapping definition error.
    #[error("{0}")]
    Mapping(#[from] MappingError),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Source loading error.
    #[error("{0}")]
    Source(#[from] SourceError),

    /// Output error.
    #[error("{0}")]
    Output(#[from] OutputError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for directive resolution.
pub type MapperResult<T> = Result<T, MapperError>;

/// Result type for mapping definition loading.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for source loading.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let err: PipelineError = MapperError::MissingColumn("buyer".into()).into();
        assert!(matches!(err, PipelineError::Mapper(MapperError::MissingColumn(_))));
        assert!(err.to_string().contains("buyer"));

        let err: PipelineError = MappingError::NotAnObject.into();
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn test_value_conversion_names_value_and_directive() {
        let err = MapperError::ValueConversion {
            value: "abc".into(),
            directive: "number:price".into(),
            expected: "a float",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"abc\" is not a float"));
        assert!(msg.contains("number:price"));
    }

    #[test]
    fn test_unknown_kind_lists_valid_kinds() {
        let err = MapperError::UnknownDirectiveKind { kind: "date".into() };
        let msg = err.to_string();
        assert!(msg.contains("\"date:\""));
        for name in ["string", "constant", "integer", "number", "boolean", "list"] {
            assert!(msg.contains(name), "missing {name} in {msg}");
        }
    }
}
