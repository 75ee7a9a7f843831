//! # OCDS Mapper - CSV to Open Contracting releases
//!
//! Converts CSV records into an Open Contracting document. A mapping file
//! (itself an OCDS-shaped JSON document) says, leaf by leaf, where each
//! output value comes from: a CSV column, a constant, or a column coerced
//! to an integer, number, boolean or list.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │ mapping.json│────▶│   Mapping   │──┐
//! └─────────────┘     │   loader    │  │  ┌────────────┐     ┌────────────┐     ┌───────────┐
//!                     └─────────────┘  ├─▶│ Traversal  │────▶│ Assembler  │────▶│ OCDS JSON │
//! ┌─────────────┐     ┌─────────────┐  │  │ (per row)  │     │ (+ IDs)    │     └───────────┘
//! │  data.csv   │────▶│ CSV reader  │──┘  └────────────┘     └────────────┘
//! └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ocds_mapper::{convert_bytes, ConvertOptions, UuidTokens};
//!
//! let options = ConvertOptions::new("data.csv", "mapping.json", "John Doe", "2014-07-26");
//! let document = convert_bytes(csv_bytes, mapping_bytes, &options, UuidTokens)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Mapping tree, rows, output document
//! - [`transform`] - Directives, coercion, traversal, assembly, pipeline
//! - [`mapping`] - Mapping definition loading
//! - [`parser`] - CSV reading
//! - [`source`] - File and URL loading
//! - [`output`] - JSON serialization
//! - [`config`] - Environment configuration
//! - [`logs`] - Progress log

// Core modules
pub mod error;
pub mod models;

// Transformation
pub mod transform;

// Loading
pub mod mapping;
pub mod parser;
pub mod source;

// Output
pub mod output;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, MapperError, MappingError, OutputError, PipelineError, PipelineResult, SourceError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{MappingNode, OutputDocument, Row};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    convert, convert_bytes, convert_parsed, directives_description, lookup, process, resolve,
    traverse, ConvertOptions, Directive, DirectiveKind, ReleaseAssembler, TokenSource, UuidTokens,
};

// =============================================================================
// Re-exports - Loading and output
// =============================================================================

pub use config::LoaderConfig;
pub use mapping::MappingDefinition;
pub use output::{to_json_string, write_output};
pub use parser::{parse_bytes, parse_str, ParsedCsv};
pub use source::{is_url, SourceLoader};
