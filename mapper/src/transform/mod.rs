//! Transformation module.
//!
//! - `directive`: Parse leaf strings into kind and argument
//! - `coerce`: Row lookup and typed values
//! - `traverse`: Walk the release template for one row
//! - `assembler`: One release per row, with release IDs
//! - `pipeline`: Load, convert and serialize

pub mod assembler;
pub mod coerce;
pub mod directive;
pub mod pipeline;
pub mod traverse;

pub use assembler::{ReleaseAssembler, TokenSource, UuidTokens};
pub use coerce::{coerce, lookup, resolve};
pub use directive::{directives_description, Directive, DirectiveKind};
pub use pipeline::{convert, convert_bytes, convert_parsed, process, ConvertOptions};
pub use traverse::traverse;
