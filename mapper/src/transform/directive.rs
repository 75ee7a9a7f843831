//! Directive parsing.
//!
//! A directive is a mapping leaf of the form `kind:argument`, or a bare
//! `argument` that reads a CSV column as a string:
//!
//! ```text
//! "bidder_name"          → string column "bidder_name"
//! "integer:bidder_id"    → column "bidder_id" parsed as an integer
//! "constant:Tender"      → the literal "Tender"
//! "constant:http://x.io" → the literal "http://x.io" (only the first colon splits)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapperError;

/// Kind name used when a directive has no `kind:` prefix.
pub const DEFAULT_KIND: &str = "string";

/// A parsed leaf directive.
///
/// The kind is kept as written; it is checked when the directive is
/// resolved against a row, so an unknown kind only fails a conversion
/// that actually reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// The leaf string exactly as it appears in the mapping.
    pub raw: String,
    /// Text before the first colon, or `"string"` without a colon.
    pub kind: String,
    /// Column name, or the literal value for `constant`.
    pub argument: String,
}

impl Directive {
    /// Split a leaf string at its first colon.
    ///
    /// Any string is accepted; this never fails.
    pub fn parse(raw: &str) -> Self {
        let (kind, argument) = match raw.split_once(':') {
            Some((kind, argument)) => (kind, argument),
            None => (DEFAULT_KIND, raw),
        };

        Self {
            raw: raw.to_string(),
            kind: kind.to_string(),
            argument: argument.to_string(),
        }
    }

    /// Resolve the kind prefix.
    pub fn kind(&self) -> Result<DirectiveKind, MapperError> {
        self.kind.parse()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Recognized directive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    /// Column value, unchanged.
    String,
    /// The argument itself.
    Constant,
    /// Column value parsed as a base-10 integer.
    Integer,
    /// Column value parsed as a floating point number.
    Number,
    /// Column value checked against `1`, `t`, `true`, `yes`.
    Boolean,
    /// Column value split on commas.
    List,
}

impl DirectiveKind {
    /// Every kind, in the order they are documented.
    pub const ALL: [DirectiveKind; 6] = [
        DirectiveKind::String,
        DirectiveKind::Constant,
        DirectiveKind::Integer,
        DirectiveKind::Number,
        DirectiveKind::Boolean,
        DirectiveKind::List,
    ];

    /// Names of every kind, as written in a mapping.
    pub const NAMES: [&'static str; 6] = ["string", "constant", "integer", "number", "boolean", "list"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::String => "string",
            DirectiveKind::Constant => "constant",
            DirectiveKind::Integer => "integer",
            DirectiveKind::Number => "number",
            DirectiveKind::Boolean => "boolean",
            DirectiveKind::List => "list",
        }
    }

    /// Whether the argument names a CSV column.
    pub fn reads_column(&self) -> bool {
        !matches!(self, DirectiveKind::Constant)
    }

    /// One-line description, used by the CLI.
    pub fn description(&self) -> &'static str {
        match self {
            DirectiveKind::String => "the column value as a string (also used when no kind is given)",
            DirectiveKind::Constant => "the text after the colon, the row is not consulted",
            DirectiveKind::Integer => "the column value parsed as a base-10 integer",
            DirectiveKind::Number => "the column value parsed as a floating point number",
            DirectiveKind::Boolean => "true for 1, t, true, yes (any case), false for anything else",
            DirectiveKind::List => "the column value split on ',' into an array of trimmed strings",
        }
    }
}

impl FromStr for DirectiveKind {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(DirectiveKind::String),
            "constant" => Ok(DirectiveKind::Constant),
            "integer" => Ok(DirectiveKind::Integer),
            "number" => Ok(DirectiveKind::Number),
            "boolean" => Ok(DirectiveKind::Boolean),
            "list" => Ok(DirectiveKind::List),
            other => Err(MapperError::UnknownDirectiveKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable list of directive kinds.
pub fn directives_description() -> String {
    let mut out = String::from("Directive syntax: \"kind:argument\" or \"column\"\n\n");
    for kind in DirectiveKind::ALL {
        out.push_str(&format!("  {:<10} {}\n", kind.as_str(), kind.description()));
    }
    out.push_str("\nOnly the first colon separates kind and argument.\n");
    out.push_str("Empty strings, numbers, booleans and null are copied to the output as-is.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_argument_defaults_to_string() {
        let d = Directive::parse("bidder_name");
        assert_eq!(d.kind, "string");
        assert_eq!(d.argument, "bidder_name");
        assert_eq!(d.kind().unwrap(), DirectiveKind::String);
    }

    #[test]
    fn test_split_at_first_colon_only() {
        let d = Directive::parse("constant:http://example.com:8080/x");
        assert_eq!(d.kind, "constant");
        assert_eq!(d.argument, "http://example.com:8080/x");
        assert_eq!(d.raw, "constant:http://example.com:8080/x");
    }

    #[test]
    fn test_empty_argument() {
        let d = Directive::parse("constant:");
        assert_eq!(d.kind, "constant");
        assert_eq!(d.argument, "");
    }

    #[test]
    fn test_unknown_kind_is_parsed_but_not_resolved() {
        let d = Directive::parse("date:signed_on");
        assert_eq!(d.kind, "date");
        assert_eq!(
            d.kind(),
            Err(MapperError::UnknownDirectiveKind { kind: "date".into() })
        );
    }

    #[test]
    fn test_kind_names_match_from_str() {
        for kind in DirectiveKind::ALL {
            assert_eq!(kind.as_str().parse::<DirectiveKind>().unwrap(), kind);
        }
        assert_eq!(DirectiveKind::NAMES.len(), DirectiveKind::ALL.len());
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert!("Integer".parse::<DirectiveKind>().is_err());
    }

    #[test]
    fn test_description_mentions_every_kind() {
        let text = directives_description();
        for name in DirectiveKind::NAMES {
            assert!(text.contains(name));
        }
    }
}
