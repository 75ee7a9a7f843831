//! JSON output.
//!
//! Documents are indented with four spaces and non-ASCII text is written as-is.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::OutputError;
use crate::logs::log_success;

const INDENT: &[u8] = b"    ";

/// Serialize to indented JSON text.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    // serde_json only emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `content` to `path`, or to stdout without a path.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), OutputError> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_four_space_indent() {
        let text = to_json_string(&json!({"a": {"b": 1}})).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let text = to_json_string(&json!({"name": "Société Générale – Ø"})).unwrap();
        assert!(text.contains("Société Générale – Ø"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
