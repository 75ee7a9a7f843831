//! Row lookup and value coercion.
//!
//! Turns one directive into a JSON value for one row.

use serde_json::{Number, Value};

use super::directive::{Directive, DirectiveKind};
use crate::error::{MapperError, MapperResult};
use crate::models::Row;

/// Lower-cased values that coerce to `true` for `boolean` directives.
pub const TRUE_VALUES: [&str; 4] = ["1", "t", "true", "yes"];

/// Separator for `list` directives.
pub const LIST_SEPARATOR: char = ',';

/// Read a column from the row.
///
/// A missing column means the mapping does not fit the CSV, which is
/// reported as [`MapperError::MissingColumn`] rather than an empty value.
pub fn lookup<'r>(row: &'r Row, column: &str) -> MapperResult<&'r str> {
    row.get(column)
        .ok_or_else(|| MapperError::MissingColumn(column.to_string()))
}

/// Resolve a directive against a row.
pub fn resolve(directive: &Directive, row: &Row) -> MapperResult<Value> {
    coerce(directive.kind()?, directive, row)
}

/// Produce the value of an already-resolved kind.
pub fn coerce(kind: DirectiveKind, directive: &Directive, row: &Row) -> MapperResult<Value> {
    let argument = directive.argument.as_str();

    match kind {
        DirectiveKind::String => Ok(Value::String(lookup(row, argument)?.to_string())),
        DirectiveKind::Constant => Ok(Value::String(argument.to_string())),
        DirectiveKind::Integer => {
            let raw = lookup(row, argument)?;
            to_integer(raw).ok_or_else(|| conversion_error(raw, directive, "an integer"))
        }
        DirectiveKind::Number => {
            let raw = lookup(row, argument)?;
            to_number(raw).ok_or_else(|| conversion_error(raw, directive, "a float"))
        }
        DirectiveKind::Boolean => Ok(Value::Bool(to_boolean(lookup(row, argument)?))),
        DirectiveKind::List => Ok(to_list(lookup(row, argument)?)),
    }
}

fn conversion_error(raw: &str, directive: &Directive, expected: &'static str) -> MapperError {
    MapperError::ValueConversion {
        value: raw.to_string(),
        directive: directive.raw.clone(),
        expected,
    }
}

/// Values above `i64::MAX` are kept exactly as `u64`.
fn to_integer(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(Value::from)
        .or_else(|_| raw.parse::<u64>().map(Value::from))
        .ok()
}

/// JSON has no NaN or infinity, so those do not convert.
fn to_number(raw: &str) -> Option<Value> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn to_boolean(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    TRUE_VALUES.contains(&lowered.as_str())
}

fn to_list(raw: &str) -> Value {
    Value::Array(
        raw.split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    )
}
