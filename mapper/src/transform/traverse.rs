//! Schema traversal.
//!
//! Walks the release template for one row and builds the matching JSON
//! value. Objects stay objects with the same keys, sequences keep their
//! length and order, literals are copied and directives are resolved.

use serde_json::{Map, Value};

use super::coerce::resolve;
use crate::error::MapperResult;
use crate::models::{MappingNode, Row};

/// Build the value of `node` for `row`.
///
/// The first failing directive aborts the traversal.
pub fn traverse(node: &MappingNode, row: &Row) -> MapperResult<Value> {
    match node {
        MappingNode::Object(entries) => {
            let mut out = Map::new();
            for (key, child) in entries {
                out.insert(key.clone(), traverse(child, row)?);
            }
            Ok(Value::Object(out))
        }
        MappingNode::Sequence(items) => items
            .iter()
            .map(|item| traverse(item, row))
            .collect::<MapperResult<Vec<_>>>()
            .map(Value::Array),
        MappingNode::Literal(value) => Ok(value.clone()),
        MappingNode::Directive(directive) => resolve(directive, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapperError;
    use serde_json::json;

    fn node(value: Value) -> MappingNode {
        MappingNode::from_value(&value)
    }

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_integer_and_string_fields() {
        let schema = node(json!({"id": "integer:bidder_id", "name": "bidder_name"}));
        let r = row(&[("bidder_id", "7"), ("bidder_name", "Ann")]);
        assert_eq!(traverse(&schema, &r).unwrap(), json!({"id": 7, "name": "Ann"}));
    }

    #[test]
    fn test_boolean_field() {
        let schema = node(json!({"active": "boolean:flag"}));
        assert_eq!(
            traverse(&schema, &row(&[("flag", "No")])).unwrap(),
            json!({"active": false})
        );
        assert_eq!(
            traverse(&schema, &row(&[("flag", "Yes")])).unwrap(),
            json!({"active": true})
        );
    }

    #[test]
    fn test_constant_field() {
        let schema = node(json!({"kind": "constant:Tender"}));
        assert_eq!(traverse(&schema, &Row::new()).unwrap(), json!({"kind": "Tender"}));
        assert_eq!(
            traverse(&schema, &row(&[("kind", "ignored")])).unwrap(),
            json!({"kind": "Tender"})
        );
    }

    #[test]
    fn test_number_field() {
        let schema = node(json!({"amount": "number:price"}));
        assert_eq!(
            traverse(&schema, &row(&[("price", "12.5")])).unwrap(),
            json!({"amount": 12.5})
        );
        assert!(matches!(
            traverse(&schema, &row(&[("price", "abc")])),
            Err(MapperError::ValueConversion { .. })
        ));
    }

    #[test]
    fn test_nested_structure_is_preserved() {
        let schema = node(json!({
            "releaseMeta": {"ocid": "ocid", "locale": "constant:en_us"},
            "awards": [
                {"id": "integer:award_id", "suppliers": ["supplier", ""]},
                {"id": "constant:fixed"}
            ],
            "value": 100,
            "note": null,
            "blank": ""
        }));
        let r = row(&[("ocid", "PW-$KIN-650-6155"), ("award_id", "3"), ("supplier", "Acme")]);

        let out = traverse(&schema, &r).unwrap();
        assert_eq!(
            out,
            json!({
                "releaseMeta": {"ocid": "PW-$KIN-650-6155", "locale": "en_us"},
                "awards": [
                    {"id": 3, "suppliers": ["Acme", ""]},
                    {"id": "fixed"}
                ],
                "value": 100,
                "note": null,
                "blank": ""
            })
        );

        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["releaseMeta", "awards", "value", "note", "blank"]);
    }

    #[test]
    fn test_sequence_length_does_not_depend_on_row() {
        let schema = node(json!({"attachments": [{"uid": "list:documents", "name": "constant:Attachment"}]}));
        let r = row(&[("documents", "foo.pdf, bar.pdf")]);
        let out = traverse(&schema, &r).unwrap();
        assert_eq!(out["attachments"].as_array().unwrap().len(), 1);
        assert_eq!(out["attachments"][0]["uid"], json!(["foo.pdf", "bar.pdf"]));
    }

    #[test]
    fn test_missing_column_anywhere_aborts() {
        let schema = node(json!({"a": "present", "b": [{"c": "absent"}]}));
        assert_eq!(
            traverse(&schema, &row(&[("present", "x")])),
            Err(MapperError::MissingColumn("absent".into()))
        );
    }

    #[test]
    fn test_traversal_does_not_mutate_schema() {
        let schema = node(json!({"id": "integer:id"}));
        let before = schema.clone();
        traverse(&schema, &row(&[("id", "1")])).unwrap();
        traverse(&schema, &row(&[("id", "2")])).unwrap();
        assert_eq!(schema, before);
    }
}
