//! Release assembly.
//!
//! Runs the traversal once per row, in row order, and gives every release a
//! `releaseMeta.releaseID`. Identifiers the mapping already produced are kept;
//! missing ones are built as `{publisher}-{date}-{token}` with a token from
//! the injected [`TokenSource`].

use serde_json::{Map, Value};
use uuid::Uuid;

use super::traverse::traverse;
use crate::error::{MappingError, PipelineResult};
use crate::models::{MappingNode, OutputDocument, Row, RELEASE_ID_KEY, RELEASE_META_KEY};

/// Supplies the unique part of generated release identifiers.
pub trait TokenSource {
    fn next_token(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> TokenSource for F
where
    F: FnMut() -> String,
{
    fn next_token(&mut self) -> String {
        self()
    }
}

/// Builds releases for a fixed publisher and date.
pub struct ReleaseAssembler<'a, T: TokenSource> {
    schema: &'a MappingNode,
    publisher_name: &'a str,
    publish_date: &'a str,
    tokens: T,
}

impl<'a, T: TokenSource> ReleaseAssembler<'a, T> {
    pub fn new(schema: &'a MappingNode, publisher_name: &'a str, publish_date: &'a str, tokens: T) -> Self {
        Self {
            schema,
            publisher_name,
            publish_date,
            tokens,
        }
    }

    /// Build the release for one row.
    pub fn assemble(&mut self, row: &Row) -> PipelineResult<Value> {
        let mut release = traverse(self.schema, row)?;
        self.ensure_release_id(&mut release)?;
        Ok(release)
    }

    /// Build every release, stopping at the first failing row.
    ///
    /// On failure nothing is returned, so no partial document can be emitted.
    pub fn assemble_all(&mut self, rows: &[Row]) -> PipelineResult<Vec<Value>> {
        rows.iter().map(|row| self.assemble(row)).collect()
    }

    /// Append the release of every row to `document`.
    ///
    /// `document` is left untouched when any row fails.
    pub fn assemble_into(&mut self, rows: &[Row], document: &mut OutputDocument) -> PipelineResult<()> {
        let releases = self.assemble_all(rows)?;
        document.extend_releases(releases);
        Ok(())
    }

    fn ensure_release_id(&mut self, release: &mut Value) -> Result<(), MappingError> {
        let Value::Object(fields) = release else {
            // A non-object release template has nowhere to carry metadata.
            return Err(MappingError::InvalidSection("releases[0]".to_string()));
        };

        let meta = fields
            .entry(RELEASE_META_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(meta) = meta else {
            return Err(MappingError::InvalidSection(RELEASE_META_KEY.to_string()));
        };

        if !meta.contains_key(RELEASE_ID_KEY) {
            let id = format!(
                "{}-{}-{}",
                self.publisher_name,
                self.publish_date,
                self.tokens.next_token()
            );
            meta.insert(RELEASE_ID_KEY.to_string(), Value::String(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MapperError, PipelineError};
    use serde_json::json;

    fn schema(value: Value) -> MappingNode {
        MappingNode::from_value(&value)
    }

    fn rows(ocids: &[&str]) -> Vec<Row> {
        ocids.iter().map(|ocid| [("ocid", *ocid)].into_iter().collect::<Row>()).collect()
    }

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("T{}", n)
        }
    }

    #[test]
    fn test_generates_release_ids_in_row_order() {
        let s = schema(json!({"releaseMeta": {"ocid": "ocid", "locale": "constant:en_us"}}));
        let mut assembler = ReleaseAssembler::new(&s, "John Doe", "2014-07-26", counter());

        let releases = assembler.assemble_all(&rows(&["A", "B", "C"])).unwrap();
        assert_eq!(releases.len(), 3);
        assert_eq!(
            releases[0],
            json!({"releaseMeta": {"ocid": "A", "locale": "en_us", "releaseID": "John Doe-2014-07-26-T1"}})
        );
        assert_eq!(releases[1]["releaseMeta"]["releaseID"], "John Doe-2014-07-26-T2");
        assert_eq!(releases[2]["releaseMeta"]["ocid"], "C");
        assert_eq!(releases[2]["releaseMeta"]["releaseID"], "John Doe-2014-07-26-T3");
    }

    #[test]
    fn test_keeps_release_id_from_mapping() {
        let s = schema(json!({"releaseMeta": {"releaseID": "ocid"}}));
        let mut calls = 0;
        let mut assembler = ReleaseAssembler::new(&s, "p", "d", || {
            calls += 1;
            "unused".to_string()
        });
        let releases = assembler.assemble_all(&rows(&["R-1"])).unwrap();
        drop(assembler);

        assert_eq!(releases[0]["releaseMeta"]["releaseID"], "R-1");
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_creates_release_meta_when_absent() {
        let s = schema(json!({"tender": {"id": "ocid"}}));
        let mut assembler = ReleaseAssembler::new(&s, "p", "d", || "x".to_string());
        let release = assembler.assemble(&rows(&["A"])[0]).unwrap();
        assert_eq!(release["releaseMeta"]["releaseID"], "p-d-x");
    }

    #[test]
    fn test_rejects_non_object_release_meta() {
        let s = schema(json!({"releaseMeta": "ocid"}));
        let mut assembler = ReleaseAssembler::new(&s, "p", "d", UuidTokens);
        let err = assembler.assemble(&rows(&["A"])[0]).unwrap_err();
        assert!(matches!(err, PipelineError::Mapping(MappingError::InvalidSection(_))));
    }

    #[test]
    fn test_uuid_tokens_are_distinct() {
        let s = schema(json!({"releaseMeta": {}}));
        let mut assembler = ReleaseAssembler::new(&s, "p", "d", UuidTokens);
        let releases = assembler.assemble_all(&[Row::new(), Row::new()]).unwrap();
        let a = releases[0]["releaseMeta"]["releaseID"].as_str().unwrap();
        let b = releases[1]["releaseMeta"]["releaseID"].as_str().unwrap();
        assert!(a.starts_with("p-d-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_first_error_aborts_and_leaves_document_untouched() {
        let s = schema(json!({"releaseMeta": {"ocid": "ocid"}, "amount": "integer:amount"}));
        let good: Row = [("ocid", "A"), ("amount", "1")].into_iter().collect();
        let bad: Row = [("ocid", "B")].into_iter().collect();
        let worse: Row = [("ocid", "C"), ("amount", "x")].into_iter().collect();

        let mut document = OutputDocument::new(Map::new(), "p", "d").unwrap();
        let mut assembler = ReleaseAssembler::new(&s, "p", "d", UuidTokens);
        let err = assembler
            .assemble_into(&[good, bad, worse], &mut document)
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Mapper(MapperError::MissingColumn(ref c)) if c == "amount"
        ));
        assert!(document.releases().is_empty());
    }
}
