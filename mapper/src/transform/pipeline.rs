//! End-to-end conversion: mapping + CSV → Open Contracting document.
//!
//! # Example
//!
//! ```rust,ignore
//! use ocds_mapper::{convert, ConvertOptions, LoaderConfig, SourceLoader, UuidTokens};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ConvertOptions::new("data.csv", "mapping.json", "John Doe", "2014-07-26");
//!     let loader = SourceLoader::new(&LoaderConfig::from_env())?;
//!     let document = convert(&options, &loader, UuidTokens).await?;
//!     println!("{} releases", document["releases"].as_array().map_or(0, |r| r.len()));
//!     Ok(())
//! }
//! ```

use serde_json::Value;

use super::assembler::{ReleaseAssembler, TokenSource};
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::mapping::MappingDefinition;
use crate::output::to_json_string;
use crate::parser::{parse_bytes, ParsedCsv, DEFAULT_DELIMITER};
use crate::source::SourceLoader;

/// Inputs of one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Path or URL of the CSV data.
    pub csv_location: String,
    /// Path or URL of the mapping definition.
    pub mapping_location: String,
    /// Written to `publisher.name` and used in generated release IDs.
    pub publisher_name: String,
    /// Written to `publishingMeta.date` as given; callers format it as ISO 8601.
    pub publish_date: String,
    /// CSV field delimiter.
    pub delimiter: char,
}

impl ConvertOptions {
    pub fn new(
        csv_location: impl Into<String>,
        mapping_location: impl Into<String>,
        publisher_name: impl Into<String>,
        publish_date: impl Into<String>,
    ) -> Self {
        Self {
            csv_location: csv_location.into(),
            mapping_location: mapping_location.into(),
            publisher_name: publisher_name.into(),
            publish_date: publish_date.into(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Load both sources and convert them.
pub async fn convert<T: TokenSource>(
    options: &ConvertOptions,
    loader: &SourceLoader,
    tokens: T,
) -> PipelineResult<Value> {
    log_info(format!("📄 Loading mapping: {}", options.mapping_location));
    let mapping_bytes = loader.load(&options.mapping_location).await?;

    log_info(format!("📄 Loading CSV: {}", options.csv_location));
    let csv_bytes = loader.load(&options.csv_location).await?;

    convert_bytes(&csv_bytes, &mapping_bytes, options, tokens)
}

/// Convert in-memory sources.
///
/// Fails on the first bad row; no document is produced in that case.
pub fn convert_bytes<T: TokenSource>(
    csv_bytes: &[u8],
    mapping_bytes: &[u8],
    options: &ConvertOptions,
    tokens: T,
) -> PipelineResult<Value> {
    let mapping = MappingDefinition::from_slice(mapping_bytes)?;
    if mapping.template_count > 1 {
        log_warning(format!(
            "Mapping has {} release templates, only the first is used",
            mapping.template_count
        ));
    }

    let csv = parse_bytes(csv_bytes, options.delimiter)?;
    log_success(format!("Encoding: {}", csv.encoding));
    log_success(format!("Read {} rows, {} columns", csv.rows.len(), csv.headers.len()));

    convert_parsed(&mapping, &csv, options, tokens)
}

/// Convert an already loaded mapping and CSV.
pub fn convert_parsed<T: TokenSource>(
    mapping: &MappingDefinition,
    csv: &ParsedCsv,
    options: &ConvertOptions,
    tokens: T,
) -> PipelineResult<Value> {
    warn_missing_columns(mapping, csv);

    let mut document = mapping.output_document(&options.publisher_name, &options.publish_date)?;
    let mut assembler = ReleaseAssembler::new(
        &mapping.release_schema,
        &options.publisher_name,
        &options.publish_date,
        tokens,
    );

    log_info("⚙️  Building releases...");
    assembler.assemble_into(&csv.rows, &mut document)?;
    log_success(format!("Built {} releases", document.releases().len()));

    Ok(document.into_value())
}

/// Convert and serialize, as the command line does.
pub async fn process<T: TokenSource>(
    options: &ConvertOptions,
    loader: &SourceLoader,
    tokens: T,
) -> PipelineResult<String> {
    let document = convert(options, loader, tokens).await?;
    Ok(to_json_string(&document)?)
}

/// Columns the mapping reads but the CSV lacks fail on the first row;
/// say so before starting.
fn warn_missing_columns(mapping: &MappingDefinition, csv: &ParsedCsv) {
    let referenced = mapping.referenced_columns();
    let missing = csv.missing_columns(&referenced);
    if missing.is_empty() {
        return;
    }

    log_warning(format!("{} mapped column(s) are not CSV headers:", missing.len()));
    for column in missing {
        log_info_indent(column, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MapperError, PipelineError};
    use serde_json::json;

    const MAPPING: &str = r#"{
        "publisher": {"name": ""},
        "publishingMeta": {"date": ""},
        "releases": [{
            "releaseMeta": {"ocid": "ocid", "locale": "constant:en_us"},
            "tender": {"value": {"amount": "number:amount"}, "open": "boolean:open"}
        }]
    }"#;

    fn options() -> ConvertOptions {
        ConvertOptions::new("data.csv", "mapping.json", "John Doe", "2014-07-26")
    }

    fn fixed_token() -> impl FnMut() -> String {
        || "UUID".to_string()
    }

    #[test]
    fn test_convert_bytes() {
        let csv = "ocid,amount,open\nPW-1,10.5,yes\nPW-2,3,no\n";
        let doc = convert_bytes(csv.as_bytes(), MAPPING.as_bytes(), &options(), fixed_token()).unwrap();

        assert_eq!(
            doc,
            json!({
                "publisher": {"name": "John Doe"},
                "publishingMeta": {"date": "2014-07-26"},
                "releases": [
                    {
                        "releaseMeta": {"ocid": "PW-1", "locale": "en_us", "releaseID": "John Doe-2014-07-26-UUID"},
                        "tender": {"value": {"amount": 10.5}, "open": true}
                    },
                    {
                        "releaseMeta": {"ocid": "PW-2", "locale": "en_us", "releaseID": "John Doe-2014-07-26-UUID"},
                        "tender": {"value": {"amount": 3.0}, "open": false}
                    }
                ]
            })
        );
    }

    #[test]
    fn test_header_only_csv_gives_no_releases() {
        let doc = convert_bytes(b"ocid,amount,open\n", MAPPING.as_bytes(), &options(), fixed_token()).unwrap();
        assert_eq!(doc["releases"], json!([]));
    }

    #[test]
    fn test_missing_column_aborts_whole_run() {
        let csv = "ocid,open\nPW-1,yes\n";
        let err = convert_bytes(csv.as_bytes(), MAPPING.as_bytes(), &options(), fixed_token()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Mapper(MapperError::MissingColumn(ref c)) if c == "amount"
        ));
    }

    #[test]
    fn test_bad_number_in_later_row_aborts() {
        let csv = "ocid,amount,open\nPW-1,1,yes\nPW-2,lots,no\n";
        let err = convert_bytes(csv.as_bytes(), MAPPING.as_bytes(), &options(), fixed_token()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"lots\" is not a float. Maybe mapping \"number:amount\" is invalid."
        );
    }

    #[test]
    fn test_delimiter_option() {
        let csv = "ocid;amount;open\nPW-1;2;t\n";
        let doc = convert_bytes(
            csv.as_bytes(),
            MAPPING.as_bytes(),
            &options().with_delimiter(';'),
            fixed_token(),
        )
        .unwrap();
        assert_eq!(doc["releases"][0]["tender"]["open"], true);
    }

    #[test]
    fn test_convert_latin1_csv() {
        let mapping = r#"{"releases": [{"releaseMeta": {"ocid": "ocid"}, "buyer": {"name": "buyer"}}]}"#;
        let (csv, _, _) = encoding_rs::WINDOWS_1252.encode("ocid,buyer\nPW-1,Ville de Québec\n");

        let doc = convert_bytes(&csv, mapping.as_bytes(), &options(), fixed_token()).unwrap();
        assert_eq!(doc["releases"][0]["buyer"]["name"], "Ville de Québec");
        assert_eq!(doc["releases"][0]["releaseMeta"]["ocid"], "PW-1");
    }
}
