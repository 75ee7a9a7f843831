//! CSV reading with encoding auto-detection.
//!
//! Turns CSV bytes into [`Row`]s keyed by the header line. Nothing here knows
//! about mappings.

use csv::ReaderBuilder;
use encoding_rs::Encoding;

use crate::error::{CsvError, CsvResult};
use crate::models::Row;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Rows read from one CSV source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    /// Header names, in column order.
    pub headers: Vec<String>,
    /// Data rows, in file order.
    pub rows: Vec<Row>,
    /// Encoding the bytes were decoded with.
    pub encoding: String,
}

impl ParsedCsv {
    /// Referenced columns that are not headers of this CSV.
    pub fn missing_columns<'c>(&self, columns: &'c [String]) -> Vec<&'c str> {
        columns
            .iter()
            .filter(|c| !self.headers.contains(*c))
            .map(String::as_str)
            .collect()
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as UTF-8; chardet guesses on short mostly-ASCII
/// input are unreliable. Anything else goes through chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let (charset, _confidence, _language) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => chardet::charset2encoding(&charset).to_string(),
    }
}

/// Decode bytes with the named encoding.
///
/// Unknown labels fall back to UTF-8. A byte order mark is stripped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let encoding = Encoding::for_label(encoding.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    let (text, _used, _had_errors) = encoding.decode(bytes);
    text.into_owned()
}

/// Parse CSV bytes, detecting the encoding.
pub fn parse_bytes(bytes: &[u8], delimiter: char) -> CsvResult<ParsedCsv> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let (headers, rows) = parse_str(&content, delimiter)?;

    Ok(ParsedCsv {
        headers,
        rows,
        encoding,
    })
}

/// Parse decoded CSV text.
///
/// The first line is the header. Every row must have as many fields as
/// the header; when a header repeats, the rightmost column wins.
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<Row>)> {
    if !delimiter.is_ascii() {
        return Err(CsvError::InvalidDelimiter(delimiter));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter as u8)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}
