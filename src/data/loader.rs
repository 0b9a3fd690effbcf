use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::model::{Column, Table};
use crate::error::{LabError, ParseCause, Result};

/// Tokens read as a missing cell, in addition to the empty string.
const MISSING_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file on disk. Dispatch by extension.
pub fn load_file(path: &Path) -> AnyResult<Table> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(load_bytes(&bytes, &filename)?)
}

/// Decode an upload transport payload: `data:text/csv;base64,<payload>`.
pub fn decode_upload(contents: &str, filename: &str) -> Result<Table> {
    ensure_supported(filename)?;

    let (_content_type, encoded) = contents
        .split_once(',')
        .ok_or_else(|| LabError::parse(filename, ParseCause::Payload))?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| LabError::parse(filename, e))?;

    load_bytes(&bytes, filename)
}

/// Parse raw file bytes.
///
/// Supported formats:
/// * `.csv` – header row with column names, one record per line
///
/// Bytes are read as UTF-8 first. When that fails the loader retries on the
/// raw bytes, converting each field lossily; the fallback does not validate
/// the character set, so it is best-effort.
pub fn load_bytes(bytes: &[u8], filename: &str) -> Result<Table> {
    ensure_supported(filename)?;

    let raw = match std::str::from_utf8(bytes) {
        Ok(text) => read_utf8(text),
        Err(e) => {
            log::warn!("{filename} is not valid UTF-8 ({e}); falling back to raw bytes");
            read_raw(bytes)
        }
    }
    .map_err(|e| LabError::parse(filename, e))?;

    let table = build_table(raw).map_err(|e| LabError::parse(filename, e))?;
    log::info!(
        "Parsed {filename}: {} rows, columns {:?}",
        table.n_rows(),
        table.column_names()
    );
    Ok(table)
}

fn ensure_supported(filename: &str) -> Result<()> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => Ok(()),
        _ => Err(LabError::UnsupportedFormat {
            filename: filename.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV readers
// ---------------------------------------------------------------------------

/// Header plus records, every cell still a string.
struct RawTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

fn read_utf8(text: &str) -> Result<RawTable, ParseCause> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, records })
}

fn read_raw(bytes: &[u8]) -> Result<RawTable, ParseCause> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut records = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        records.push(
            record
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect(),
        );
    }
    Ok(RawTable { headers, records })
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

fn build_table(raw: RawTable) -> Result<Table, ParseCause> {
    if raw.headers.is_empty() || (raw.headers.len() == 1 && raw.headers[0].is_empty()) {
        return Err(ParseCause::NoColumns);
    }

    let names = unique_names(&raw.headers);
    let n_rows = raw.records.len();

    let columns = (0..names.len())
        .map(|col| {
            let cells: Vec<Option<String>> = raw
                .records
                .iter()
                .map(|rec| rec.get(col).and_then(|s| parse_cell(s)))
                .collect();
            infer_column(cells, n_rows)
        })
        .collect();

    // Names are unique and the reader rejects ragged records.
    Table::new(names, columns).map_err(|_| ParseCause::NoColumns)
}

fn parse_cell(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A column is numeric when every present cell parses as a finite number.
/// Zero-row columns stay textual.
fn infer_column(cells: Vec<Option<String>>, n_rows: usize) -> Column {
    let numeric = n_rows > 0
        && cells
            .iter()
            .flatten()
            .all(|s| parse_finite(s).is_some());

    if numeric {
        Column::Numeric(
            cells
                .iter()
                .map(|c| c.as_deref().and_then(parse_finite))
                .collect(),
        )
    } else {
        Column::Text(cells)
    }
}

/// Blank headers become `Unnamed: i`; repeats get `.1`, `.2`, … suffixes.
fn unique_names(headers: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {i}"),
            h => h.to_string(),
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) || headers_claim(headers, i, &candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

/// Whether a later header literally uses `name`, so a generated suffix
/// does not steal it.
fn headers_claim(headers: &[String], current: usize, name: &str) -> bool {
    let base = headers[current].trim();
    name != base && headers[current + 1..].iter().any(|h| h.trim() == name)
}
