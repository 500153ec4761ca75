use crate::io::codec::{candidates, Codec};
use crate::io::dispatch::{load_bytes, FileKind};
use crate::io::hdf::read_hdf;
use crate::io::options::{apply_dtype, ReadOptions};
use crate::io::separator::identify_separator;
use crate::io::spreadsheet::read_spreadsheet;
use crate::table::{Table, TableSource};
use crate::utils::{extension_of, Result, TabularIoError};
use csv::StringRecord;
use std::path::Path;
use tracing::{debug, info};

/// Result of parsing the raw bytes with one candidate encoding.
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed(Table),
    /// The bytes are not valid in this encoding.
    DecodeFailure(String),
    /// Rows do not line up with the header.
    TokenizeFailure(String),
    Failed(TabularIoError),
}

/// Reads delimited text, trying the preferred encoding and then each fallback
/// until one decodes and parses. A table passed in is returned untouched.
///
/// Decoding and tokenizing failures move on to the next encoding; any other
/// failure is returned immediately. Compressed inputs (`.gz`, `.bz2`, `.zip`,
/// `.xz`) are decompressed first. The separator defaults to `,`.
pub fn read_delimited(source: impl Into<TableSource>, options: &ReadOptions) -> Result<Table> {
    let path = match source.into() {
        TableSource::Table(table) => return Ok(table),
        TableSource::Path(path) => path,
    };

    let bytes = load_bytes(&path)?;
    let sep = options.sep.unwrap_or(b',');

    for codec in candidates(options.encoding, &options.fallback_encodings) {
        match parse_attempt(&bytes, codec, sep, options) {
            ParseOutcome::Parsed(table) => {
                debug!(
                    path = %path.display(),
                    encoding = %codec,
                    rows = table.row_count(),
                    "Parsed delimited file"
                );
                return Ok(table);
            }
            ParseOutcome::DecodeFailure(msg) => {
                if options.verbose {
                    info!(path = %path.display(), encoding = %codec, "{}", msg);
                }
            }
            ParseOutcome::TokenizeFailure(msg) => {
                debug!(path = %path.display(), encoding = %codec, "{}", msg);
            }
            ParseOutcome::Failed(e) => return Err(e),
        }
    }

    Err(TabularIoError::EncodingExhausted {
        path: path.display().to_string(),
    })
}

/// Decodes `bytes` with `codec` and parses the text as delimited records.
/// Short rows are padded with empty cells; long rows are a tokenizing failure.
pub fn parse_attempt(bytes: &[u8], codec: Codec, sep: u8, options: &ReadOptions) -> ParseOutcome {
    let Some(text) = codec.decode(bytes) else {
        return ParseOutcome::DecodeFailure(format!("'{}' codec can't decode the input", codec));
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sep)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let mut columns = Vec::new();
    if options.has_headers {
        match records.next() {
            Some(Ok(header)) if header.len() == 1 && header[0].is_empty() => {}
            Some(Ok(header)) => columns = string_record_to_vec(&header),
            Some(Err(e)) => return classify(e),
            None => return ParseOutcome::Parsed(Table::default()),
        }
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut width = columns.len();
    for (line, record) in records.enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => return classify(e),
        };
        if rows.is_empty() && !options.has_headers {
            width = record.len();
        }
        if record.len() > width {
            let line_number = line + 1 + usize::from(options.has_headers);
            return ParseOutcome::TokenizeFailure(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                width,
                line_number,
                record.len()
            ));
        }
        let mut row = string_record_to_vec(&record);
        row.resize(width, String::new());
        rows.push(row);
    }

    if !options.has_headers {
        columns = (0..width).map(|i| i.to_string()).collect();
    }

    let mut table = Table::new(columns, rows);
    if let Some(dtype) = &options.dtype {
        if let Err(e) = apply_dtype(&mut table, dtype) {
            return ParseOutcome::Failed(e);
        }
    }
    ParseOutcome::Parsed(table)
}

fn classify(e: csv::Error) -> ParseOutcome {
    match e.kind() {
        csv::ErrorKind::UnequalLengths { .. } => ParseOutcome::TokenizeFailure(e.to_string()),
        csv::ErrorKind::Utf8 { .. } => ParseOutcome::DecodeFailure(e.to_string()),
        _ => ParseOutcome::Failed(TabularIoError::CsvError(e)),
    }
}

pub fn string_record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}

/// Reads a delimited text file, picking the separator when the options leave
/// it open: tab for `.tsv`, comma for `.csv`, detection from the first line
/// otherwise.
pub fn read_text(source: impl Into<TableSource>, options: &ReadOptions) -> Result<Table> {
    let path = match source.into() {
        TableSource::Table(table) => return Ok(table),
        TableSource::Path(path) => path,
    };

    let sep = match options.sep {
        Some(sep) => sep,
        None => match extension_of(&path).as_str() {
            ".tsv" => b'\t',
            ".csv" => b',',
            _ => identify_separator(&path)?,
        },
    };

    read_delimited(path, &options.clone().with_sep(sep))
}

/// Reads any supported table file, choosing the reader from the extension.
pub fn read_any(source: impl Into<TableSource>, options: &ReadOptions) -> Result<Table> {
    let path = match source.into() {
        TableSource::Table(table) => return Ok(table),
        TableSource::Path(path) => path,
    };

    match FileKind::from_path(&path)? {
        FileKind::Spreadsheet => {
            if options.dtype.is_some() {
                debug!(path = %path.display(), "Ignoring dtype for spreadsheet input");
            }
            read_spreadsheet(&path, &options.sheet)
        }
        FileKind::DelimitedText => read_text(path, options),
        FileKind::Compressed(_) => read_delimited(path, options),
        FileKind::Hierarchical => read_hdf(&path, &options.hdf_dataset),
    }
}

/// Shorthand for [`read_any`] with default options.
pub fn read_file(path: impl AsRef<Path>) -> Result<Table> {
    read_any(path.as_ref(), &ReadOptions::default())
}
