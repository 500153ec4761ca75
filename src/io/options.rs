use crate::io::codec::{Codec, DEFAULT_FALLBACKS};
use crate::io::increment::MAX_INCREMENT_ATTEMPTS;
use crate::table::Table;
use crate::utils::{AppConfig, Result, TabularIoError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Str,
    Int,
    Float,
    Bool,
}

impl ColumnType {
    /// Canonical text for `value` read as this type. Empty cells stay empty.
    pub fn coerce(&self, column: &str, value: &str) -> Result<String> {
        let trimmed = value.trim();
        let converted = match self {
            ColumnType::Str => return Ok(value.to_string()),
            _ if trimmed.is_empty() => return Ok(String::new()),
            ColumnType::Int => trimmed.parse::<i64>().ok().map(|v| v.to_string()),
            ColumnType::Float => trimmed.parse::<f64>().ok().map(|v| v.to_string()),
            ColumnType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Some("true".to_string()),
                "false" | "0" => Some("false".to_string()),
                _ => None,
            },
        };

        converted.ok_or_else(|| TabularIoError::ConversionError {
            column: column.to_string(),
            value: value.to_string(),
            dtype: self.to_string(),
        })
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Str => write!(f, "str"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Bool => write!(f, "bool"),
        }
    }
}

/// Applies per-column types to `table` in place. Columns named in `dtype` but
/// missing from the table are ignored.
pub fn apply_dtype(table: &mut Table, dtype: &HashMap<String, ColumnType>) -> Result<()> {
    let targets: Vec<(usize, String, ColumnType)> = dtype
        .iter()
        .filter_map(|(name, ty)| table.column_index(name).map(|i| (i, name.clone(), *ty)))
        .collect();

    for row in table.rows_mut() {
        for (index, name, ty) in &targets {
            if let Some(cell) = row.get_mut(*index) {
                *cell = ty.coerce(name, cell)?;
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter. `None` lets the text reader pick one.
    pub sep: Option<u8>,
    /// Tried first when decoding delimited text.
    pub encoding: Codec,
    pub fallback_encodings: Vec<Codec>,
    pub dtype: Option<HashMap<String, ColumnType>>,
    pub sheet: SheetSelector,
    pub has_headers: bool,
    /// Log each encoding that fails to decode.
    pub verbose: bool,
    pub hdf_dataset: String,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            sep: None,
            encoding: Codec::Utf8,
            fallback_encodings: DEFAULT_FALLBACKS.to_vec(),
            dtype: None,
            sheet: SheetSelector::default(),
            has_headers: true,
            verbose: false,
            hdf_dataset: "table".to_string(),
        }
    }
}

impl ReadOptions {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let encoding = config.reader.preferred_encoding.parse::<Codec>()?;
        let fallback_encodings = config
            .reader
            .fallback_encodings
            .iter()
            .map(|label| label.parse::<Codec>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            encoding,
            fallback_encodings,
            verbose: config.reader.verbose,
            hdf_dataset: config.reader.hdf_dataset.clone(),
            ..Self::default()
        })
    }

    pub fn with_sep(mut self, sep: u8) -> Self {
        self.sep = Some(sep);
        self
    }

    pub fn with_encoding(mut self, encoding: Codec) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_dtype(mut self, dtype: HashMap<String, ColumnType>) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub sep: u8,
    pub include_header: bool,
    pub sheet_name: String,
    /// Bound on name increments per chunk in `export_chunks`.
    pub max_increment_attempts: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sep: b',',
            include_header: true,
            sheet_name: "Sheet1".to_string(),
            max_increment_attempts: MAX_INCREMENT_ATTEMPTS,
        }
    }
}

impl WriteOptions {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let separator = config.export.separator;
        if !separator.is_ascii() {
            return Err(TabularIoError::ConfigError(format!(
                "export separator must be an ASCII character, got {:?}",
                separator
            )));
        }
        let sep = separator as u8;

        Ok(Self {
            sep,
            sheet_name: config.export.sheet_name.clone(),
            max_increment_attempts: config.paths.max_increment_attempts,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_canonicalizes() {
        assert_eq!(ColumnType::Int.coerce("n", "007").unwrap(), "7");
        assert_eq!(ColumnType::Float.coerce("x", " 1.50 ").unwrap(), "1.5");
        assert_eq!(ColumnType::Bool.coerce("b", "TRUE").unwrap(), "true");
        assert_eq!(ColumnType::Int.coerce("n", "").unwrap(), "");
        assert_eq!(ColumnType::Str.coerce("s", " 007 ").unwrap(), " 007 ");
    }

    #[test]
    fn coercion_failure_names_the_column() {
        match ColumnType::Int.coerce("qty", "abc") {
            Err(TabularIoError::ConversionError { column, value, dtype }) => {
                assert_eq!(column, "qty");
                assert_eq!(value, "abc");
                assert_eq!(dtype, "int");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn dtype_applies_only_to_named_columns() {
        let mut table = Table::from_records(["id", "code"], vec![vec!["01", "01"]]);
        let dtype = HashMap::from([
            ("id".to_string(), ColumnType::Int),
            ("missing".to_string(), ColumnType::Float),
        ]);
        apply_dtype(&mut table, &dtype).unwrap();
        assert_eq!(table.rows()[0], vec!["1", "01"]);
    }

    #[test]
    fn options_from_config() {
        let mut config = AppConfig::default();
        config.reader.preferred_encoding = "latin-1".to_string();
        config.export.separator = ';';

        let read = ReadOptions::from_config(&config).unwrap();
        assert_eq!(read.encoding, Codec::Latin1);
        assert_eq!(read.fallback_encodings, DEFAULT_FALLBACKS.to_vec());

        let write = WriteOptions::from_config(&config).unwrap();
        assert_eq!(write.sep, b';');

        config.export.separator = 'é';
        assert!(WriteOptions::from_config(&config).is_err());
    }
}
