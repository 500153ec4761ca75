pub mod chunker;

pub use chunker::{chunks, ChunkRange, Chunks};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// In-memory table: named columns and rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from string-like records. Handy in tests and for callers
    /// that assemble data by hand.
    pub fn from_records<C, R, S>(columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Rows `start..end` as a new table with the same columns. Bounds are
    /// clamped to the row count.
    pub fn slice(&self, start: usize, end: usize) -> Table {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// Stacks tables vertically. Columns are taken from the first table.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let mut iter = tables.into_iter();
        let Some(mut out) = iter.next() else {
            return Table::default();
        };
        for table in iter {
            out.rows.extend(table.rows);
        }
        out
    }

    pub fn chunks(&self, chunk_size: Option<usize>) -> Chunks<'_> {
        Chunks::new(self, chunk_size)
    }

    /// First `n` rows as JSON objects keyed by column name.
    pub fn sample_json(&self, n: usize) -> Vec<JsonValue> {
        self.rows
            .iter()
            .take(n)
            .map(|record| {
                let mut map = serde_json::Map::new();
                for (i, field) in record.iter().enumerate() {
                    if let Some(col_name) = self.columns.get(i) {
                        map.insert(col_name.clone(), JsonValue::String(field.clone()));
                    }
                }
                JsonValue::Object(map)
            })
            .collect()
    }
}

/// Input to the read functions: either a file to load or a table that is
/// already in memory, which is handed back untouched.
#[derive(Debug, Clone)]
pub enum TableSource {
    Table(Table),
    Path(PathBuf),
}

impl From<Table> for TableSource {
    fn from(table: Table) -> Self {
        TableSource::Table(table)
    }
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        TableSource::Path(path)
    }
}

impl From<&Path> for TableSource {
    fn from(path: &Path) -> Self {
        TableSource::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for TableSource {
    fn from(path: &PathBuf) -> Self {
        TableSource::Path(path.clone())
    }
}

impl From<&str> for TableSource {
    fn from(path: &str) -> Self {
        TableSource::Path(PathBuf::from(path))
    }
}

impl From<String> for TableSource {
    fn from(path: String) -> Self {
        TableSource::Path(PathBuf::from(path))
    }
}
