use crate::io::dispatch::ExportKind;
use crate::io::increment::increment_with_limit;
use crate::io::options::WriteOptions;
use crate::io::spreadsheet::write_spreadsheet;
use crate::table::Table;
use crate::utils::Result;
use csv::WriterBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes `table` to `path` as `.xlsx`, `.csv` or `.txt`.
pub fn export(table: &Table, path: &Path, options: &WriteOptions) -> Result<()> {
    match ExportKind::from_path(path)? {
        ExportKind::Spreadsheet => write_spreadsheet(table, path, options),
        ExportKind::DelimitedText => write_delimited(table, path, options),
    }
}

fn write_delimited(table: &Table, path: &Path, options: &WriteOptions) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(options.sep)
        .flexible(true)
        .from_writer(file);

    // a zero-field header would come back as one empty column
    if options.include_header && !table.columns().is_empty() {
        writer.write_record(table.columns())?;
    }
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = table.row_count(), "Wrote delimited file");
    Ok(())
}

/// Splits `table` into chunks of at most `max_size` rows and writes each to
/// its own file, starting at `base_path` and incrementing the name for every
/// following chunk. Returns the paths written, in chunk order.
///
/// With `overwrite` set, existing files on the incremented names are replaced.
/// A name is never used twice within one call.
pub fn export_chunks(
    table: &Table,
    base_path: &Path,
    max_size: Option<usize>,
    overwrite: bool,
    options: &WriteOptions,
) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut written: HashSet<PathBuf> = HashSet::new();
    let mut current = base_path.to_path_buf();

    let chunks = table.chunks(max_size);
    let total = chunks.len();

    for (index, chunk) in chunks.enumerate() {
        export(&chunk, &current, options)?;
        debug!(chunk = index, path = %current.display(), rows = chunk.row_count(), "Exported chunk");

        written.insert(current.clone());
        paths.push(current.clone());

        if index + 1 < total {
            current = next_unused(&current, overwrite, &written, options.max_increment_attempts);
        }
    }

    info!(
        base = %base_path.display(),
        files = paths.len(),
        rows = table.row_count(),
        "Exported table in chunks"
    );
    Ok(paths)
}

fn next_unused(
    current: &Path,
    overwrite: bool,
    written: &HashSet<PathBuf>,
    max_attempts: usize,
) -> PathBuf {
    let mut next = increment_with_limit(current, overwrite, max_attempts);
    let mut attempts = 1;
    while written.contains(&next) && attempts < max_attempts {
        next = increment_with_limit(&next, true, max_attempts);
        attempts += 1;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::options::ReadOptions;
    use crate::io::reader::read_any;
    use crate::utils::TabularIoError;
    use tempfile::TempDir;

    fn numbered(rows: usize) -> Table {
        Table::new(
            vec!["n".to_string(), "square".to_string()],
            (0..rows)
                .map(|i| vec![i.to_string(), (i * i).to_string()])
                .collect(),
        )
    }

    #[test]
    fn csv_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::from_records(
            ["name", "quote"],
            vec![vec!["a", "has, comma"], vec!["b", "has \"quotes\""]],
        );

        export(&table, &path, &WriteOptions::default()).unwrap();
        assert_eq!(read_any(&path, &ReadOptions::default()).unwrap(), table);
    }

    #[test]
    fn txt_uses_configured_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let options = WriteOptions {
            sep: b'|',
            ..WriteOptions::default()
        };
        export(&numbered(2), &path, &options).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "n|square\n0|0\n1|1\n");
        assert_eq!(read_any(&path, &ReadOptions::default()).unwrap(), numbered(2));
    }

    #[test]
    fn empty_table_reads_back_without_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        export(&Table::default(), &path, &WriteOptions::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert_eq!(read_any(&path, &ReadOptions::default()).unwrap(), Table::default());
    }

    #[test]
    fn unknown_export_extension() {
        let dir = TempDir::new().unwrap();
        let result = export(&numbered(1), &dir.path().join("out.parquet"), &WriteOptions::default());
        assert!(matches!(result, Err(TabularIoError::ExportUnsupported { .. })));
    }

    #[test]
    fn chunks_land_in_incremented_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("part.csv");
        let table = numbered(10);

        let paths = export_chunks(&table, &base, Some(3), false, &WriteOptions::default()).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["part.csv", "part2.csv", "part3.csv", "part4.csv"]);

        let back: Vec<Table> = paths
            .iter()
            .map(|p| read_any(p, &ReadOptions::default()).unwrap())
            .collect();
        assert_eq!(Table::concat(back), table);
    }

    #[test]
    fn no_overwrite_skips_existing_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("part.csv");
        std::fs::write(dir.path().join("part2.csv"), "keep me").unwrap();

        let paths = export_chunks(&numbered(4), &base, Some(2), false, &WriteOptions::default()).unwrap();
        assert_eq!(paths, vec![base.clone(), dir.path().join("part3.csv")]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("part2.csv")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn overwrite_replaces_but_never_repeats_a_name() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("part.csv");
        std::fs::write(dir.path().join("part2.csv"), "stale").unwrap();

        let paths = export_chunks(&numbered(6), &base, Some(2), true, &WriteOptions::default()).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths.iter().collect::<HashSet<_>>().len(), 3);
        assert_eq!(paths[1], dir.path().join("part2.csv"));
        assert_ne!(
            std::fs::read_to_string(dir.path().join("part2.csv")).unwrap(),
            "stale"
        );
    }

    #[test]
    fn three_digit_window_does_not_clobber_earlier_chunks() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("x1000.csv"), "").unwrap();
        std::fs::write(dir.path().join("x11.csv"), "").unwrap();
        let written = HashSet::from([dir.path().join("x1000.csv"), dir.path().join("x11.csv")]);

        // x1000 bumps to x11 through the three-digit window, which is taken
        let next = next_unused(&dir.path().join("x1000.csv"), true, &written, 2500);
        assert_eq!(next, dir.path().join("x12.csv"));
    }

    #[test]
    fn single_chunk_writes_one_file() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("all.csv");
        let paths = export_chunks(&numbered(5), &base, None, true, &WriteOptions::default()).unwrap();
        assert_eq!(paths, vec![base]);
    }
}
