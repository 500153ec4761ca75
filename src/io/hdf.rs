use crate::table::Table;
use crate::utils::Result;
use std::path::Path;

/// Reads a table stored as a 2-D variable-length string dataset named
/// `dataset`, with column names in the 1-D dataset `<dataset>_columns`.
#[cfg(feature = "hdf5")]
pub fn read_hdf(path: &Path, dataset: &str) -> Result<Table> {
    use hdf5::types::VarLenUnicode;

    let file = hdf5::File::open(path)?;

    let columns: Vec<String> = file
        .dataset(&format!("{}_columns", dataset))?
        .read_1d::<VarLenUnicode>()?
        .iter()
        .map(|name| name.as_str().to_string())
        .collect();

    let cells = file.dataset(dataset)?.read_2d::<VarLenUnicode>()?;
    let rows: Vec<Vec<String>> = cells
        .outer_iter()
        .map(|row| row.iter().map(|cell| cell.as_str().to_string()).collect())
        .collect();

    tracing::debug!(path = %path.display(), rows = rows.len(), "Read HDF5 table");
    Ok(Table::new(columns, rows))
}

#[cfg(not(feature = "hdf5"))]
pub fn read_hdf(_path: &Path, _dataset: &str) -> Result<Table> {
    Err(crate::utils::TabularIoError::FeatureDisabled("hdf5"))
}
