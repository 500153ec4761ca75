use crate::io::options::{SheetSelector, WriteOptions};
use crate::table::Table;
use crate::utils::{Result, TabularIoError};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// Reads one worksheet of an `.xlsx`/`.xls` workbook. The first row becomes
/// the column names.
///
/// The grid is anchored at `A1`: leading empty rows and columns are kept as
/// empty cells, and for `.xlsx` the sheet's declared dimension extends the
/// grid past trailing blank rows.
pub fn read_spreadsheet(path: &Path, sheet: &SheetSelector) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let name = match sheet {
        SheetSelector::Index(index) => workbook
            .sheet_names()
            .get(*index)
            .cloned()
            .ok_or_else(|| TabularIoError::SheetNotFound(format!("index {}", index)))?,
        SheetSelector::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(TabularIoError::SheetNotFound(name.clone()));
            }
            name.clone()
        }
    };

    let range = workbook.worksheet_range(&name)?;
    let declared_end = declared_end(&mut workbook, &name)?;

    let table = range_to_table(&range, declared_end);
    debug!(
        path = %path.display(),
        sheet = %name,
        rows = table.row_count(),
        columns = table.column_count(),
        "Read spreadsheet"
    );
    Ok(table)
}

/// Bottom-right cell of the `<dimension>` an `.xlsx` sheet declares.
fn declared_end<RS: Read + Seek>(workbook: &mut Sheets<RS>, name: &str) -> Result<Option<(u32, u32)>> {
    match workbook {
        Sheets::Xlsx(xlsx) => {
            let cells = xlsx
                .worksheet_cells_reader(name)
                .map_err(calamine::Error::from)?;
            Ok(Some(cells.dimensions().end))
        }
        _ => Ok(None),
    }
}

fn range_to_table(range: &Range<Data>, declared_end: Option<(u32, u32)>) -> Table {
    // calamine drops empty cells, so an empty range is an empty sheet
    let Some(start) = range.start() else {
        return Table::default();
    };
    let (mut last_row, mut last_col) = range.end().unwrap_or(start);
    if let Some((row, col)) = declared_end {
        last_row = last_row.max(row);
        last_col = last_col.max(col);
    }

    let mut grid = (0..=last_row).map(|r| {
        (0..=last_col)
            .map(|c| range.get_value((r, c)).map(cell_text).unwrap_or_default())
            .collect::<Vec<String>>()
    });

    let columns = grid.next().unwrap_or_default();
    Table::new(columns, grid.collect())
}

fn cell_text(cell: &Data) -> String {
    cell.as_string().unwrap_or_else(|| cell.to_string())
}

/// Converts a zero-based table position into a worksheet cell position.
fn cell_position(row: usize, col: usize) -> Result<(u32, u16)> {
    let r = u32::try_from(row)
        .map_err(|_| TabularIoError::SpreadsheetError(format!("row {} is out of range", row)))?;
    let c = u16::try_from(col)
        .map_err(|_| TabularIoError::SpreadsheetError(format!("column {} is out of range", col)))?;
    Ok((r, c))
}

/// Writes `table` to a single-sheet `.xlsx` workbook, every cell as text.
/// Empty cells are written as text-formatted blanks so the sheet dimension
/// covers the whole table.
pub fn write_spreadsheet(table: &Table, path: &Path, options: &WriteOptions) -> Result<()> {
    let mut workbook = Workbook::new();
    let text = Format::new().set_num_format("@");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&options.sheet_name)?;

    let header = options.include_header.then(|| table.columns());
    let row_offset = usize::from(header.is_some());
    let records = header
        .into_iter()
        .chain(table.rows().iter().map(Vec::as_slice))
        .enumerate();

    for (r, record) in records {
        for (c, value) in record.iter().enumerate() {
            let (row, col) = cell_position(r, c)?;
            if value.is_empty() {
                worksheet.write_blank(row, col, &text)?;
            } else {
                worksheet.write_string(row, col, value)?;
            }
        }
    }

    workbook.save(path)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        header_rows = row_offset,
        "Wrote spreadsheet"
    );
    Ok(())
}
