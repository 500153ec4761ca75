use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: usize,
    pub start_row: usize,
    pub end_row: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl ChunkRange {
    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row
    }
}

/// Row ranges for splitting `total_rows` rows into pieces of at most
/// `chunk_size`. A missing, zero or oversized chunk size gives one range over
/// the whole table, even when the table has no rows.
pub fn calculate_chunks(total_rows: usize, chunk_size: Option<usize>) -> Vec<ChunkRange> {
    let chunk_size = match chunk_size {
        Some(size) if size > 0 && size < total_rows => size,
        _ => {
            return vec![ChunkRange {
                index: 0,
                start_row: 0,
                end_row: total_rows,
                is_first: true,
                is_last: true,
            }]
        }
    };

    let mut chunks = Vec::new();
    let mut current_start = 0;
    let mut chunk_index = 0;

    while current_start < total_rows {
        let end_row = (current_start + chunk_size).min(total_rows);

        chunks.push(ChunkRange {
            index: chunk_index,
            start_row: current_start,
            end_row,
            is_first: chunk_index == 0,
            is_last: end_row >= total_rows,
        });

        current_start = end_row;
        chunk_index += 1;
    }

    chunks
}

/// Iterator over consecutive row slices of a table.
///
/// Each item is an owned [`Table`] with the source's columns. The iterator is
/// consumed once; call [`Table::chunks`] again to start over.
pub struct Chunks<'a> {
    table: &'a Table,
    ranges: std::vec::IntoIter<ChunkRange>,
}

impl<'a> Chunks<'a> {
    pub fn new(table: &'a Table, chunk_size: Option<usize>) -> Self {
        Self {
            table,
            ranges: calculate_chunks(table.row_count(), chunk_size).into_iter(),
        }
    }
}

impl Iterator for Chunks<'_> {
    type Item = Table;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.ranges.next()?;
        if range.is_first && range.is_last {
            return Some(self.table.clone());
        }
        Some(self.table.slice(range.start_row, range.end_row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ranges.size_hint()
    }
}

impl ExactSizeIterator for Chunks<'_> {}

pub fn chunks(table: &Table, chunk_size: Option<usize>) -> Chunks<'_> {
    Chunks::new(table, chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize) -> Table {
        Table::new(
            vec!["n".to_string()],
            (0..rows).map(|i| vec![i.to_string()]).collect(),
        )
    }

    #[test]
    fn ten_rows_by_three() {
        let table = numbered(10);
        let pieces: Vec<Table> = table.chunks(Some(3)).collect();

        let sizes: Vec<usize> = pieces.iter().map(Table::row_count).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        assert_eq!(Table::concat(pieces), table);
    }

    #[test]
    fn unset_or_zero_yields_whole_table() {
        let table = numbered(4);
        for size in [None, Some(0), Some(4), Some(99)] {
            let pieces: Vec<Table> = chunks(&table, size).collect();
            assert_eq!(pieces, vec![table.clone()], "chunk size {size:?}");
        }
    }

    #[test]
    fn empty_table_still_yields_one_chunk() {
        let table = numbered(0);
        assert_eq!(table.chunks(Some(5)).count(), 1);
    }

    #[test]
    fn ranges_cover_every_row_once() {
        let ranges = calculate_chunks(7, Some(2));
        assert_eq!(ranges.len(), 4);
        assert!(ranges[0].is_first);
        assert!(ranges[3].is_last);
        assert_eq!(ranges.iter().map(ChunkRange::row_count).sum::<usize>(), 7);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end_row, pair[1].start_row);
        }
    }

    #[test]
    fn iterator_is_recreatable() {
        let table = numbered(5);
        let first: Vec<Table> = table.chunks(Some(2)).collect();
        let second: Vec<Table> = table.chunks(Some(2)).collect();
        assert_eq!(first, second);
        assert_eq!(table.chunks(Some(2)).len(), 3);
    }
}
