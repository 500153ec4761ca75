pub mod codec;
pub mod dispatch;
pub mod hdf;
pub mod increment;
pub mod options;
pub mod reader;
pub mod separator;
pub mod spreadsheet;
pub mod writer;

pub use codec::Codec;
pub use dispatch::{load_bytes, Compression, ExportKind, FileKind};
pub use increment::{increment, increment_with_limit, MAX_INCREMENT_ATTEMPTS};
pub use options::{ColumnType, ReadOptions, SheetSelector, WriteOptions};
pub use reader::{read_any, read_delimited, read_file, read_text, ParseOutcome};
pub use separator::{identify_in_line, identify_separator, SEPARATOR_CANDIDATES};
pub use spreadsheet::{read_spreadsheet, write_spreadsheet};
pub use writer::{export, export_chunks};
