pub mod io;
pub mod table;
pub mod utils;

pub use io::{
    export, export_chunks, identify_separator, increment, read_any, read_delimited, read_file,
    read_text, Codec, ColumnType, ReadOptions, SheetSelector, WriteOptions,
};
pub use table::{chunks, Chunks, Table, TableSource};
pub use utils::{AppConfig, Result, TabularIoError};
