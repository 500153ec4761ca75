use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabularIoError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to read '{extension}' files. Supported extensions: {allowed:?}")]
    UnsupportedExtension {
        extension: String,
        allowed: Vec<&'static str>,
    },

    #[error("Not sure how to export '{extension}' files.")]
    ExportUnsupported { extension: String },

    #[error("Unable to identify value separator.\nHeader: {header}\nSeps Searched: {searched:?}")]
    SeparatorNotIdentified { header: String, searched: Vec<char> },

    #[error("Failed to open {path}: no candidate encoding could parse it")]
    EncodingExhausted { path: String },

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Could not convert '{value}' in column '{column}' to {dtype}")]
    ConversionError {
        column: String,
        value: String,
        dtype: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Support for {0} files was not compiled in")]
    FeatureDisabled(&'static str),

    #[error("HDF5 error: {0}")]
    HdfError(String),
}

pub type Result<T> = std::result::Result<T, TabularIoError>;

impl From<calamine::Error> for TabularIoError {
    fn from(e: calamine::Error) -> Self {
        TabularIoError::SpreadsheetError(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for TabularIoError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        TabularIoError::SpreadsheetError(e.to_string())
    }
}

impl From<zip::result::ZipError> for TabularIoError {
    fn from(e: zip::result::ZipError) -> Self {
        TabularIoError::CompressionError(e.to_string())
    }
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for TabularIoError {
    fn from(e: hdf5::Error) -> Self {
        TabularIoError::HdfError(e.to_string())
    }
}
