pub mod config;
pub mod errors;

pub use config::AppConfig;
pub use errors::{Result, TabularIoError};

/// Lowercased extension of `path` including the leading dot, or an empty
/// string when the file name has none.
pub fn extension_of(path: &std::path::Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
