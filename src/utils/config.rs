use crate::utils::errors::{Result, TabularIoError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reader: ReaderDefaults,
    pub export: ExportDefaults,
    pub paths: PathConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderDefaults {
    pub preferred_encoding: String,
    pub fallback_encodings: Vec<String>,
    pub verbose: bool,
    pub hdf_dataset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    pub max_rows_per_chunk: Option<usize>,
    pub overwrite: bool,
    pub separator: char,
    pub sheet_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub max_increment_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ReaderDefaults {
    fn default() -> Self {
        Self {
            preferred_encoding: "utf8".to_string(),
            fallback_encodings: ["utf8", "iso-8859-1", "ascii", "utf-16", "utf-32"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            verbose: false,
            hdf_dataset: "table".to_string(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            max_rows_per_chunk: None,
            overwrite: true,
            separator: ',',
            sheet_name: "Sheet1".to_string(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_increment_attempts: crate::io::increment::MAX_INCREMENT_ATTEMPTS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TabularIoError::ConfigError(e.to_string()))?;
        toml::from_str(&content).map_err(|e| TabularIoError::ConfigError(e.to_string()))
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        if let Some(p) = path {
            Self::load_from_file(p).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}
