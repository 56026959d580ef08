use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub mod buffer2;
pub mod file_format;
pub mod log_setup;

pub use buffer2::Buffer2;
pub use file_format::{FileExtensionError, FileFormat, FileFormatResult};
pub use log_setup::{setup_logging, LogOptions};

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Format(#[from] FileExtensionError),
    #[error("Failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> SerdeFormatResult<String> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::to_string(value)?),
        FileFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

pub fn deserialize<T: DeserializeOwned>(
    serialized: &str,
    format: FileFormat,
) -> SerdeFormatResult<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        FileFormat::Json => Ok(serde_json::from_str(serialized)?),
    }
}

/// Reads `path` and deserializes it using the format implied by its extension.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> SerdeFormatResult<T> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SerdeFormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    deserialize(&text, format)
}
