use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

/// Structured text formats accepted for configuration and catalog files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let ext = get_file_extension(file_name).ok_or(FileExtensionError::MissingFileExtension)?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            ))
        }
    }

    pub fn from_path(path: &Path) -> FileFormatResult<Self> {
        Self::from_file_name(&path.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(
            FileFormat::from_file_name("wcs.YAML").unwrap(),
            FileFormat::Yaml
        );
        assert_eq!(FileFormat::from_file_name("a.yml").unwrap(), FileFormat::Yaml);
        assert_eq!(
            FileFormat::from_file_name("stars.Json").unwrap(),
            FileFormat::Json
        );
    }

    #[test]
    fn test_missing_and_unknown_extensions_fail() {
        assert!(matches!(
            FileFormat::from_file_name("catalog"),
            Err(FileExtensionError::MissingFileExtension)
        ));
        assert!(matches!(
            FileFormat::from_file_name("catalog.fits"),
            Err(FileExtensionError::UnsupportedFileExtension(_))
        ));
    }
}
