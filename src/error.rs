use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VersionSyncError>;

#[derive(Debug, Error)]
pub enum VersionSyncError {
    #[error("'{}' not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Could not find {detail} in '{}'", path.display())]
    MissingVersion { path: PathBuf, detail: String },

    #[error("Error parsing {format} in '{}': {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Invalid version '{version}' in '{}': {source}", path.display())]
    InvalidVersion {
        path: PathBuf,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Unsupported file type '{}'", path.display())]
    UnsupportedType { path: PathBuf },

    #[error("No versions found: no files were given")]
    EmptyInput,

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VersionSyncError {
    pub fn parse(path: impl AsRef<Path>, format: &'static str, message: impl ToString) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            format,
            message: message
                .to_string()
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn missing(path: impl AsRef<Path>, detail: impl Into<String>) -> Self {
        Self::MissingVersion {
            path: path.as_ref().to_path_buf(),
            detail: detail.into(),
        }
    }

    /// True for both a missing file and a missing version field.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::MissingVersion { .. })
    }
}

/// Reads a whole file, turning a missing file into [`VersionSyncError::FileNotFound`].
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            VersionSyncError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            VersionSyncError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| VersionSyncError::Io {
        path: path.to_path_buf(),
        source,
    })
}
