//! File system port
//!
//! Template functions read files relative to a user directory.

use std::path::PathBuf;

use async_trait::async_trait;

/// Base directory a relative path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaseDir {
    /// The user's download directory.
    #[default]
    Download,
    /// The user's document directory.
    Document,
    /// The user's desktop directory.
    Desktop,
}

impl BaseDir {
    /// Maps a directory name to a base directory.
    ///
    /// `document` and `desktop` (any case) select those directories;
    /// anything else selects the download directory.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "document" => Self::Document,
            "desktop" => Self::Desktop,
            _ => Self::Download,
        }
    }
}

/// Errors raised by file access.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// The base directory is unknown on this platform.
    #[error("base directory unavailable: {0:?}")]
    NoBaseDir(BaseDir),

    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for reading user files.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads a UTF-8 text file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8.
    async fn read_text(&self, path: &str, dir: BaseDir) -> Result<String, FileSystemError>;

    /// Reads a file as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    async fn read_binary(&self, path: &str, dir: BaseDir) -> Result<Vec<u8>, FileSystemError>;
}

/// Port for asking the user to pick a file.
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Returns the chosen path, or `None` if the user cancelled.
    async fn pick_file(&self, title: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_from_name() {
        assert_eq!(BaseDir::from_name("Document"), BaseDir::Document);
        assert_eq!(BaseDir::from_name("desktop"), BaseDir::Desktop);
        assert_eq!(BaseDir::from_name("download"), BaseDir::Download);
        assert_eq!(BaseDir::from_name("anything"), BaseDir::Download);
    }
}
