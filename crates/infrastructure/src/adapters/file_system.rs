//! File access relative to the user's directories.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use courier_application::ports::{BaseDir, FileSystem, FileSystemError};

/// Reads files with `tokio::fs`, resolving relative paths against the
/// platform's download, document or desktop directory.
///
/// Absolute paths are read as given.
#[derive(Debug, Clone, Default)]
pub struct DirsFileSystem {
    overrides: HashMap<BaseDir, PathBuf>,
}

impl DirsFileSystem {
    /// Creates a file system using the platform directories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `dir` to `root` instead of the platform directory.
    #[must_use]
    pub fn with_base(mut self, dir: BaseDir, root: impl Into<PathBuf>) -> Self {
        self.overrides.insert(dir, root.into());
        self
    }

    fn base(&self, dir: BaseDir) -> Result<PathBuf, FileSystemError> {
        if let Some(root) = self.overrides.get(&dir) {
            return Ok(root.clone());
        }
        let found = match dir {
            BaseDir::Download => dirs::download_dir(),
            BaseDir::Document => dirs::document_dir(),
            BaseDir::Desktop => dirs::desktop_dir(),
        };
        found.ok_or(FileSystemError::NoBaseDir(dir))
    }

    fn resolve(&self, path: &str, dir: BaseDir) -> Result<PathBuf, FileSystemError> {
        let path = Path::new(path);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(self.base(dir)?.join(path))
    }
}

fn map_io(err: std::io::Error, path: &Path) -> FileSystemError {
    if err.kind() == ErrorKind::NotFound {
        FileSystemError::NotFound(path.to_path_buf())
    } else {
        FileSystemError::Io(err)
    }
}

#[async_trait]
impl FileSystem for DirsFileSystem {
    async fn read_text(&self, path: &str, dir: BaseDir) -> Result<String, FileSystemError> {
        let full = self.resolve(path, dir)?;
        tracing::debug!(path = %full.display(), "reading text file");
        fs::read_to_string(&full).await.map_err(|e| map_io(e, &full))
    }

    async fn read_binary(&self, path: &str, dir: BaseDir) -> Result<Vec<u8>, FileSystemError> {
        let full = self.resolve(path, dir)?;
        tracing::debug!(path = %full.display(), "reading binary file");
        fs::read(&full).await.map_err(|e| map_io(e, &full))
    }
}
