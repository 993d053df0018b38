//! Local file storage for uploaded document versions.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors while storing an uploaded file.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A file is already stored under this name. Stored files are never
    /// replaced.
    #[error("file already stored at {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// The file could not be written.
    #[error("file storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded files under a root directory, creating it on demand.
///
/// Each name is written once. A failed write can leave a partial file behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a new file `<root>/<file_name>` and return its path.
    ///
    /// `file_name` must be a single path component. Fails with
    /// [`StorageError::AlreadyExists`] when the file is already there.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists { path });
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(bytes).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(path)
    }
}
