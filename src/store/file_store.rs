//! A [`RecordStore`] that keeps one JSON file per key inside a directory.

use crate::store::error::StoreError;
use crate::store::record_store::RecordStore;
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const STORE_DIR_NAME: &str = "forecast_insights";

/// Resolves the default store directory inside the system cache directory
/// (e.g. `~/.cache/forecast_insights` on Linux).
pub fn default_store_dir() -> Result<PathBuf, StoreError> {
    dirs::cache_dir()
        .ok_or(StoreError::DirResolution)
        .map(|p| p.join(STORE_DIR_NAME))
}

async fn ensure_store_dir_exists(path: &Path) -> Result<(), StoreError> {
    match fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(StoreError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating store directory: {}", path.display());
            fs::create_dir_all(path)
                .await
                .map_err(|e| StoreError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(StoreError::DirCreation(path.to_path_buf(), e)),
    }
}

/// Directory-backed document store.
///
/// The key is used verbatim as the file stem, so `data[3]` lives in
/// `data[3].json`. A missing file reads as a missing key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotADirectory`] if `dir` exists as a file and
    /// [`StoreError::DirCreation`] if it cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        ensure_store_dir_exists(&dir).await?;
        Ok(Self { dir })
    }

    /// Opens a store in [`default_store_dir`].
    pub async fn open_default() -> Result<Self, StoreError> {
        Self::open(default_store_dir()?).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl RecordStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No document for key {} at {:?}", key, path);
                Ok(None)
            }
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    async fn set(&self, key: &str, document: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::write(&path, document)
            .await
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                path,
                source,
            })
    }
}
