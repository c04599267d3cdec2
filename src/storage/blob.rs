use std::fs::{create_dir_all, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::StoreError;

/// A key-value store which keeps one file per key under a root directory.
///
/// Writes land in a staging file first and are renamed into place, so a
/// half-written blob never replaces a good one.
#[derive(Debug)]
pub struct BlobStore {
    /// The path of the store's root directory.
    root: PathBuf,
}

impl BlobStore {
    /// Opens the store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Returns the blob stored under `key`, or `None` if there is none.
    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(path)?;
        let mut buffer = Vec::with_capacity(file.metadata()?.len() as usize);
        file.read_to_end(&mut buffer)?;
        Ok(Some(buffer))
    }

    /// Writes `data` under `key`, replacing any previous blob.
    pub fn write(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let staging_path = self.root.join(format!("{key}.stage"));
        let blob_path = self.blob_path(key);

        let mut staging_file = File::create(&staging_path)?;
        staging_file.write_all(data)?;
        rename(&staging_path, &blob_path)?;

        Ok(())
    }
}
