//! File-backed store: one file per key under a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{CacheError, PersistenceStore};

/// A [`PersistenceStore`] that keeps each key in its own file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write never leaves a truncated blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = FileStore::open(".cart")?;
    /// ```
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// The directory holding the store's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

impl PersistenceStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(&path, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| CacheError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| CacheError::io(&path, e))?;
        debug!(key, path = %path.display(), bytes = value.len(), "persisted blob");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(&path, e)),
        }
    }
}

/// Map a namespaced key such as `@RocketShoes:cart` onto a portable file name.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}
