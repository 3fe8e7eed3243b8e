//! Key-value storage backing the history log.
//!
//! The store holds opaque text values under string keys. The file-backed
//! implementation keeps one file per key and makes every write atomic: the
//! full value goes to a locked temp file in the same directory, gets synced,
//! then is renamed over the previous one. Readers take a shared lock so they
//! never observe a half-written value.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Key-value contract consumed by the history layer
pub trait HistoryStore {
    /// Read the value stored under `key`, or None if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key` with `value`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store keeping one `<key>.json` file per key
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given data directory.
    ///
    /// The directory is created lazily on the first write, so constructing
    /// a store never touches the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl HistoryStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read_result = BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        // Write the new value beside the old one, then atomically swap
        let temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.as_file().lock_exclusive()?;

        {
            let mut writer = BufWriter::new(temp_file.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        temp_file.as_file().sync_all()?;
        temp_file.as_file().unlock()?;

        temp_file
            .persist(self.key_path(key))
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote {} bytes under key {:?}", value.len(), key);
        Ok(())
    }
}

/// In-memory store used by dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
