//! File-backed store with atomic writes.
//!
//! All keys live in a single JSON document so a batch write is one
//! `rename`. Readers take a shared lock, writers an exclusive one.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use super::{Entry, KeyValueStore};
use crate::error::{LevelUpError, Result};

/// Default store document name.
const STORE_FILE: &str = "store.json";

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Lock file suffix for concurrent access prevention.
const LOCK_SUFFIX: &str = ".lock";

type Document = BTreeMap<String, String>;

/// Key-value store persisted as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the store document.
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. Nothing is touched until first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the store document.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn tmp_file_path(&self) -> PathBuf {
        self.dir.join(format!("{STORE_FILE}{TMP_SUFFIX}"))
    }

    fn lock_file_path(&self) -> PathBuf {
        self.dir.join(format!("{STORE_FILE}{LOCK_SUFFIX}"))
    }

    fn lock_err(&self, e: std::io::Error) -> LevelUpError {
        LevelUpError::Lock {
            path: self.lock_file_path(),
            message: e.to_string(),
        }
    }

    /// Reads the document without locking. Corrupt documents read as empty.
    fn read_document(&self) -> Result<Document> {
        let path = self.document_path();
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&contents) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(
                    "Corrupted store document at {}: {}. Treating as empty.",
                    path.display(),
                    e
                );
                Ok(Document::new())
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if !self.document_path().exists() {
            return Ok(None);
        }

        let lock_path = self.lock_file_path();
        let _guard = if lock_path.exists() {
            let lock_file = File::open(&lock_path)?;
            FileExt::lock_shared(&lock_file).map_err(|e| self.lock_err(e))?;
            Some(lock_file)
        } else {
            None
        };

        let doc = self.read_document()?;
        Ok(doc.get(key).map(|v| v.clone().into_bytes()))
    }

    fn set_batch(&mut self, entries: Vec<Entry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // Decode everything up front so a bad entry can't leave a partial write.
        let mut decoded = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let text = String::from_utf8(value).map_err(|e| LevelUpError::Encode {
                key: key.clone(),
                message: format!("value is not UTF-8: {e}"),
            })?;
            decoded.push((key, text));
        }

        fs::create_dir_all(&self.dir)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_file_path())?;
        FileExt::lock_exclusive(&lock_file).map_err(|e| self.lock_err(e))?;

        let mut doc = self.read_document()?;
        let keys: Vec<String> = decoded.iter().map(|(k, _)| k.clone()).collect();
        doc.extend(decoded);

        let json = serde_json::to_string_pretty(&doc)?;
        let tmp_path = self.tmp_file_path();
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;

        fs::rename(&tmp_path, self.document_path())?;
        debug!("Stored keys {:?} in {}", keys, self.document_path().display());

        Ok(())
    }
}
