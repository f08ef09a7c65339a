//! JSON flat-file history backend.
//!
//! Each collection is one pretty-printed JSON array. Writes go to a
//! sibling temp file that is then renamed over the target, so a failed
//! write leaves the previous file in place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Collection, HistoryBackend, KeywordRecord, SelectionRecord, StorageFault};

pub const KEYWORD_FILE: &str = "search_history_keyword.json";
pub const SELECTION_FILE: &str = "search_history_selection.json";

/// History stored as two JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// No I/O happens until the first operation.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        match collection {
            Collection::Keywords => self.dir.join(KEYWORD_FILE),
            Collection::Selections => self.dir.join(SELECTION_FILE),
        }
    }

    fn io_fault(collection: Collection, path: &Path, err: std::io::Error) -> StorageFault {
        StorageFault::Io {
            collection,
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StorageFault> {
        let path = self.path(collection);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_fault(collection, &path, e)),
        };

        serde_json::from_str(&contents).map_err(|e| StorageFault::Malformed {
            collection,
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn write<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StorageFault> {
        let path = self.path(collection);
        let json = serde_json::to_string_pretty(records).map_err(|e| StorageFault::Malformed {
            collection,
            message: e.to_string(),
        })?;

        fs::create_dir_all(&self.dir).map_err(|e| Self::io_fault(collection, &self.dir, e))?;

        let tmp = self.dir.join(format!(
            ".{}.tmp",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("history")
        ));
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(Self::io_fault(collection, &tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(Self::io_fault(collection, &path, e));
        }
        Ok(())
    }
}

impl HistoryBackend for JsonFileBackend {
    fn describe(&self) -> String {
        format!("json files in {}", self.dir.display())
    }

    fn ensure(&self, collection: Collection) -> Result<bool, StorageFault> {
        let path = self.path(collection);
        let exists = path
            .try_exists()
            .map_err(|e| Self::io_fault(collection, &path, e))?;
        if exists {
            return Ok(false);
        }
        self.write::<KeywordRecord>(collection, &[])?;
        Ok(true)
    }

    fn read_keywords(&self) -> Result<Vec<KeywordRecord>, StorageFault> {
        self.read(Collection::Keywords)
    }

    fn read_selections(&self) -> Result<Vec<SelectionRecord>, StorageFault> {
        self.read(Collection::Selections)
    }

    fn write_keywords(&self, records: &[KeywordRecord]) -> Result<(), StorageFault> {
        self.write(Collection::Keywords, records)
    }

    fn write_selections(&self, records: &[SelectionRecord]) -> Result<(), StorageFault> {
        self.write(Collection::Selections, records)
    }
}
