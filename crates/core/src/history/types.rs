use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogSource;

/// One of the two independently persisted history collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Keywords,
    Selections,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Keywords => f.write_str("keywords"),
            Collection::Selections => f.write_str("selections"),
        }
    }
}

/// A searched keyword, stored verbatim. Uniqueness is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordRecord(String);

impl KeywordRecord {
    /// `None` for the empty string.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeywordRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selected catalog item. Uniqueness is `(id, source)`.
///
/// Stored as `{"id": "...", "source": "google"}`; `source` is omitted when
/// the selection was recorded without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRecord {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<CatalogSource>,
}

impl SelectionRecord {
    /// `None` for an empty id.
    pub fn new(id: impl Into<String>, source: Option<CatalogSource>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self { id, source })
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Option<CatalogSource> {
        self.source
    }
}

impl fmt::Display for SelectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(source) => write!(f, "{} ({})", self.id, source),
            None => f.write_str(&self.id),
        }
    }
}

/// Both collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub keywords: Vec<KeywordRecord>,
    pub selections: Vec<SelectionRecord>,
}

/// A failure of the durable layer, tagged with the collection it hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageFault {
    #[error("{collection} history I/O error at {}: {message}", .path.display())]
    Io {
        collection: Collection,
        path: PathBuf,
        message: String,
    },

    #[error("{collection} history is malformed: {message}")]
    Malformed {
        collection: Collection,
        message: String,
    },

    #[error("{collection} history database error: {message}")]
    Database {
        collection: Collection,
        message: String,
    },
}

impl StorageFault {
    pub fn collection(&self) -> Collection {
        match self {
            StorageFault::Io { collection, .. }
            | StorageFault::Malformed { collection, .. }
            | StorageFault::Database { collection, .. } => *collection,
        }
    }
}

/// Result of a `record_*` call. Never an `Err`: faults are reported as
/// [`RecordOutcome::Failed`] after being logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Appended and durable.
    Recorded,
    /// Key already present; nothing written.
    AlreadyPresent,
    /// Empty or absent input; nothing written.
    Ignored,
    /// The durable layer failed; nothing was appended.
    Failed(StorageFault),
}

impl RecordOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, RecordOutcome::Recorded)
    }

    pub fn fault(&self) -> Option<&StorageFault> {
        match self {
            RecordOutcome::Failed(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Result of `load_all`. On a fault `history` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub history: History,
    pub fault: Option<StorageFault>,
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        self.fault.is_some()
    }
}
