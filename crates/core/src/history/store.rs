use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::{
    Collection, History, HistoryBackend, KeywordRecord, LoadOutcome, RecordOutcome,
    SelectionRecord, StorageFault,
};
use crate::catalog::CatalogSource;

/// Deduplicating, append-only history over a [`HistoryBackend`].
///
/// Each collection has its own lock so a read-modify-write of one never
/// interleaves with another of the same collection, while the two
/// collections stay independent of each other.
pub struct HistoryStore {
    backend: Arc<dyn HistoryBackend>,
    keywords: Mutex<()>,
    selections: Mutex<()>,
}

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    // The guarded value is `()`, so a poisoned lock carries no broken state.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn HistoryBackend>) -> Self {
        Self {
            backend,
            keywords: Mutex::new(()),
            selections: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &dyn HistoryBackend {
        self.backend.as_ref()
    }

    /// Load both collections.
    ///
    /// Missing collections are created empty first. If either collection
    /// cannot be read, both come back empty and the fault is reported.
    pub fn load_all(&self) -> LoadOutcome {
        let keywords = {
            let _guard = lock(&self.keywords);
            self.bootstrap(Collection::Keywords)
                .and_then(|_| self.backend.read_keywords())
        };
        let selections = {
            let _guard = lock(&self.selections);
            self.bootstrap(Collection::Selections)
                .and_then(|_| self.backend.read_selections())
        };

        match (keywords, selections) {
            (Ok(keywords), Ok(selections)) => LoadOutcome {
                history: History {
                    keywords,
                    selections,
                },
                fault: None,
            },
            (Err(fault), _) | (_, Err(fault)) => {
                warn!("Failed to load search history: {}", fault);
                LoadOutcome {
                    history: History::default(),
                    fault: Some(fault),
                }
            }
        }
    }

    /// Append `text` to the keyword history unless empty or already present.
    pub fn record_keyword(&self, text: Option<&str>) -> RecordOutcome {
        let Some(record) = text.and_then(KeywordRecord::new) else {
            return RecordOutcome::Ignored;
        };

        let _guard = lock(&self.keywords);
        let outcome = self.append_unique(
            Collection::Keywords,
            record,
            |b| b.read_keywords(),
            |b, records| b.write_keywords(records),
        );

        if let RecordOutcome::Failed(fault) = &outcome {
            warn!("Error saving keyword: {}", fault);
        }
        outcome
    }

    /// Append a selection unless the id is empty or `(id, source)` is
    /// already present.
    pub fn record_selection(
        &self,
        id: Option<&str>,
        source: Option<CatalogSource>,
    ) -> RecordOutcome {
        let Some(record) = id.and_then(|id| SelectionRecord::new(id, source)) else {
            return RecordOutcome::Ignored;
        };

        let _guard = lock(&self.selections);
        let outcome = self.append_unique(
            Collection::Selections,
            record,
            |b| b.read_selections(),
            |b, records| b.write_selections(records),
        );

        if let RecordOutcome::Failed(fault) = &outcome {
            warn!("Error saving selection: {}", fault);
        }
        outcome
    }

    fn bootstrap(&self, collection: Collection) -> Result<(), StorageFault> {
        if self.backend.ensure(collection)? {
            debug!("Initialized empty {} history", collection);
        }
        Ok(())
    }

    /// Read, append if absent, rewrite. Caller holds the collection lock.
    fn append_unique<T, R, W>(
        &self,
        collection: Collection,
        record: T,
        read: R,
        write: W,
    ) -> RecordOutcome
    where
        T: PartialEq,
        R: Fn(&dyn HistoryBackend) -> Result<Vec<T>, StorageFault>,
        W: Fn(&dyn HistoryBackend, &[T]) -> Result<(), StorageFault>,
    {
        let result = self.bootstrap(collection).and_then(|_| {
            let mut records = read(self.backend.as_ref())?;
            if records.contains(&record) {
                return Ok(RecordOutcome::AlreadyPresent);
            }
            records.push(record);
            write(self.backend.as_ref(), &records)?;
            Ok(RecordOutcome::Recorded)
        });

        result.unwrap_or_else(RecordOutcome::Failed)
    }
}
