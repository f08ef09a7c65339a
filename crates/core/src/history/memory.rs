//! In-process history backend.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Collection, HistoryBackend, KeywordRecord, SelectionRecord, StorageFault};

#[derive(Debug, Default)]
struct MemoryState {
    keywords: Option<Vec<KeywordRecord>>,
    selections: Option<Vec<SelectionRecord>>,
    failing: HashSet<Collection>,
    writes: HashMap<Collection, usize>,
}

/// Volatile backend for tests and throwaway sessions.
///
/// A collection is absent until first written or ensured. [`fail`] makes
/// every operation on one collection return an I/O fault until [`heal`].
///
/// [`fail`]: MemoryBackend::fail
/// [`heal`]: MemoryBackend::heal
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fail(&self, collection: Collection) {
        self.state().failing.insert(collection);
    }

    pub fn heal(&self, collection: Collection) {
        self.state().failing.remove(&collection);
    }

    pub fn exists(&self, collection: Collection) -> bool {
        let state = self.state();
        match collection {
            Collection::Keywords => state.keywords.is_some(),
            Collection::Selections => state.selections.is_some(),
        }
    }

    /// Number of full-collection writes, excluding bootstrap.
    pub fn write_count(&self, collection: Collection) -> usize {
        self.state().writes.get(&collection).copied().unwrap_or(0)
    }

    fn check(state: &MemoryState, collection: Collection) -> Result<(), StorageFault> {
        if state.failing.contains(&collection) {
            return Err(StorageFault::Io {
                collection,
                path: PathBuf::from(":memory:"),
                message: "injected fault".to_string(),
            });
        }
        Ok(())
    }
}

impl HistoryBackend for MemoryBackend {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }

    fn ensure(&self, collection: Collection) -> Result<bool, StorageFault> {
        let mut state = self.state();
        Self::check(&state, collection)?;
        let created = match collection {
            Collection::Keywords if state.keywords.is_none() => {
                state.keywords = Some(Vec::new());
                true
            }
            Collection::Selections if state.selections.is_none() => {
                state.selections = Some(Vec::new());
                true
            }
            _ => false,
        };
        Ok(created)
    }

    fn read_keywords(&self) -> Result<Vec<KeywordRecord>, StorageFault> {
        let state = self.state();
        Self::check(&state, Collection::Keywords)?;
        Ok(state.keywords.clone().unwrap_or_default())
    }

    fn read_selections(&self) -> Result<Vec<SelectionRecord>, StorageFault> {
        let state = self.state();
        Self::check(&state, Collection::Selections)?;
        Ok(state.selections.clone().unwrap_or_default())
    }

    fn write_keywords(&self, records: &[KeywordRecord]) -> Result<(), StorageFault> {
        let mut state = self.state();
        Self::check(&state, Collection::Keywords)?;
        state.keywords = Some(records.to_vec());
        *state.writes.entry(Collection::Keywords).or_default() += 1;
        Ok(())
    }

    fn write_selections(&self, records: &[SelectionRecord]) -> Result<(), StorageFault> {
        let mut state = self.state();
        Self::check(&state, Collection::Selections)?;
        state.selections = Some(records.to_vec());
        *state.writes.entry(Collection::Selections).or_default() += 1;
        Ok(())
    }
}
