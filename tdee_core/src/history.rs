//! Bounded calculation history persisted through the key-value store.
//!
//! The log lives under a single fixed key as a JSON array, newest entry
//! first, at most ten entries. Every update rewrites the whole array.
//! Storage trouble never escapes this module: loads degrade to an empty
//! log and a failed save keeps the previous log, with a warning in the
//! diagnostics either way.

use crate::store::HistoryStore;
use crate::types::HistoryEntry;
use crate::Result;

/// Fixed storage key holding the serialized log
pub const HISTORY_KEY: &str = "tdeeHistory";

/// Maximum number of entries retained
pub const HISTORY_CAPACITY: usize = 10;

/// Load the persisted log, newest first.
///
/// A missing key, a failed read, and an unparseable payload all produce an
/// empty log; none of them is an error to the caller. Reading never writes
/// anything back, so loading twice in a row returns the same list.
pub fn load_history(store: &impl HistoryStore) -> Vec<HistoryEntry> {
    match read_log(store) {
        Ok(entries) => {
            tracing::debug!("Loaded {} history entries", entries.len());
            entries
        }
        Err(e) => {
            tracing::warn!("Unable to load history: {}. Starting with an empty log.", e);
            Vec::new()
        }
    }
}

fn read_log(store: &impl HistoryStore) -> Result<Vec<HistoryEntry>> {
    match store.get(HISTORY_KEY)? {
        Some(text) => Ok(serde_json::from_str(&text)?),
        None => Ok(Vec::new()),
    }
}

/// Prepend a new entry, trim to capacity, and persist the result wholesale.
///
/// Returns the updated log on success. A failed write keeps the previous
/// log, so the entry is dropped from storage and from the returned list;
/// the caller still has the computed TDEE to show either way.
pub fn append_history(
    store: &mut impl HistoryStore,
    entry: HistoryEntry,
    current: &[HistoryEntry],
) -> Vec<HistoryEntry> {
    let mut updated = Vec::with_capacity(HISTORY_CAPACITY);
    updated.push(entry);
    updated.extend(current.iter().take(HISTORY_CAPACITY - 1).copied());

    match write_log(store, &updated) {
        Ok(()) => {
            tracing::debug!("Persisted {} history entries", updated.len());
            updated
        }
        Err(e) => {
            tracing::warn!("Unable to save history: {}. Entry not saved.", e);
            current.to_vec()
        }
    }
}

fn write_log(store: &mut impl HistoryStore, entries: &[HistoryEntry]) -> Result<()> {
    let text = serde_json::to_string(entries)?;
    store.set(HISTORY_KEY, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ActivityLevel, Gender};
    use crate::{Error, Result};

    /// Store double whose every operation fails
    struct FailingStore;

    impl HistoryStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("read refused".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("write refused".to_string()))
        }
    }

    fn entry(date: i64) -> HistoryEntry {
        HistoryEntry {
            age: 25,
            gender: Gender::Male,
            weight: 70.0,
            height: 175.0,
            activity: ActivityLevel::Sedentary,
            tdee: 2009,
            date,
        }
    }

    #[test]
    fn test_load_from_empty_store() {
        let store = MemoryStore::new();
        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn test_append_then_load() {
        let mut store = MemoryStore::new();

        let log = append_history(&mut store, entry(1), &[]);
        assert_eq!(log, vec![entry(1)]);
        assert_eq!(load_history(&store), vec![entry(1)]);
    }

    #[test]
    fn test_newest_entry_comes_first() {
        let mut store = MemoryStore::new();

        let log = append_history(&mut store, entry(1), &[]);
        let log = append_history(&mut store, entry(2), &log);
        let log = append_history(&mut store, entry(3), &log);

        let dates: Vec<i64> = log.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![3, 2, 1]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut store = MemoryStore::new();

        let mut log = Vec::new();
        for date in 1..=11 {
            log = append_history(&mut store, entry(date), &log);
        }

        assert_eq!(log.len(), HISTORY_CAPACITY);
        let dates: Vec<i64> = log.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);

        // The persisted copy matches the in-memory one
        assert_eq!(load_history(&store), log);
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut store = MemoryStore::new();
        append_history(&mut store, entry(1), &[]);

        let first = load_history(&store);
        let second = load_history(&store);
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{ not json ]]").unwrap();

        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn test_wrong_shape_payload_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, r#"{"tdee": 2000}"#).unwrap();

        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn test_failed_read_loads_empty() {
        assert!(load_history(&FailingStore).is_empty());
    }

    #[test]
    fn test_failed_save_keeps_previous_log() {
        let mut store = FailingStore;
        let current = vec![entry(1)];

        let log = append_history(&mut store, entry(2), &current);
        assert_eq!(log, current);
    }

    #[test]
    fn test_append_over_corrupt_store_rewrites_wholesale() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "garbage").unwrap();

        let current = load_history(&store);
        assert!(current.is_empty());

        let log = append_history(&mut store, entry(5), &current);
        assert_eq!(log, vec![entry(5)]);
        assert_eq!(load_history(&store), vec![entry(5)]);
    }
}
