//! Pinned ("top-most") result store
//!
//! Maps the raw text of a query to the single result the user pinned for it.
//! The ranking pipeline asks [`TopMostStore::is_top_most`] for every candidate
//! while a query runs, possibly from several worker threads at once; pin and
//! unpin come from the UI through [`TopMostStore::add_or_update`] and
//! [`TopMostStore::remove`].
//!
//! Each operation is atomic on its own. A check followed by a later pin or
//! unpin is not, and a concurrent unpin in between is tolerated.

use crate::equality::record_equal;
use crate::record::{Record, RecordMap, TopMostData};
use launchpin_core::LaunchResult;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::instrument;

/// Score given to a pinned result so it ranks above everything else
pub const TOP_MOST_SCORE: i32 = i32::MAX;

/// Thread-safe store of pinned results
///
/// Cloning yields another handle to the same records, so one store can be
/// handed to every ranking worker. Independent stores come from [`TopMostStore::new`].
#[derive(Debug, Clone, Default)]
pub struct TopMostStore {
    records: Arc<RwLock<HashMap<String, Arc<Record>>>>,
}

impl TopMostStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    // Writers never leave the map half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Record>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Record>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `result` is the result pinned for its originating query
    ///
    /// False without a lookup when the store is empty or the result carries no
    /// origin query. The pattern comparison runs after the lock is released.
    pub fn is_top_most(&self, result: &LaunchResult) -> bool {
        let Some(raw_query) = result.raw_query() else {
            return false;
        };

        let record = {
            let records = self.read();
            if records.is_empty() {
                return false;
            }
            match records.get(raw_query) {
                Some(record) => Arc::clone(record),
                None => return false,
            }
        };

        let pinned = record_equal(
            &record,
            result,
            result.title_equal_pattern.as_ref(),
            result.subtitle_equal_pattern.as_ref(),
        );
        tracing::trace!(plugin_id = %result.plugin_id, pinned, "checked pin");
        pinned
    }

    /// Pin `result` under its originating query, replacing any earlier pin
    #[instrument(skip_all, fields(plugin_id = %result.plugin_id))]
    pub fn add_or_update(&self, result: &LaunchResult) {
        let Some(raw_query) = result.raw_query() else {
            tracing::debug!("result has no origin query; nothing to pin");
            return;
        };

        let record = Arc::new(Record::from(result));
        let previous = self.write().insert(raw_query.to_string(), record);

        match previous {
            Some(previous) => tracing::debug!(replaced_plugin = previous.plugin_id(), "replaced pinned result"),
            None => tracing::debug!("pinned result"),
        }
    }

    /// Unpin whatever is pinned under the originating query of `result`
    ///
    /// Silent when nothing is pinned there.
    #[instrument(skip_all, fields(plugin_id = %result.plugin_id))]
    pub fn remove(&self, result: &LaunchResult) {
        let Some(raw_query) = result.raw_query() else {
            tracing::debug!("result has no origin query; nothing to unpin");
            return;
        };

        if self.write().remove(raw_query).is_some() {
            tracing::debug!("unpinned result");
        }
    }

    /// Replace every record with a copy of `initial`
    ///
    /// Meant for startup, before any query traffic. Calls racing with
    /// [`is_top_most`](Self::is_top_most), [`add_or_update`](Self::add_or_update)
    /// or [`remove`](Self::remove) are the caller's problem: each of those sees
    /// either the old or the new mapping, but a pin made in between is lost.
    pub fn load(&self, initial: &RecordMap) {
        self.replace(initial.iter().map(|(query, record)| (query.clone(), record.clone())));
    }

    /// [`load`](Self::load) from the persisted shape, taking ownership
    pub fn load_data(&self, data: TopMostData) {
        self.replace(data.records);
    }

    fn replace(&self, records: impl IntoIterator<Item = (String, Record)>) {
        let records: HashMap<String, Arc<Record>> =
            records.into_iter().map(|(query, record)| (query, Arc::new(record))).collect();
        let count = records.len();

        *self.write() = records;
        tracing::debug!(count, "loaded pinned results");
    }

    /// Record pinned under `raw_query`, if any
    pub fn get(&self, raw_query: &str) -> Option<Record> {
        self.read().get(raw_query).map(|record| Record::clone(record))
    }

    /// Number of pinned queries
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current records, for the storage layer to persist
    pub fn snapshot(&self) -> RecordMap {
        self.read().iter().map(|(query, record)| (query.clone(), Record::clone(record))).collect()
    }

    pub fn to_data(&self) -> TopMostData {
        TopMostData::from(self.snapshot())
    }

    /// Raise every pinned result in `results` to [`TOP_MOST_SCORE`]
    ///
    /// Returns how many results were promoted. Scores of other results are
    /// left untouched.
    pub fn apply(&self, results: &mut [LaunchResult]) -> usize {
        if self.is_empty() {
            return 0;
        }

        let mut promoted = 0;
        for result in results.iter_mut() {
            if self.is_top_most(result) {
                result.score = TOP_MOST_SCORE;
                promoted += 1;
            }
        }
        promoted
    }
}
