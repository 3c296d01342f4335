//! In-memory store, used as a test double and as a host-side cache.
//!
//! Supports scripted one-shot failure injection so the partial-failure
//! behavior of the lifecycle engine can be exercised deterministically.

use crate::prayer::Prayer;
use crate::store::{PrayerStore, StoreError, StoreResult};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Store operation identifiers for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetScheduled,
    ListScheduled,
    GetArchived,
    ListArchived,
    SetScheduledCount,
    CopyToArchive,
    RemoveScheduled,
    RemoveArchived,
}

#[derive(Default)]
struct Inner {
    scheduled: HashMap<String, Prayer>,
    archived: HashMap<String, Prayer>,
    /// Queued failures per operation; each entry fails exactly one call.
    failures: HashMap<StoreOp, VecDeque<StoreError>>,
}

/// In-memory implementation of [`PrayerStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly into the scheduled collection.
    pub fn insert_scheduled(&self, prayer: Prayer) {
        let mut inner = self.inner.lock().unwrap();
        inner.scheduled.insert(prayer.id.clone(), prayer);
    }

    /// Seed a record directly into the archive collection.
    pub fn insert_archived(&self, prayer: Prayer) {
        let mut inner = self.inner.lock().unwrap();
        inner.archived.insert(prayer.id.clone(), prayer);
    }

    /// Queue a failure for the next call to `op`. Repeated calls stack, so
    /// two queued failures fail the next two calls.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        let mut inner = self.inner.lock().unwrap();
        inner.failures.entry(op).or_default().push_back(error);
    }

    /// Snapshot of the scheduled collection, for assertions.
    pub fn scheduled_snapshot(&self) -> HashMap<String, Prayer> {
        self.inner.lock().unwrap().scheduled.clone()
    }

    /// Snapshot of the archive collection, for assertions.
    pub fn archived_snapshot(&self) -> HashMap<String, Prayer> {
        self.inner.lock().unwrap().archived.clone()
    }

    fn take_failure(inner: &mut Inner, op: StoreOp) -> StoreResult<()> {
        if let Some(queue) = inner.failures.get_mut(&op) {
            if let Some(error) = queue.pop_front() {
                return Err(error);
            }
        }
        Ok(())
    }
}

impl PrayerStore for MemoryStore {
    async fn get_scheduled(&self, id: &str) -> StoreResult<Option<Prayer>> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::GetScheduled)?;
        Ok(inner.scheduled.get(id).cloned())
    }

    async fn list_scheduled(&self) -> StoreResult<Vec<Prayer>> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::ListScheduled)?;
        Ok(inner.scheduled.values().cloned().collect())
    }

    async fn get_archived(&self, id: &str) -> StoreResult<Option<Prayer>> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::GetArchived)?;
        Ok(inner.archived.get(id).cloned())
    }

    async fn list_archived(&self) -> StoreResult<Vec<Prayer>> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::ListArchived)?;
        Ok(inner.archived.values().cloned().collect())
    }

    async fn set_scheduled_count(&self, id: &str, new_count: u32) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::SetScheduledCount)?;
        match inner.scheduled.get_mut(id) {
            Some(prayer) => {
                prayer.prayer_count = new_count;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn copy_to_archive(&self, id: &str, snapshot: &Prayer) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::CopyToArchive)?;
        inner.archived.insert(id.to_string(), snapshot.clone());
        Ok(())
    }

    async fn remove_scheduled(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::RemoveScheduled)?;
        inner.scheduled.remove(id);
        Ok(())
    }

    async fn remove_archived(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner, StoreOp::RemoveArchived)?;
        inner.archived.remove(id);
        Ok(())
    }
}
