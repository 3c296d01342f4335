//! View-adapter bridge: the surface the presentation layer talks to.
//!
//! Owns the locally cached scheduled set and hands every state change to
//! subscribers as a fresh snapshot. Engine outcomes are returned as explicit
//! values; the presentation layer derives its own loading/error state from
//! them instead of this crate mutating ambient flags.

use crate::lifecycle::{DeleteError, FulfillError, LifecycleEngine, PartialFulfillment};
use crate::prayer::Prayer;
use crate::recurrence::due_today;
use crate::stats::PrayerStats;
use crate::store::{PrayerStore, StoreError};
use chrono::NaiveDate;

type Subscriber = Box<dyn Fn(&[Prayer]) + Send>;

/// Cached scheduled set plus the operations the presentation layer invokes.
///
/// Takes `&mut self` for every lifecycle call, which also enforces the
/// per-id serialization the engine requires: a second operation on the same
/// record cannot start until the first one resolved.
pub struct PrayerBoard<S> {
    engine: LifecycleEngine<S>,
    scheduled: Vec<Prayer>,
    stats: PrayerStats,
    subscribers: Vec<Subscriber>,
}

impl<S: PrayerStore> PrayerBoard<S> {
    pub fn new(store: S) -> Self {
        Self {
            engine: LifecycleEngine::new(store),
            scheduled: Vec::new(),
            stats: PrayerStats::default(),
            subscribers: Vec::new(),
        }
    }

    /// Re-read the scheduled set from the store, recompute the stats and
    /// notify subscribers. The store returns records in arbitrary order; the
    /// cache is sorted by id so successive snapshots compare stably.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let mut scheduled = self.engine.store().list_scheduled().await?;
        scheduled.sort_by(|a, b| a.id.cmp(&b.id));
        self.scheduled = scheduled;
        self.recompute_and_notify();
        Ok(())
    }

    /// Mark a prayer prayed. On success the cached set is pruned in place
    /// (no re-fetch) and subscribers are notified, mirroring the optimistic
    /// local update the presentation layer expects.
    pub async fn on_fulfill_requested(&mut self, id: &str) -> Result<Prayer, FulfillError> {
        let archived = self.engine.fulfill(id).await?;
        self.prune(id);
        Ok(archived)
    }

    /// Finish an interrupted fulfillment reported by a previous call.
    pub async fn resume_fulfill(
        &mut self,
        partial: PartialFulfillment,
    ) -> Result<Prayer, FulfillError> {
        let archived = self.engine.resume_fulfill(partial).await?;
        self.prune(&archived.id);
        Ok(archived)
    }

    /// Delete a prayer from both stores. The cache is pruned only on full
    /// success; after a partial failure the caller retries or refreshes.
    pub async fn on_delete_requested(&mut self, id: &str) -> Result<(), DeleteError> {
        self.engine.delete_prayer(id).await?;
        self.prune(id);
        Ok(())
    }

    /// Register a callback fired with the fresh scheduled set after every
    /// change (refresh, fulfill, delete).
    pub fn subscribe_to_scheduled_set(&mut self, callback: impl Fn(&[Prayer]) + Send + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// The cached scheduled set filtered down to today's eligible prayers.
    pub fn due_today(&self, today: NaiveDate) -> Vec<Prayer> {
        due_today(&self.scheduled, today)
    }

    /// Counters projected from the cached scheduled set.
    pub fn stats(&self) -> PrayerStats {
        self.stats
    }

    /// The full cached scheduled set, sorted by id.
    pub fn scheduled(&self) -> &[Prayer] {
        &self.scheduled
    }

    /// The underlying store, for host wiring and tests.
    pub fn store(&self) -> &S {
        self.engine.store()
    }

    /// Read the archive for the history view. Not cached; the archive only
    /// changes through this board's own operations or other devices.
    pub async fn archive(&self) -> Result<Vec<Prayer>, StoreError> {
        let mut archived = self.engine.store().list_archived().await?;
        archived.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(archived)
    }

    fn prune(&mut self, id: &str) {
        self.scheduled.retain(|prayer| prayer.id != id);
        self.recompute_and_notify();
    }

    fn recompute_and_notify(&mut self) {
        self.stats = PrayerStats::project(&self.scheduled);
        for subscriber in &self.subscribers {
            subscriber(&self.scheduled);
        }
    }
}
