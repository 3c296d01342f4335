//! Prayer lifecycle engine.
//!
//! A fulfillment is three remote writes with no transaction around them:
//!
//!   read scheduled ──> write incremented count ──> copy to archive ──> remove scheduled
//!
//! Interrupting the sequence leaves the record observable in both stores (or
//! scheduled with a bumped count), so every failure is surfaced with the exact
//! resume point and the already-incremented snapshot. Resuming never runs the
//! increment again: the copy is an upsert and the removals are idempotent, so
//! a resume can be repeated until it sticks.
//!
//! Callers must serialize lifecycle calls per id (await one before issuing
//! the next for the same prayer). Calls for distinct ids are independent.

use crate::prayer::Prayer;
use crate::store::{PrayerStore, StoreError};
use std::fmt;
use thiserror::Error;

/// Resume point of an interrupted fulfillment.
///
/// The count increment has no resume point on purpose: once it is written,
/// every later failure carries the incremented snapshot forward instead of
/// re-reading and re-incrementing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillStep {
    /// The archive copy has not happened yet.
    Copy,
    /// The record is archived; only the scheduled removal is outstanding.
    Remove,
}

impl fmt::Display for FulfillStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillStep::Copy => write!(f, "archive copy"),
            FulfillStep::Remove => write!(f, "scheduled removal"),
        }
    }
}

/// An interrupted fulfillment, with everything needed to finish it.
#[derive(Debug, Clone)]
pub struct PartialFulfillment {
    pub resume_from: FulfillStep,
    /// The record with the increment already applied. Passed back verbatim on
    /// resume so the counter moves exactly once per fulfillment.
    pub snapshot: Prayer,
    /// The store failure that stopped the sequence.
    pub source: StoreError,
}

impl PartialFulfillment {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }
}

/// Outcome taxonomy of [`LifecycleEngine::fulfill`].
#[derive(Debug, Clone, Error)]
pub enum FulfillError {
    /// The prayer is not in the scheduled store. A concurrent actor already
    /// fulfilled or deleted it; the intended effect is achieved or moot, so
    /// this is reported as a no-op, not retried.
    #[error("prayer not found in scheduled store")]
    NotFound,

    /// A failure before any mutation (or before the increment landed). The
    /// record is unambiguously still scheduled with its prior count; the
    /// whole call is safe to retry.
    #[error(transparent)]
    Store(StoreError),

    /// The sequence stopped after the increment. Finish it with
    /// [`LifecycleEngine::resume_fulfill`], which carries the incremented
    /// snapshot forward. Only a [`FulfillStep::Remove`] partial may instead
    /// be retried with a fresh `fulfill`: the archive copy makes the
    /// interrupted attempt detectable. After a [`FulfillStep::Copy`] failure
    /// no archive entry exists to detect, so a fresh `fulfill` counts as a
    /// new fulfillment and moves the counter again; recover through the
    /// ticket.
    #[error("fulfillment interrupted before {}: {}", .0.resume_from, .0.source)]
    Partial(PartialFulfillment),
}

/// Per-store outcome of a failed delete. Retry only what is still set.
#[derive(Debug, Clone, Error)]
#[error("delete incomplete (scheduled: {scheduled:?}, archived: {archived:?})")]
pub struct DeleteError {
    pub scheduled: Option<StoreError>,
    pub archived: Option<StoreError>,
}

/// Orchestrates the fulfill and delete transitions against a [`PrayerStore`].
///
/// Never retries internally; every failure names the failed step and the
/// record's last known location so retry policy stays with the caller.
pub struct LifecycleEngine<S> {
    store: S,
}

impl<S: PrayerStore> LifecycleEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mark a scheduled prayer prayed: increment its counter, copy it to the
    /// archive, remove it from the scheduled store. Returns the archived
    /// snapshot on success.
    pub async fn fulfill(&self, id: &str) -> Result<Prayer, FulfillError> {
        let scheduled = self
            .store
            .get_scheduled(id)
            .await
            .map_err(FulfillError::Store)?
            .ok_or(FulfillError::NotFound)?;

        // A record present in both stores is always a fulfillment that died
        // between the copy and the removal (ids are never reused, and every
        // fulfillment removes the scheduled record). Matching counts mean the
        // archive copy already reflects this occurrence: skip straight to the
        // removal instead of incrementing a second time.
        if let Some(archived) = self
            .store
            .get_archived(id)
            .await
            .map_err(FulfillError::Store)?
        {
            if archived.prayer_count == scheduled.prayer_count {
                tracing::debug!(id, "archive copy already present, resuming at removal");
                return self.finish_removal(archived).await;
            }
        }

        let mut snapshot = scheduled;
        snapshot.prayer_count = snapshot.prayer_count.saturating_add(1);

        match self
            .store
            .set_scheduled_count(id, snapshot.prayer_count)
            .await
        {
            Ok(()) => {}
            // The record vanished between the read and the write: a
            // concurrent delete won. Nothing of ours landed.
            Err(StoreError::NotFound) => return Err(FulfillError::NotFound),
            Err(err) => return Err(FulfillError::Store(err)),
        }
        tracing::debug!(id, count = snapshot.prayer_count, "prayer count updated");

        self.archive_then_remove(snapshot).await
    }

    /// Finish an interrupted fulfillment from its recorded resume point.
    pub async fn resume_fulfill(
        &self,
        partial: PartialFulfillment,
    ) -> Result<Prayer, FulfillError> {
        match partial.resume_from {
            FulfillStep::Copy => self.archive_then_remove(partial.snapshot).await,
            FulfillStep::Remove => self.finish_removal(partial.snapshot).await,
        }
    }

    async fn archive_then_remove(&self, snapshot: Prayer) -> Result<Prayer, FulfillError> {
        if let Err(source) = self.store.copy_to_archive(&snapshot.id, &snapshot).await {
            tracing::warn!(id = %snapshot.id, %source, "archive copy failed, fulfillment partial");
            return Err(FulfillError::Partial(PartialFulfillment {
                resume_from: FulfillStep::Copy,
                snapshot,
                source,
            }));
        }
        tracing::debug!(id = %snapshot.id, "prayer archived");
        self.finish_removal(snapshot).await
    }

    async fn finish_removal(&self, snapshot: Prayer) -> Result<Prayer, FulfillError> {
        if let Err(source) = self.store.remove_scheduled(&snapshot.id).await {
            tracing::warn!(id = %snapshot.id, %source, "scheduled removal failed, record in both stores");
            return Err(FulfillError::Partial(PartialFulfillment {
                resume_from: FulfillStep::Remove,
                snapshot,
                source,
            }));
        }
        tracing::debug!(id = %snapshot.id, "prayer removed from scheduled");
        Ok(snapshot)
    }

    /// Remove a prayer from both stores. The removals are idempotent and
    /// unordered; each store's outcome is reported separately so the caller
    /// retries only the one that failed.
    pub async fn delete_prayer(&self, id: &str) -> Result<(), DeleteError> {
        let scheduled = self.store.remove_scheduled(id).await.err();
        let archived = self.store.remove_archived(id).await.err();

        if scheduled.is_none() && archived.is_none() {
            tracing::debug!(id, "prayer deleted from both stores");
            Ok(())
        } else {
            tracing::warn!(id, ?scheduled, ?archived, "delete incomplete");
            Err(DeleteError {
                scheduled,
                archived,
            })
        }
    }
}

#[cfg(test)]
mod engine_tests;
