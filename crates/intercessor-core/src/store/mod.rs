//! Storage layer: the repository contract and its adapters.
//!
//! Two durable collections, `scheduled` and `archived`, keyed by prayer id.
//! The stores are plain remote key-value collections with no multi-key
//! transaction, so every consistency guarantee lives in the lifecycle
//! engine's ordering and idempotency discipline, not here.

pub mod memory;
pub mod rtdb;

use crate::prayer::Prayer;
use thiserror::Error;

/// Storage failure taxonomy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The record was absent where the operation assumed presence.
    /// Not retryable; the caller treats it as already-satisfied or moot.
    #[error("record not found")]
    NotFound,

    /// Remote call failure or timeout. Safe to retry.
    #[error("transient store failure: {message}")]
    Transient { message: String },
}

impl StoreError {
    pub fn transient(message: impl Into<String>) -> Self {
        StoreError::Transient {
            message: message.into(),
        }
    }

    /// Whether a retry of the same call can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed access to the two prayer collections.
///
/// Pure CRUD, no business logic. Calls are remote and may fail; retries are
/// the caller's responsibility (the engine surfaces the failed step instead
/// of retrying internally). Implementations must honor two contracts the
/// engine's idempotency depends on:
///
/// - `copy_to_archive` is an upsert: a retry overwrites the existing archive
///   entry for the same id rather than failing.
/// - `remove_scheduled` / `remove_archived` treat an absent id as success.
pub trait PrayerStore: Send + Sync {
    /// Read one scheduled prayer. `Ok(None)` means absent, not an error.
    fn get_scheduled(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<Prayer>>> + Send;

    /// List the full scheduled set. Order is unspecified; consumers re-sort.
    fn list_scheduled(&self)
        -> impl std::future::Future<Output = StoreResult<Vec<Prayer>>> + Send;

    /// Read one archived prayer. `Ok(None)` means absent.
    fn get_archived(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<Prayer>>> + Send;

    /// List the archive, for the history view.
    fn list_archived(&self)
        -> impl std::future::Future<Output = StoreResult<Vec<Prayer>>> + Send;

    /// Write a new counter value for a scheduled prayer.
    /// Fails with [`StoreError::NotFound`] if the record vanished.
    fn set_scheduled_count(
        &self,
        id: &str,
        new_count: u32,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Upsert the snapshot into the archive collection.
    fn copy_to_archive(
        &self,
        id: &str,
        snapshot: &Prayer,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Remove from the scheduled collection. Absent id is success.
    fn remove_scheduled(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Remove from the archive collection. Absent id is success.
    fn remove_archived(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;
}
