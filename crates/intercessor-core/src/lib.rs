//! # Intercessor Core Library
//!
//! Core business logic for Intercessor, a community prayer scheduler. The
//! presentation layer (forms, modals, feeds) is a thin shell over this crate;
//! everything here is invoked in-process and returns explicit status values.
//!
//! ## Architecture
//!
//! - **Lifecycle Engine**: the fulfill/delete state machine over two remote
//!   collections, made resumable so a record is never lost or double-counted
//!   across partial failures
//! - **Stores**: a `PrayerStore` trait with a remote key-value REST adapter
//!   and an in-memory implementation
//! - **Recurrence**: pure due-today selection (daily vs. one-time)
//! - **Stats**: counters projected from the scheduled set
//! - **Board**: the cached view surface the presentation layer subscribes to
//!
//! ## Key Components
//!
//! - [`LifecycleEngine`]: fulfill / resume / delete transitions
//! - [`PrayerBoard`]: cached scheduled set, subscriptions, stats
//! - [`RtdbStore`]: remote store adapter
//! - [`due_today`]: recurrence filter

pub mod board;
pub mod error;
pub mod lifecycle;
pub mod prayer;
pub mod recurrence;
pub mod stats;
pub mod store;

pub use board::PrayerBoard;
pub use error::{CoreError, Result};
pub use lifecycle::{
    DeleteError, FulfillError, FulfillStep, LifecycleEngine, PartialFulfillment,
};
pub use prayer::{Prayer, ScheduleType};
pub use recurrence::due_today;
pub use stats::PrayerStats;
pub use store::{memory::MemoryStore, rtdb::RtdbConfig, rtdb::RtdbStore, PrayerStore, StoreError};
