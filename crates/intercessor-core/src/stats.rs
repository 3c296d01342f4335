//! Aggregate statistics over the scheduled set.

use crate::prayer::Prayer;
use serde::{Deserialize, Serialize};

/// Counters derived from the current scheduled set.
///
/// `total_fulfilled` sums the counts of records still scheduled; a fully
/// archived one-time prayer drops out of the displayed total. This mirrors
/// the upstream behavior on purpose (see DESIGN.md) -- an archive-inclusive
/// total would be a separate projection, not a change to this one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerStats {
    pub total_scheduled: usize,
    pub total_fulfilled: u64,
}

impl PrayerStats {
    /// Recompute both counters from a scheduled-set snapshot.
    pub fn project(scheduled: &[Prayer]) -> Self {
        Self {
            total_scheduled: scheduled.len(),
            total_fulfilled: scheduled
                .iter()
                .map(|prayer| u64::from(prayer.prayer_count))
                .sum(),
        }
    }
}
