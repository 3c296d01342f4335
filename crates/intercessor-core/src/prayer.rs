//! Prayer entity and recurrence policy types.
//!
//! The wire format matches the stored camelCase field names
//! (`prayerCount`, `scheduleType`, ...) so records round-trip unchanged
//! through the remote store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recurrence policy for a scheduled prayer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    /// Eligible every day.
    Daily,
    /// Eligible only on `scheduled_date`.
    Once,
}

impl Default for ScheduleType {
    fn default() -> Self {
        ScheduleType::Daily
    }
}

/// A scheduled prayer record.
///
/// The same shape lives in both the scheduled and the archive store; a given
/// id is present in at most one of the two at any instant observable outside
/// an in-flight transition. `title`, `description` and `owner_id` are owner
/// metadata this crate carries verbatim and never edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    /// Stable across stores. Some deployments key records purely by path and
    /// omit the field from the value; adapters backfill it from the key.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub schedule_type: ScheduleType,
    /// Meaningful only when `schedule_type` is `Once`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    /// Times this prayer has been marked prayed. Absent on the wire means 0.
    /// Never decremented while the record is scheduled.
    #[serde(default)]
    pub prayer_count: u32,
    #[serde(default)]
    pub owner_id: String,
}

impl Prayer {
    /// Create a new daily prayer with a fresh id and a zero count.
    pub fn new(title: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            schedule_type: ScheduleType::Daily,
            scheduled_date: None,
            prayer_count: 0,
            owner_id: owner_id.into(),
        }
    }

    /// Create a new one-time prayer for the given date.
    pub fn new_once(
        title: impl Into<String>,
        owner_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            schedule_type: ScheduleType::Once,
            scheduled_date: Some(date),
            ..Self::new(title, owner_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prayer_serialization_uses_wire_names() {
        let prayer = Prayer {
            id: "p-1".to_string(),
            title: "Morning".to_string(),
            description: "For the family".to_string(),
            schedule_type: ScheduleType::Once,
            scheduled_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            prayer_count: 2,
            owner_id: "u-9".to_string(),
        };

        let json = serde_json::to_value(&prayer).unwrap();
        assert_eq!(json["scheduleType"], "once");
        assert_eq!(json["prayerCount"], 2);
        assert_eq!(json["scheduledDate"], "2026-03-14");
        assert_eq!(json["ownerId"], "u-9");
    }

    #[test]
    fn missing_count_defaults_to_zero() {
        let json = r#"{"id":"p-2","title":"Evening","scheduleType":"daily"}"#;
        let prayer: Prayer = serde_json::from_str(json).unwrap();
        assert_eq!(prayer.prayer_count, 0);
        assert_eq!(prayer.schedule_type, ScheduleType::Daily);
        assert!(prayer.scheduled_date.is_none());
    }

    #[test]
    fn roundtrip() {
        let prayer = Prayer::new_once("Exam", "u-1", NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        let json = serde_json::to_string(&prayer).unwrap();
        let decoded: Prayer = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, prayer);
    }
}
