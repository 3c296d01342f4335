//! Due-today selection over the scheduled set.

use crate::prayer::{Prayer, ScheduleType};
use chrono::NaiveDate;

/// Select the prayers eligible for action on `today`.
///
/// Daily prayers are always due. One-time prayers are due only when their
/// scheduled date falls on `today` by calendar-day equality; `today` must be
/// computed in the owner's time zone by the caller, it is never derived here.
/// A one-time prayer without a date is never due.
pub fn due_today(prayers: &[Prayer], today: NaiveDate) -> Vec<Prayer> {
    prayers
        .iter()
        .filter(|prayer| match prayer.schedule_type {
            ScheduleType::Daily => true,
            ScheduleType::Once => prayer.scheduled_date == Some(today),
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_always_due() {
        let prayers = vec![Prayer::new("Morning", "u-1")];
        let due = due_today(&prayers, date(2026, 1, 1));
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn once_due_only_on_its_date() {
        let today = date(2026, 8, 31);
        let prayers = vec![
            Prayer::new_once("Today", "u-1", today),
            Prayer::new_once("Yesterday", "u-1", date(2026, 8, 30)),
            Prayer::new_once("Tomorrow", "u-1", date(2026, 9, 1)),
        ];

        let due = due_today(&prayers, today);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Today");
    }

    #[test]
    fn mixed_set_keeps_daily_and_matching_once() {
        let today = date(2026, 8, 31);
        let prayers = vec![
            Prayer::new("Daily", "u-1"),
            Prayer::new_once("Past", "u-1", date(2025, 12, 25)),
        ];

        let due = due_today(&prayers, today);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Daily");
    }

    #[test]
    fn once_without_date_is_never_due() {
        let mut prayer = Prayer::new("Dateless", "u-1");
        prayer.schedule_type = ScheduleType::Once;
        prayer.scheduled_date = None;

        let due = due_today(&[prayer], date(2026, 8, 31));
        assert!(due.is_empty());
    }

    #[test]
    fn does_not_mutate_input() {
        let prayers = vec![Prayer::new("Morning", "u-1")];
        let before = prayers.clone();
        let _ = due_today(&prayers, date(2026, 8, 31));
        assert_eq!(prayers, before);
    }
}
