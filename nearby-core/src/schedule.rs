//! Weekly opening hours and the weekday availability flag.
//!
//! A [`WeeklySchedule`] maps weekday names to opaque time-range strings such as
//! `"11:00-21:00"`. The open check is a presence test only: a place counts as
//! open when today's weekday has at least one listed range. Ranges are never
//! compared with the time of day.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Opening hours keyed by lower-case English weekday name.
///
/// Keys are matched case-insensitively so `"Monday"` and `"monday"` are
/// equivalent.
///
/// # Examples
/// ```
/// use chrono::Weekday;
/// use nearby_core::{WeeklyAvailability, WeeklySchedule};
///
/// let schedule = WeeklySchedule::new().with_day(Weekday::Mon, ["11:00-14:00"]);
/// assert!(schedule.has_hours_on(Weekday::Mon));
/// assert!(!schedule.has_hours_on(Weekday::Tue));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: BTreeMap<String, Vec<String>>,
}

impl WeeklySchedule {
    /// Construct an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ranges for `weekday`, replacing any existing entry.
    pub fn set_day<I, S>(&mut self, weekday: Weekday, ranges: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = weekday_key(weekday);
        self.days.retain(|day, _| !day.eq_ignore_ascii_case(key));
        self.days.insert(
            key.to_owned(),
            ranges.into_iter().map(Into::into).collect(),
        );
    }

    /// Set the ranges for `weekday` while returning `self` for chaining.
    #[must_use]
    pub fn with_day<I, S>(mut self, weekday: Weekday, ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_day(weekday, ranges);
        self
    }

    /// Return the ranges listed for `weekday`, if the day has an entry.
    ///
    /// When several keys spell the same weekday in different cases, the
    /// first one listing any range wins.
    #[must_use]
    pub fn ranges_for(&self, weekday: Weekday) -> Option<&[String]> {
        let mut entries = self.entries_for(weekday);
        let first = entries.next()?;
        if !first.is_empty() {
            return Some(first);
        }
        Some(entries.find(|ranges| !ranges.is_empty()).unwrap_or(first))
    }

    fn entries_for(&self, weekday: Weekday) -> impl Iterator<Item = &[String]> {
        let key = weekday_key(weekday);
        self.days
            .iter()
            .filter(move |(day, _)| day.eq_ignore_ascii_case(key))
            .map(|(_, ranges)| ranges.as_slice())
    }
}

/// Capability answering whether a place lists hours on a given weekday.
///
/// Only the presence of ranges is checked, never the time of day.
pub trait WeeklyAvailability {
    /// Return `true` when `weekday` carries at least one listed range.
    fn has_hours_on(&self, weekday: Weekday) -> bool;
}

impl WeeklyAvailability for WeeklySchedule {
    fn has_hours_on(&self, weekday: Weekday) -> bool {
        self.entries_for(weekday).any(|ranges| !ranges.is_empty())
    }
}

/// Report whether `schedule` lists any hours on the weekday of `now`.
///
/// `now` is local wall-clock time. The time of day is ignored.
#[must_use]
pub fn is_open_now<A>(schedule: &A, now: NaiveDateTime) -> bool
where
    A: WeeklyAvailability + ?Sized,
{
    schedule.has_hours_on(now.weekday())
}

/// Return the schedule key used for `weekday`.
#[must_use]
pub const fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    // 2024-06-03 was a Monday.
    fn monday_at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    #[rstest]
    fn open_when_weekday_has_ranges() {
        let schedule = WeeklySchedule::new().with_day(Weekday::Mon, ["11:00-14:00"]);
        assert!(is_open_now(&schedule, monday_at(12)));
    }

    #[rstest]
    #[case(3)]
    #[case(23)]
    fn ignores_time_of_day(#[case] hour: u32) {
        let schedule = WeeklySchedule::new().with_day(Weekday::Mon, ["11:00-14:00"]);
        assert!(is_open_now(&schedule, monday_at(hour)));
    }

    #[rstest]
    fn closed_when_weekday_is_missing() {
        let schedule = WeeklySchedule::new().with_day(Weekday::Tue, ["11:00-14:00"]);
        assert!(!is_open_now(&schedule, monday_at(12)));
    }

    #[rstest]
    fn closed_when_weekday_lists_no_ranges() {
        let schedule = WeeklySchedule::new().with_day(Weekday::Mon, Vec::<String>::new());
        assert!(!is_open_now(&schedule, monday_at(12)));
    }

    #[rstest]
    fn weekday_keys_match_case_insensitively() {
        let schedule: WeeklySchedule =
            serde_json::from_str(r#"{ "Monday": ["09:00-17:00"] }"#).expect("parse schedule");
        assert!(schedule.has_hours_on(Weekday::Mon));
    }

    #[rstest]
    #[case(r#"{ "Monday": [], "monday": ["09:00-17:00"] }"#)]
    #[case(r#"{ "monday": [], "MONDAY": ["09:00-17:00"] }"#)]
    fn any_spelling_with_ranges_counts_as_open(#[case] json: &str) {
        let schedule: WeeklySchedule = serde_json::from_str(json).expect("parse schedule");
        assert!(is_open_now(&schedule, monday_at(12)));
        assert_eq!(
            schedule.ranges_for(Weekday::Mon),
            Some(["09:00-17:00".to_owned()].as_slice())
        );
    }

    #[rstest]
    fn setting_a_day_replaces_other_spellings() {
        let mut schedule: WeeklySchedule =
            serde_json::from_str(r#"{ "Monday": ["09:00-17:00"] }"#).expect("parse schedule");
        schedule.set_day(Weekday::Mon, Vec::<String>::new());
        assert!(!is_open_now(&schedule, monday_at(12)));
    }

    #[rstest]
    fn serialises_as_plain_map() {
        let schedule = WeeklySchedule::new().with_day(Weekday::Fri, ["18:00-02:00"]);
        let json = serde_json::to_string(&schedule).expect("serialise schedule");
        assert_eq!(json, r#"{"friday":["18:00-02:00"]}"#);
    }
}
