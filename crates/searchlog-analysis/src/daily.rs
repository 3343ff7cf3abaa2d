//! Per-day event counts
//!
//! Counts events matching an [`EventFilter`] in 1-day buckets of the event
//! timestamp, optionally split by A/B test group. Every day (or day/group
//! pair) that has at least one event of any kind appears in the result, with
//! a count of zero when none of its events match. Days without events do not
//! appear.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::event::{Action, EventLog, Group, LogEvent};

/// Selects the events to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Events with the given action label.
    Action(Action),
    /// Events whose result count is exactly zero.
    ZeroResults,
}

impl EventFilter {
    pub const SEARCHES: Self = Self::Action(Action::SearchResultPage);
    pub const VISITS: Self = Self::Action(Action::VisitPage);

    #[must_use]
    pub fn matches(self, event: &LogEvent) -> bool {
        match self {
            Self::Action(action) => event.action == action,
            Self::ZeroResults => event.n_results == Some(0),
        }
    }
}

/// Key of a per-day-by-group count.
pub type DayGroup = (NaiveDate, Group);

/// Number of events matching `filter` on each day.
#[must_use]
pub fn count_per_day(log: &EventLog, filter: EventFilter) -> BTreeMap<NaiveDate, u64> {
    count_by_key(log, filter, LogEvent::day)
}

/// Number of events matching `filter` on each day, split by group.
#[must_use]
pub fn count_per_day_by_group(log: &EventLog, filter: EventFilter) -> BTreeMap<DayGroup, u64> {
    count_by_key(log, filter, |event| (event.day(), event.group))
}

/// Number of searches (result pages shown) per day regardless of group.
///
/// ```
/// use searchlog_analysis::{daily, event::EventLog};
///
/// let csv = "timestamp,session_id,group,action\n\
///            20160301000000,s1,a,searchResultPage\n\
///            20160301000100,s1,a,visitPage\n\
///            20160302000000,s2,b,searchResultPage\n";
/// let log = EventLog::from_csv_reader(csv.as_bytes())?;
/// let per_day = daily::searches_per_day(&log);
/// assert_eq!(per_day.values().copied().collect::<Vec<_>>(), [1, 1]);
/// # Ok::<(), searchlog_analysis::event::LoadEventError>(())
/// ```
#[must_use]
pub fn searches_per_day(log: &EventLog) -> BTreeMap<NaiveDate, u64> {
    count_per_day(log, EventFilter::SEARCHES)
}

/// Number of searches per day in group `a` and group `b`.
#[must_use]
pub fn searches_per_day_by_group(log: &EventLog) -> BTreeMap<DayGroup, u64> {
    count_per_day_by_group(log, EventFilter::SEARCHES)
}

fn count_by_key<K, F>(log: &EventLog, filter: EventFilter, key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&LogEvent) -> K,
{
    let mut counts = BTreeMap::new();
    for event in log.events() {
        let count = counts.entry(key(event)).or_insert(0);
        if filter.matches(event) {
            *count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{event, search, visit};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 3, day).unwrap()
    }

    fn fixture() -> EventLog {
        EventLog::new(vec![
            search(1, (9, 0, 0), "s1", Group::A, 3),
            visit(1, (9, 0, 5), "s1", Group::A, 1),
            search(1, (10, 0, 0), "s2", Group::A, 0),
            search(1, (23, 59, 59), "s3", Group::B, 7),
            event(2, (0, 0, 0), "s3", Group::B, Action::Checkin),
            visit(2, (1, 0, 0), "s4", Group::A, 2),
        ])
    }

    #[test]
    fn test_searches_per_day() {
        let counts = searches_per_day(&fixture());
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&date(1)], 3);
        assert_eq!(counts[&date(2)], 0);
    }

    #[test]
    fn test_searches_per_day_by_group() {
        let counts = searches_per_day_by_group(&fixture());
        assert_eq!(counts[&(date(1), Group::A)], 2);
        assert_eq!(counts[&(date(1), Group::B)], 1);
        assert_eq!(counts[&(date(2), Group::A)], 0);
        assert_eq!(counts[&(date(2), Group::B)], 0);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_zero_results_filter() {
        let counts = count_per_day(&fixture(), EventFilter::ZeroResults);
        assert_eq!(counts[&date(1)], 1);
        assert_eq!(counts[&date(2)], 0);
    }

    #[test]
    fn test_empty_log() {
        let log = EventLog::default();
        assert!(searches_per_day(&log).is_empty());
        assert!(searches_per_day_by_group(&log).is_empty());
    }

    #[test]
    fn test_counts_match_manual_filter() {
        let log = fixture();
        let counts = count_per_day(&log, EventFilter::VISITS);
        let manual = log
            .events()
            .iter()
            .filter(|e| e.action == Action::VisitPage)
            .count() as u64;
        assert_eq!(counts.values().sum::<u64>(), manual);
    }
}
