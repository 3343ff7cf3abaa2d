//! First click positions
//!
//! For each day and session, the position of the first search result the
//! session visited. Counting these per day shows how often users pick the
//! top result versus scrolling further down.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::{Action, EventLog, Group};

/// The first visited result of a session on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstClick {
    pub day: NaiveDate,
    pub session_id: String,
    pub group: Group,
    pub position: u32,
}

/// First visit with a known result position for every (day, session) pair,
/// ordered by day then session id.
#[must_use]
pub fn first_clicks(log: &EventLog) -> Vec<FirstClick> {
    let mut firsts = BTreeMap::<(NaiveDate, &str), FirstClick>::new();
    for event in log.events() {
        if event.action != Action::VisitPage {
            continue;
        }
        let Some(position) = event.result_position else {
            continue;
        };
        firsts
            .entry((event.day(), event.session_id.as_str()))
            .or_insert_with(|| FirstClick {
                day: event.day(),
                session_id: event.session_id.clone(),
                group: event.group,
                position,
            });
    }
    firsts.into_values().collect()
}

/// Per-position counts of first clicks on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyFirstClickCounts {
    pub day: NaiveDate,
    /// `(position, sessions)` in ascending position order.
    pub counts: Vec<(u32, u64)>,
}

impl DailyFirstClickCounts {
    /// Counts first clicks per day, keeping the `top_num` lowest positions.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use searchlog_analysis::{event::Group, first_click::{DailyFirstClickCounts, FirstClick}};
    ///
    /// let day = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
    /// let click = |id: &str, position| FirstClick {
    ///     day,
    ///     session_id: id.to_owned(),
    ///     group: Group::A,
    ///     position,
    /// };
    /// let clicks = [click("s1", 1), click("s2", 3), click("s3", 1), click("s4", 9)];
    /// let per_day = DailyFirstClickCounts::per_day(&clicks, 2);
    /// assert_eq!(per_day[0].counts, [(1, 2), (3, 1)]);
    /// ```
    #[must_use]
    pub fn per_day(clicks: &[FirstClick], top_num: usize) -> Vec<Self> {
        let mut per_day = BTreeMap::<NaiveDate, BTreeMap<u32, u64>>::new();
        for click in clicks {
            *per_day
                .entry(click.day)
                .or_default()
                .entry(click.position)
                .or_insert(0) += 1;
        }
        per_day
            .into_iter()
            .map(|(day, counts)| Self {
                day,
                counts: counts.into_iter().take(top_num).collect(),
            })
            .collect()
    }

    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().map(|&(_, count)| count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{event, search, visit};

    fn fixture() -> EventLog {
        EventLog::new(vec![
            search(1, (9, 0, 0), "s1", Group::A, 20),
            visit(1, (9, 0, 5), "s1", Group::A, 3),
            visit(1, (9, 0, 50), "s1", Group::A, 1),
            event(1, (10, 0, 0), "s2", Group::B, Action::VisitPage),
            visit(1, (10, 0, 10), "s2", Group::B, 1),
            visit(1, (23, 59, 0), "s3", Group::A, 1),
            visit(2, (0, 1, 0), "s3", Group::A, 2),
        ])
    }

    #[test]
    fn test_first_clicks() {
        let clicks = first_clicks(&fixture());
        let summary = clicks
            .iter()
            .map(|c| (c.day.format("%d").to_string(), c.session_id.as_str(), c.position))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                ("01".to_owned(), "s1", 3),
                ("01".to_owned(), "s2", 1),
                ("01".to_owned(), "s3", 1),
                ("02".to_owned(), "s3", 2),
            ]
        );
    }

    #[test]
    fn test_per_day_counts() {
        let per_day = DailyFirstClickCounts::per_day(&first_clicks(&fixture()), 20);
        assert_eq!(per_day.len(), 2);
        assert_eq!(per_day[0].counts, [(1, 2), (3, 1)]);
        assert_eq!(per_day[0].max_count(), 2);
        assert_eq!(per_day[1].counts, [(2, 1)]);
    }

    #[test]
    fn test_top_num_zero() {
        let per_day = DailyFirstClickCounts::per_day(&first_clicks(&fixture()), 0);
        assert!(per_day.iter().all(|d| d.counts.is_empty()));
        assert_eq!(per_day[0].max_count(), 0);
    }
}
