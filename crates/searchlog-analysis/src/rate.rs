//! Average daily ratios
//!
//! A daily ratio divides one per-day count by another (visits over searches
//! for the click-through rate, zero-result searches over searches for the
//! zero rate). The reported rate is the mean of the daily ratios, not the
//! ratio of the totals, so every day weighs the same regardless of traffic.
//!
//! A day whose denominator is zero has no defined ratio and is left out of
//! the mean. When no day is defined the rate itself is undefined: the
//! scalar helpers return `None` and the by-group helpers omit the group.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use searchlog_stats::descriptive;
use serde::Serialize;

use crate::{
    daily::{self, EventFilter},
    event::{EventLog, Group},
};

/// One day's ratio (or one day/group pair's ratio).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRate {
    pub day: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    pub numerator: u64,
    pub denominator: u64,
}

impl DailyRate {
    /// `numerator / denominator`, or `None` when the denominator is zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        (self.denominator > 0).then(|| self.numerator as f64 / self.denominator as f64)
    }
}

/// Per-day ratios of two filtered counts, in day order.
#[must_use]
pub fn daily_ratios(
    log: &EventLog,
    numerator: EventFilter,
    denominator: EventFilter,
) -> Vec<DailyRate> {
    let numerators = daily::count_per_day(log, numerator);
    let denominators = daily::count_per_day(log, denominator);
    denominators
        .into_iter()
        .map(|(day, denominator)| DailyRate {
            day,
            group: None,
            numerator: numerators.get(&day).copied().unwrap_or(0),
            denominator,
        })
        .collect()
}

/// Per-day-by-group ratios of two filtered counts, in (day, group) order.
#[must_use]
pub fn daily_ratios_by_group(
    log: &EventLog,
    numerator: EventFilter,
    denominator: EventFilter,
) -> Vec<DailyRate> {
    let numerators = daily::count_per_day_by_group(log, numerator);
    let denominators = daily::count_per_day_by_group(log, denominator);
    denominators
        .into_iter()
        .map(|(key @ (day, group), denominator)| DailyRate {
            day,
            group: Some(group),
            numerator: numerators.get(&key).copied().unwrap_or(0),
            denominator,
        })
        .collect()
}

/// Mean over days of `numerator / denominator`.
#[must_use]
pub fn average_daily_ratio(
    log: &EventLog,
    numerator: EventFilter,
    denominator: EventFilter,
) -> Option<f64> {
    descriptive::mean(
        daily_ratios(log, numerator, denominator)
            .iter()
            .filter_map(DailyRate::ratio),
    )
}

/// Mean over days of `numerator / denominator`, computed separately for each group.
#[must_use]
pub fn average_daily_ratio_by_group(
    log: &EventLog,
    numerator: EventFilter,
    denominator: EventFilter,
) -> BTreeMap<Group, f64> {
    let mut per_group = BTreeMap::<Group, Vec<f64>>::new();
    for rate in daily_ratios_by_group(log, numerator, denominator) {
        if let (Some(group), Some(ratio)) = (rate.group, rate.ratio()) {
            per_group.entry(group).or_default().push(ratio);
        }
    }
    per_group
        .into_iter()
        .filter_map(|(group, ratios)| descriptive::mean(ratios).map(|mean| (group, mean)))
        .collect()
}

/// Average daily click-through rate (visits per search).
///
/// ```
/// use searchlog_analysis::{event::EventLog, rate};
///
/// let csv = "timestamp,session_id,group,action\n\
///            20160301000000,s1,a,searchResultPage\n\
///            20160301000010,s1,a,visitPage\n\
///            20160302000000,s2,b,searchResultPage\n\
///            20160302000030,s3,b,searchResultPage\n";
/// let log = EventLog::from_csv_reader(csv.as_bytes())?;
/// // Day 1: 1/1, day 2: 0/2
/// assert_eq!(rate::average_click_through_rate(&log), Some(0.5));
/// # Ok::<(), searchlog_analysis::event::LoadEventError>(())
/// ```
#[must_use]
pub fn average_click_through_rate(log: &EventLog) -> Option<f64> {
    average_daily_ratio(log, EventFilter::VISITS, EventFilter::SEARCHES)
}

/// Average daily click-through rate for group `a` and group `b`.
#[must_use]
pub fn average_click_through_rate_by_group(log: &EventLog) -> BTreeMap<Group, f64> {
    average_daily_ratio_by_group(log, EventFilter::VISITS, EventFilter::SEARCHES)
}

/// Average daily share of searches that returned zero results.
#[must_use]
pub fn average_zero_rate(log: &EventLog) -> Option<f64> {
    average_daily_ratio(log, EventFilter::ZeroResults, EventFilter::SEARCHES)
}

/// Average daily share of searches that returned zero results, by group.
#[must_use]
pub fn average_zero_rate_by_group(log: &EventLog) -> BTreeMap<Group, f64> {
    average_daily_ratio_by_group(log, EventFilter::ZeroResults, EventFilter::SEARCHES)
}

/// A rate reported both ungrouped and per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateReport {
    pub name: &'static str,
    pub overall: Option<f64>,
    pub by_group: BTreeMap<Group, f64>,
    pub daily: Vec<DailyRate>,
    pub daily_by_group: Vec<DailyRate>,
}

impl RateReport {
    #[must_use]
    pub fn new(
        name: &'static str,
        log: &EventLog,
        numerator: EventFilter,
        denominator: EventFilter,
    ) -> Self {
        Self {
            name,
            overall: average_daily_ratio(log, numerator, denominator),
            by_group: average_daily_ratio_by_group(log, numerator, denominator),
            daily: daily_ratios(log, numerator, denominator),
            daily_by_group: daily_ratios_by_group(log, numerator, denominator),
        }
    }

    #[must_use]
    pub fn click_through(log: &EventLog) -> Self {
        Self::new(
            "click-through rate",
            log,
            EventFilter::VISITS,
            EventFilter::SEARCHES,
        )
    }

    #[must_use]
    pub fn zero_results(log: &EventLog) -> Self {
        Self::new(
            "zero results rate",
            log,
            EventFilter::ZeroResults,
            EventFilter::SEARCHES,
        )
    }
}
