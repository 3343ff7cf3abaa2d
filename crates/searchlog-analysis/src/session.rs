//! Session records and session-length distributions
//!
//! A session is the set of events sharing a `session_id`. Its length is the
//! time between its first and last event; its ending result count is the
//! result count of the last event that carried one.
//!
//! Session lengths are bucketed into fixed right-closed intervals
//! ([`SessionLengthBins`]). Distributions report both the count per bin and
//! the share of all sessions considered, including sessions longer than the
//! last edge, so fractions may add up to less than one.
//!
//! # Examples
//!
//! ```
//! use searchlog_analysis::{
//!     event::EventLog,
//!     session::{self, SessionLengthBins, SessionRecord},
//! };
//!
//! let csv = "timestamp,session_id,group,action,n_results\n\
//!            20160301000000,s1,a,searchResultPage,20\n\
//!            20160301000025,s1,a,visitPage,\n\
//!            20160301000000,s2,b,searchResultPage,20\n\
//!            20160301000500,s2,b,checkin,\n";
//! let log = EventLog::from_csv_reader(csv.as_bytes())?;
//! let sessions = SessionRecord::collect(&log);
//! assert_eq!(sessions.len(), 2);
//!
//! let dist = session::sessions_with_n_results(&sessions, 20, &SessionLengthBins::default());
//! assert_eq!(dist.total_sessions, 2);
//! assert_eq!(dist.bins[1].label(), "(10, 30]");
//! assert_eq!(dist.bins[1].fraction, 0.5); // s1 lasted 25 seconds
//! # Ok::<(), searchlog_analysis::event::LoadEventError>(())
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use searchlog_stats::{descriptive::DescriptiveStats, histogram::FixedHistogram, percentiles};
use serde::Serialize;

use crate::event::{EventLog, Group};

/// Summary of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub group: Group,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Result count of the last event in the session that carried one.
    pub n_results_end: Option<u32>,
    pub num_events: usize,
}

impl SessionRecord {
    /// Groups the log by session, ordered by start time then session id.
    #[must_use]
    pub fn collect(log: &EventLog) -> Vec<Self> {
        let mut sessions = HashMap::<&str, SessionRecord>::new();
        // Events are in timestamp order, so the first event seen starts the
        // session and every later one extends it.
        for event in log.events() {
            let record = sessions
                .entry(event.session_id.as_str())
                .or_insert_with(|| SessionRecord {
                    session_id: event.session_id.clone(),
                    group: event.group,
                    start: event.timestamp,
                    end: event.timestamp,
                    n_results_end: None,
                    num_events: 0,
                });
            record.end = event.timestamp;
            record.num_events += 1;
            if event.n_results.is_some() {
                record.n_results_end = event.n_results;
            }
        }

        let mut sessions = sessions.into_values().collect::<Vec<_>>();
        sessions.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        sessions
    }

    /// Session length in whole seconds.
    #[must_use]
    pub fn length_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Ascending session-length bin edges in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLengthBins {
    edges: Vec<f64>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("session length bins need at least two strictly ascending edges, got {edges:?}")]
pub struct InvalidBinsError {
    pub edges: Vec<f64>,
}

impl Default for SessionLengthBins {
    /// `0, 10, 30, 60, ..., 240` followed by one-minute steps up to ten minutes.
    fn default() -> Self {
        let mut edges = vec![0.0, 10.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0];
        edges.extend((1..=6).map(|i| 240.0 + 60.0 * f64::from(i)));
        Self { edges }
    }
}

impl SessionLengthBins {
    /// # Errors
    ///
    /// Returns an error unless `edges` has at least two strictly ascending values.
    pub fn new(edges: Vec<f64>) -> Result<Self, InvalidBinsError> {
        let ascending = edges.len() >= 2
            && edges.iter().all(|e| e.is_finite())
            && edges.windows(2).all(|w| w[0] < w[1]);
        if ascending {
            Ok(Self { edges })
        } else {
            Err(InvalidBinsError { edges })
        }
    }

    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }
}

/// One bucket of a session-length distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionLengthBin {
    /// Exclusive lower edge in seconds (inclusive for the first bin).
    pub lower: f64,
    /// Inclusive upper edge in seconds.
    pub upper: f64,
    pub count: u64,
    /// `count` divided by every session considered.
    pub fraction: f64,
}

impl SessionLengthBin {
    #[must_use]
    pub fn label(&self) -> String {
        format!("({}, {}]", self.lower, self.upper)
    }
}

/// Session counts and shares per length bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionLengthDistribution {
    pub bins: Vec<SessionLengthBin>,
    /// Every session considered, including those outside all bins.
    pub total_sessions: u64,
}

impl SessionLengthDistribution {
    #[expect(clippy::cast_precision_loss)]
    pub fn from_sessions<'a, I>(bins: &SessionLengthBins, sessions: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let histogram = FixedHistogram::new(
            bins.edges(),
            sessions
                .into_iter()
                .map(|session| session.length_secs() as f64),
        );
        let total_sessions = histogram.total;
        let bins = histogram
            .bins
            .iter()
            .map(|bin| SessionLengthBin {
                lower: bin.range.start,
                upper: bin.range.end,
                count: bin.count,
                fraction: bin.fraction(total_sessions),
            })
            .collect();
        Self {
            bins,
            total_sessions,
        }
    }

    /// Largest per-bin fraction, `0.0` for an empty distribution.
    #[must_use]
    pub fn max_fraction(&self) -> f64 {
        self.bins.iter().map(|bin| bin.fraction).fold(0.0, f64::max)
    }
}

/// Share of sessions ending with exactly `n_results` results that fall in
/// each session-length bin.
///
/// With no matching session every fraction is `0.0` and `total_sessions` is 0.
#[must_use]
pub fn sessions_with_n_results(
    sessions: &[SessionRecord],
    n_results: u32,
    bins: &SessionLengthBins,
) -> SessionLengthDistribution {
    SessionLengthDistribution::from_sessions(
        bins,
        sessions
            .iter()
            .filter(|session| session.n_results_end == Some(n_results)),
    )
}

/// Session-length distribution of every session, split by group.
///
/// Groups without sessions are omitted.
#[must_use]
pub fn session_length_by_group(
    sessions: &[SessionRecord],
    bins: &SessionLengthBins,
) -> BTreeMap<Group, SessionLengthDistribution> {
    Group::ALL
        .into_iter()
        .filter(|group| sessions.iter().any(|s| s.group == *group))
        .map(|group| {
            let dist = SessionLengthDistribution::from_sessions(
                bins,
                sessions.iter().filter(|s| s.group == group),
            );
            (group, dist)
        })
        .collect()
}

/// Descriptive statistics of session lengths in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionLengthSummary {
    /// `None` for the summary over every session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

impl SessionLengthSummary {
    #[expect(clippy::cast_precision_loss)]
    fn from_sessions<'a, I>(group: Option<Group>, sessions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut lengths = sessions
            .into_iter()
            .map(|s| s.length_secs() as f64)
            .collect::<Vec<_>>();
        lengths.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&lengths)?;
        let [p25, p75, p90] = percentiles::nearest_ranks(&lengths, [25.0, 75.0, 90.0])?;
        Some(Self {
            group,
            count: stats.count,
            mean: stats.mean,
            median: stats.median,
            min: stats.min,
            max: stats.max,
            p25,
            p75,
            p90,
        })
    }
}

/// Session-length summaries over every session followed by one per group.
///
/// Empty selections are skipped.
#[must_use]
pub fn summarize_session_lengths(sessions: &[SessionRecord]) -> Vec<SessionLengthSummary> {
    let overall = SessionLengthSummary::from_sessions(None, sessions);
    let per_group = Group::ALL.into_iter().filter_map(|group| {
        SessionLengthSummary::from_sessions(
            Some(group),
            sessions.iter().filter(|s| s.group == group),
        )
    });
    overall.into_iter().chain(per_group).collect()
}
