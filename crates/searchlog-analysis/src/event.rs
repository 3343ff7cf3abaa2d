//! Log event records and CSV loading
//!
//! A search log is a table of events. Each event carries a timestamp (the
//! temporal index of the table), the session it belongs to, the A/B test
//! group of that session, an action label, and optionally the number of
//! results returned by a search or the position of a clicked result.
//!
//! # CSV Format
//!
//! ```text
//! uuid,timestamp,session_id,group,action,checkin,page_id,n_results,result_position
//! 00000736...,20160301103842,78245c2c3fba013a,b,searchResultPage,,cbeb66d1,5,
//! 0000cd61...,20160307002234,c559c3be98dca8a4,a,visitPage,,22e4b6a3,,1
//! ```
//!
//! Only `timestamp`, `session_id`, `group` and `action` are required.
//! `n_results` and `result_position` may be missing or empty. Other columns
//! are ignored.

use std::{collections::BTreeSet, fmt, io, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A/B test cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    A,
    B,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::A, Group::B];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Group::A => "a",
            Group::B => "b",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown group '{value}'")]
pub struct ParseGroupError {
    pub value: String,
}

impl FromStr for Group {
    type Err = ParseGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Group::A),
            "b" | "B" => Ok(Group::B),
            other => Err(ParseGroupError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Action label of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// A search engine result page was shown.
    SearchResultPage,
    /// A result from the result page was visited.
    VisitPage,
    /// The user is still on a visited page.
    Checkin,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::SearchResultPage => "searchResultPage",
            Action::VisitPage => "visitPage",
            Action::Checkin => "checkin",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown action '{value}'")]
pub struct ParseActionError {
    pub value: String,
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Action::SearchResultPage, Action::VisitPage, Action::Checkin]
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseActionError {
                value: s.to_owned(),
            })
    }
}

/// A single row of the search log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: NaiveDateTime,
    pub session_id: String,
    pub group: Group,
    pub action: Action,
    /// Number of results returned; only present on search events.
    pub n_results: Option<u32>,
    /// Position of the visited result; only present on visit events.
    pub result_position: Option<u32>,
}

impl LogEvent {
    /// Calendar day of the event.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Error raised while loading a search log.
///
/// `record` is the 1-based data record number (the header is not counted).
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadEventError {
    #[display("failed to read CSV record {record}")]
    Csv { record: usize, source: csv::Error },
    #[display("record {record}: invalid timestamp '{value}'")]
    InvalidTimestamp { record: usize, value: String },
    #[display("record {record}: {source}")]
    UnknownGroup {
        record: usize,
        source: ParseGroupError,
    },
    #[display("record {record}: {source}")]
    UnknownAction {
        record: usize,
        source: ParseActionError,
    },
    #[display("record {record}: invalid {column} '{value}'")]
    InvalidCount {
        record: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: String,
    session_id: String,
    group: String,
    action: String,
    #[serde(default)]
    n_results: Option<String>,
    #[serde(default)]
    result_position: Option<String>,
}

impl RawRecord {
    fn into_event(self, record: usize) -> Result<LogEvent, LoadEventError> {
        let timestamp =
            parse_timestamp(&self.timestamp).ok_or_else(|| LoadEventError::InvalidTimestamp {
                record,
                value: self.timestamp.clone(),
            })?;
        let group = self
            .group
            .parse()
            .map_err(|source| LoadEventError::UnknownGroup { record, source })?;
        let action = self
            .action
            .parse()
            .map_err(|source| LoadEventError::UnknownAction { record, source })?;
        let n_results = parse_count(self.n_results.as_deref(), "n_results", record)?;
        let result_position =
            parse_count(self.result_position.as_deref(), "result_position", record)?;

        Ok(LogEvent {
            timestamp,
            session_id: self.session_id,
            group,
            action,
            n_results,
            result_position,
        })
    }
}

/// Parses a timestamp in one of the accepted spellings.
///
/// - `YYYYMMDDhhmmss`, also written as a float (`20160301000000.0`,
///   `2.0160301e13`)
/// - `YYYY-MM-DD hh:mm:ss`
/// - RFC 3339 (converted to UTC)
///
/// ```
/// use chrono::NaiveDate;
/// use searchlog_analysis::event::parse_timestamp;
///
/// let expected = NaiveDate::from_ymd_opt(2016, 3, 1)
///     .unwrap()
///     .and_hms_opt(10, 38, 42)
///     .unwrap();
/// assert_eq!(parse_timestamp("20160301103842"), Some(expected));
/// assert_eq!(parse_timestamp("2016-03-01 10:38:42"), Some(expected));
/// assert_eq!(parse_timestamp("2016-03-01T10:38:42Z"), Some(expected));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.len() == 14 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%S").ok();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    let number = s.parse::<f64>().ok()?;
    if !number.is_finite() || number < 0.0 || number.fract() != 0.0 {
        return None;
    }
    let digits = format!("{number:.0}");
    (digits.len() == 14)
        .then(|| NaiveDateTime::parse_from_str(&digits, "%Y%m%d%H%M%S").ok())
        .flatten()
}

/// Parses an optional non-negative count, accepting integral floats such as `20.0`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(
    value: Option<&str>,
    column: &'static str,
    record: usize,
) -> Result<Option<u32>, LoadEventError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty() && *v != "NA") else {
        return Ok(None);
    };
    if let Ok(count) = value.parse::<u32>() {
        return Ok(Some(count));
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_nan() => Ok(None),
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(Some(f as u32)),
        _ => Err(LoadEventError::InvalidCount {
            record,
            column,
            value: value.to_owned(),
        }),
    }
}

/// The search log: events ordered by timestamp.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LogEvent>,
}

impl EventLog {
    /// Builds a log from events in any order.
    ///
    /// Events are sorted by timestamp; events sharing a timestamp keep their
    /// input order.
    #[must_use]
    pub fn new(mut events: Vec<LogEvent>) -> Self {
        events.sort_by_key(|event| event.timestamp);
        Self { events }
    }

    /// Reads a log from CSV data with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be decoded or carries an invalid
    /// timestamp, group, action or count.
    pub fn from_csv_reader<R>(reader: R) -> Result<Self, LoadEventError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut events = vec![];
        for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
            let record = idx + 1;
            let raw = result.map_err(|source| LoadEventError::Csv { record, source })?;
            events.push(raw.into_event(record)?);
        }
        Ok(Self::new(events))
    }

    #[must_use]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Days that contain at least one event, ascending.
    #[must_use]
    pub fn days(&self) -> BTreeSet<NaiveDate> {
        self.events.iter().map(LogEvent::day).collect()
    }
}

impl FromIterator<LogEvent> for EventLog {
    fn from_iter<T: IntoIterator<Item = LogEvent>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
