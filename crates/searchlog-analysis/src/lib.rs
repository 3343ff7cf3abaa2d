//! Search-log aggregation helpers
//!
//! This crate turns a table of search-log events into the small summaries
//! used to compare the two arms of an A/B test: searches per day,
//! click-through and zero-result rates, session-length distributions, and
//! first-click positions.
//!
//! # Overview
//!
//! 1. **Load Events** ([`event::EventLog`]): Read the CSV log into typed events ordered by time
//! 2. **Count Per Day** ([`daily`]): Count matching events per day, optionally per group
//! 3. **Average Rates** ([`rate`]): Average daily ratios of two counts
//! 4. **Sessions** ([`session::SessionRecord`]): Derive sessions and bucket their lengths
//! 5. **First Clicks** ([`first_click`]): Count the first visited result position per day
//!
//! Every helper is a pure function over a borrowed [`event::EventLog`] (or the
//! sessions derived from it) and returns a freshly built summary.
//!
//! # Examples
//!
//! ```
//! use searchlog_analysis::{event::{EventLog, Group}, rate};
//!
//! let csv = "timestamp,session_id,group,action,n_results\n\
//!            20160301000000,s1,a,searchResultPage,3\n\
//!            20160301000010,s1,a,visitPage,\n\
//!            20160301000000,s2,b,searchResultPage,0\n";
//! let log = EventLog::from_csv_reader(csv.as_bytes())?;
//!
//! let ctr = rate::average_click_through_rate_by_group(&log);
//! assert_eq!(ctr[&Group::A], 1.0);
//! assert_eq!(ctr[&Group::B], 0.0);
//!
//! let zero = rate::average_zero_rate(&log);
//! assert_eq!(zero, Some(0.5));
//! # Ok::<(), searchlog_analysis::event::LoadEventError>(())
//! ```

pub mod daily;
pub mod event;
pub mod first_click;
pub mod rate;
pub mod session;
