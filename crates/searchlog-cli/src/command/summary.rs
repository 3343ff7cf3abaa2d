//! Daily search counts and average rates
//!
//! Prints searches per day (overall and per group) and the average daily
//! click-through and zero results rates, ungrouped and per group.

use std::{io::Write, path::PathBuf};

use chrono::NaiveDate;
use searchlog_analysis::{
    daily,
    event::{EventLog, Group},
    rate::RateReport,
};
use serde::Serialize;

use crate::{
    table::{self, Table},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummaryArg {
    /// Search log CSV file
    log: PathBuf,
    /// Emit JSON instead of text tables
    #[arg(long)]
    json: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct DayCount {
    day: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<Group>,
    searches: u64,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryReport {
    events: usize,
    days: usize,
    searches_per_day: Vec<DayCount>,
    searches_per_day_by_group: Vec<DayCount>,
    click_through: RateReport,
    zero_results: RateReport,
}

impl SummaryReport {
    fn new(log: &EventLog) -> Self {
        let searches_per_day = daily::searches_per_day(log)
            .into_iter()
            .map(|(day, searches)| DayCount {
                day,
                group: None,
                searches,
            })
            .collect();
        let searches_per_day_by_group = daily::searches_per_day_by_group(log)
            .into_iter()
            .map(|((day, group), searches)| DayCount {
                day,
                group: Some(group),
                searches,
            })
            .collect();
        Self {
            events: log.len(),
            days: log.days().len(),
            searches_per_day,
            searches_per_day_by_group,
            click_through: RateReport::click_through(log),
            zero_results: RateReport::zero_results(log),
        }
    }

    fn write_text<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: Write + ?Sized,
    {
        table::write_heading(
            writer,
            &format!("Search Log Summary ({} events, {} days)", self.events, self.days),
        )?;
        writeln!(writer)?;

        writeln!(writer, "Searches per day")?;
        let mut searches = Table::new(["Day", "All", "Group a", "Group b"]);
        for count in &self.searches_per_day {
            let by_group = |group| {
                self.searches_per_day_by_group
                    .iter()
                    .find(|c| c.day == count.day && c.group == Some(group))
                    .map_or_else(|| "0".to_string(), |c| c.searches.to_string())
            };
            searches.push_row([
                count.day.to_string(),
                count.searches.to_string(),
                by_group(Group::A),
                by_group(Group::B),
            ]);
        }
        searches.write_to(writer)?;
        writeln!(writer)?;

        for report in [&self.click_through, &self.zero_results] {
            write_rate_report(writer, report)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

fn write_rate_report<W>(writer: &mut W, report: &RateReport) -> std::io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "Average daily {}", report.name)?;
    let mut averages = Table::new(["Group", "Average"]);
    averages.push_row(["ungrouped".to_string(), util::percent(report.overall)]);
    for group in Group::ALL {
        averages.push_row([
            format!("group {group}"),
            util::percent(report.by_group.get(&group).copied()),
        ]);
    }
    averages.write_to(writer)?;

    let mut daily = Table::new(["Day", "Group", "Numerator", "Denominator", "Ratio"]);
    for rate in report.daily.iter().chain(&report.daily_by_group) {
        daily.push_row([
            rate.day.to_string(),
            rate.group.map_or_else(|| "all".to_string(), |g| g.to_string()),
            rate.numerator.to_string(),
            rate.denominator.to_string(),
            util::percent(rate.ratio()),
        ]);
    }
    writeln!(writer)?;
    daily.write_to(writer)
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let log = util::read_event_log(&arg.log)?;
    let report = SummaryReport::new(&log);

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    if arg.json {
        output.write_json(&report)?;
    } else {
        report.write_text(&mut output)?;
        output.finish()?;
    }
    tracing::debug!("Summary written to {}", output.display_path());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
timestamp,session_id,group,action,n_results,result_position
20160301090000,s1,a,searchResultPage,3,
20160301090010,s1,a,visitPage,,1
20160301100000,s2,b,searchResultPage,0,
20160302090000,s3,a,searchResultPage,0,
20160302090500,s3,a,searchResultPage,5,
";

    fn report() -> SummaryReport {
        SummaryReport::new(&EventLog::from_csv_reader(LOG.as_bytes()).unwrap())
    }

    #[test]
    fn test_summary_report() {
        let report = report();
        assert_eq!(report.events, 5);
        assert_eq!(report.days, 2);
        assert_eq!(report.searches_per_day.len(), 2);
        assert_eq!(report.searches_per_day[1].searches, 2);
        assert_eq!(report.searches_per_day_by_group.len(), 3);
        // Day 1: 1/2, day 2: 0/2
        assert_eq!(report.click_through.overall, Some(0.25));
    }

    #[test]
    fn test_summary_text() {
        let mut buf = vec![];
        report().write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Search Log Summary (5 events, 2 days)"));
        assert!(text.contains("Average daily click-through rate"));
        assert!(text.contains("Average daily zero results rate"));
        assert!(text.contains("2016-03-02"));
        assert!(text.contains("group b"));
    }

    #[test]
    fn test_summary_json() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["events"], 5);
        assert_eq!(json["click_through"]["by_group"]["a"], 0.5);
        assert_eq!(json["searches_per_day_by_group"][0]["group"], "a");
        assert!(json["searches_per_day"][0].get("group").is_none());
    }
}
