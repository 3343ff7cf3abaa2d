//! Session-length distributions
//!
//! Prints the share of sessions ending with a given number of results that
//! fall in each session-length bin, the per-group session-length
//! distribution, and summary statistics of session lengths.

use std::{collections::BTreeMap, io::Write, path::PathBuf};

use searchlog_analysis::{
    event::Group,
    session::{
        self, SessionLengthBins, SessionLengthDistribution, SessionLengthSummary, SessionRecord,
    },
};
use serde::Serialize;

use crate::{
    table::{self, Table},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SessionsArg {
    /// Search log CSV file
    log: PathBuf,
    /// Ending result count of the sessions to bucket
    #[arg(long, default_value_t = 20)]
    n_results: u32,
    /// Session-length bin edges in seconds (comma-separated, ascending)
    #[arg(long, value_delimiter = ',')]
    bins: Option<Vec<f64>>,
    /// Emit JSON instead of text tables
    #[arg(long)]
    json: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Resolves `--bins`, falling back to the default session-length bins.
pub(crate) fn session_bins(edges: Option<&[f64]>) -> anyhow::Result<SessionLengthBins> {
    match edges {
        Some(edges) => Ok(SessionLengthBins::new(edges.to_vec())?),
        None => Ok(SessionLengthBins::default()),
    }
}

#[derive(Debug, Clone, Serialize)]
struct SessionsReport {
    sessions: usize,
    n_results: u32,
    with_n_results: SessionLengthDistribution,
    by_group: BTreeMap<Group, SessionLengthDistribution>,
    summaries: Vec<SessionLengthSummary>,
}

impl SessionsReport {
    fn new(sessions: &[SessionRecord], n_results: u32, bins: &SessionLengthBins) -> Self {
        Self {
            sessions: sessions.len(),
            n_results,
            with_n_results: session::sessions_with_n_results(sessions, n_results, bins),
            by_group: session::session_length_by_group(sessions, bins),
            summaries: session::summarize_session_lengths(sessions),
        }
    }

    fn write_text<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: Write + ?Sized,
    {
        table::write_heading(writer, &format!("Session Lengths ({} sessions)", self.sessions))?;
        writeln!(writer)?;

        writeln!(
            writer,
            "Sessions ending with {} results ({} sessions)",
            self.n_results, self.with_n_results.total_sessions
        )?;
        let mut dist = Table::new(["Length (s)", "Sessions", "Share"]);
        for bin in &self.with_n_results.bins {
            dist.push_row([
                bin.label(),
                bin.count.to_string(),
                util::percent(Some(bin.fraction)),
            ]);
        }
        dist.write_to(writer)?;
        writeln!(writer)?;

        writeln!(writer, "Sessions by group")?;
        let mut by_group = Table::new(["Length (s)", "a", "a share", "b", "b share"]);
        let reference = self.by_group.values().next();
        for (i, bin) in reference.into_iter().flat_map(|d| d.bins.iter()).enumerate() {
            let mut row = vec![bin.label()];
            for group in Group::ALL {
                match self.by_group.get(&group).and_then(|d| d.bins.get(i)) {
                    Some(bin) => {
                        row.push(bin.count.to_string());
                        row.push(util::percent(Some(bin.fraction)));
                    }
                    None => row.extend(["-".to_string(), "-".to_string()]),
                }
            }
            by_group.push_row(row);
        }
        by_group.write_to(writer)?;
        writeln!(writer)?;

        writeln!(writer, "Session length statistics (seconds)")?;
        let mut summaries = Table::new([
            "Group", "Sessions", "Mean", "Median", "Min", "P25", "P75", "P90", "Max",
        ]);
        for summary in &self.summaries {
            summaries.push_row([
                summary
                    .group
                    .map_or_else(|| "all".to_string(), |g| g.to_string()),
                summary.count.to_string(),
                format!("{:.1}", summary.mean),
                format!("{:.0}", summary.median),
                format!("{:.0}", summary.min),
                format!("{:.0}", summary.p25),
                format!("{:.0}", summary.p75),
                format!("{:.0}", summary.p90),
                format!("{:.0}", summary.max),
            ]);
        }
        summaries.write_to(writer)
    }
}

pub(crate) fn run(arg: &SessionsArg) -> anyhow::Result<()> {
    let bins = session_bins(arg.bins.as_deref())?;
    let log = util::read_event_log(&arg.log)?;
    let sessions = SessionRecord::collect(&log);
    tracing::info!(sessions = sessions.len(), "Collected sessions");

    let report = SessionsReport::new(&sessions, arg.n_results, &bins);
    if report.with_n_results.total_sessions == 0 {
        tracing::warn!(
            "No session ends with {} results; every share is zero",
            arg.n_results
        );
    }

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    if arg.json {
        output.write_json(&report)?;
    } else {
        report.write_text(&mut output)?;
        output.finish()?;
    }
    Ok(())
}
