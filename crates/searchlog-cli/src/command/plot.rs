//! Terminal charts of the search log
//!
//! Without `--print` the charts open in an interactive viewer; with it they
//! are rendered at a fixed size and written to stdout as text.

use std::{io::Write as _, path::PathBuf};

use searchlog_analysis::{
    event::EventLog,
    first_click::{self, DailyFirstClickCounts},
    rate,
    session::{self, SessionLengthDistribution, SessionRecord},
};

use super::sessions;
use crate::{
    chart::{self, Chart},
    tui,
    util::{self, Output},
};

const DEFAULT_FIRST_CLICK_Y_MAX: u64 = 2500;
const DEFAULT_SESSION_SHARE_Y_MAX: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ChartKind {
    /// Average daily click-through rate by group
    Ctr,
    /// Average daily zero results rate by group
    ZeroRate,
    /// First clicked result position per day
    FirstClicks,
    /// Session-length shares of group a and group b
    SessionLength,
    /// Session-length counts of both groups
    SessionCounts,
}

impl ChartKind {
    const ALL: [Self; 5] = [
        Self::Ctr,
        Self::ZeroRate,
        Self::FirstClicks,
        Self::SessionLength,
        Self::SessionCounts,
    ];
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlotArg {
    /// Search log CSV file
    pub(crate) log: PathBuf,
    /// Chart to draw (every chart if omitted)
    #[arg(value_enum)]
    pub(crate) chart: Option<ChartKind>,
    /// Print the charts as text instead of opening the viewer
    #[arg(long)]
    pub(crate) print: bool,
    /// Width of printed charts
    #[arg(long, default_value_t = 100)]
    pub(crate) width: u16,
    /// Height of printed charts
    #[arg(long, default_value_t = 30)]
    pub(crate) height: u16,
    /// Number of lowest result positions shown per day
    #[arg(long, default_value_t = 20)]
    pub(crate) top: usize,
    /// Only include sessions ending with this many results in session charts
    #[arg(long)]
    pub(crate) n_results: Option<u32>,
    /// Session-length bin edges in seconds (comma-separated, ascending)
    #[arg(long, value_delimiter = ',')]
    pub(crate) bins: Option<Vec<f64>>,
    /// Y-axis maximum (first-click count, or session share as a fraction)
    #[arg(long)]
    pub(crate) y_max: Option<f64>,
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_y_max(y_max: Option<f64>) -> u64 {
    y_max.map_or(DEFAULT_FIRST_CLICK_Y_MAX, |y| y.max(0.0).round() as u64)
}

fn build_chart(
    kind: ChartKind,
    log: &EventLog,
    sessions: &[SessionRecord],
    arg: &PlotArg,
) -> anyhow::Result<Chart> {
    let chart = match kind {
        ChartKind::Ctr => Chart::Rate {
            title: "Average daily click-through rate".to_string(),
            by_group: rate::average_click_through_rate_by_group(log),
            ungrouped: rate::average_click_through_rate(log),
        },
        ChartKind::ZeroRate => Chart::Rate {
            title: "Average daily zero results rate".to_string(),
            by_group: rate::average_zero_rate_by_group(log),
            ungrouped: rate::average_zero_rate(log),
        },
        ChartKind::FirstClicks => {
            let clicks = first_click::first_clicks(log);
            let days = DailyFirstClickCounts::per_day(&clicks, arg.top);
            let y_max = count_y_max(arg.y_max);
            let peak = days.iter().map(DailyFirstClickCounts::max_count).max();
            if peak.is_some_and(|peak| peak > y_max) {
                tracing::warn!(?peak, y_max, "First-click bars exceed the y-axis maximum");
            }
            Chart::FirstClicks { days, y_max }
        }
        ChartKind::SessionLength | ChartKind::SessionCounts => {
            let bins = sessions::session_bins(arg.bins.as_deref())?;
            let by_group = session::session_length_by_group(sessions, &bins);
            if kind == ChartKind::SessionLength {
                let y_max = arg.y_max.unwrap_or(DEFAULT_SESSION_SHARE_Y_MAX);
                let peak = by_group
                    .values()
                    .map(SessionLengthDistribution::max_fraction)
                    .fold(0.0, f64::max);
                if peak > y_max {
                    tracing::warn!(peak, y_max, "Session share bars exceed the y-axis maximum");
                }
                Chart::SessionLength {
                    title: "Percentage Of Sessions By Session Length".to_string(),
                    by_group,
                    y_max,
                }
            } else {
                Chart::SessionCounts { by_group }
            }
        }
    };
    Ok(chart)
}

fn build_charts(log: &EventLog, arg: &PlotArg) -> anyhow::Result<Vec<Chart>> {
    let sessions = SessionRecord::collect(log)
        .into_iter()
        .filter(|s| arg.n_results.is_none_or(|n| s.n_results_end == Some(n)))
        .collect::<Vec<_>>();
    tracing::info!(sessions = sessions.len(), "Collected sessions for charts");

    let kinds = match arg.chart {
        Some(kind) => vec![kind],
        None => ChartKind::ALL.to_vec(),
    };
    kinds
        .into_iter()
        .map(|kind| build_chart(kind, log, &sessions, arg))
        .collect()
}

pub(crate) fn run(arg: &PlotArg) -> anyhow::Result<()> {
    let log = util::read_event_log(&arg.log)?;
    let charts = build_charts(&log, arg)?;

    if arg.print {
        let mut output = Output::stdout();
        for chart in &charts {
            write!(
                output,
                "{}",
                chart::render_to_string(chart, arg.width, arg.height)
            )?;
        }
        output.finish()?;
    } else {
        tui::run(charts)?;
    }
    Ok(())
}
