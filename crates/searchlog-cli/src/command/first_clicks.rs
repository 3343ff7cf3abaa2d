//! Per-day first click positions
//!
//! Prints, for each day, how many sessions first clicked the result at each
//! position. Rows are positions, columns are days.

use std::{collections::BTreeSet, io::Write, path::PathBuf};

use searchlog_analysis::first_click::{self, DailyFirstClickCounts};

use crate::{
    table::{self, Table},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FirstClicksArg {
    /// Search log CSV file
    log: PathBuf,
    /// Number of lowest result positions to keep per day
    #[arg(long, default_value_t = 20)]
    top: usize,
    /// Emit JSON instead of a text table
    #[arg(long)]
    json: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn write_text<W>(writer: &mut W, per_day: &[DailyFirstClickCounts]) -> std::io::Result<()>
where
    W: Write + ?Sized,
{
    table::write_heading(writer, "First Click Position By Day")?;
    writeln!(writer)?;

    let positions = per_day
        .iter()
        .flat_map(|day| day.counts.iter().map(|&(position, _)| position))
        .collect::<BTreeSet<_>>();
    let mut table = Table::new(
        std::iter::once("Position".to_string())
            .chain(per_day.iter().map(|day| day.day.format("%m-%d").to_string())),
    );
    for position in positions {
        let mut row = vec![position.to_string()];
        for day in per_day {
            let count = day
                .counts
                .iter()
                .find(|&&(p, _)| p == position)
                .map_or_else(|| "-".to_string(), |&(_, count)| count.to_string());
            row.push(count);
        }
        table.push_row(row);
    }
    table.write_to(writer)
}

pub(crate) fn run(arg: &FirstClicksArg) -> anyhow::Result<()> {
    let log = util::read_event_log(&arg.log)?;
    let clicks = first_click::first_clicks(&log);
    tracing::info!(sessions = clicks.len(), "Collected first clicks");
    let per_day = DailyFirstClickCounts::per_day(&clicks, arg.top);

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    if arg.json {
        output.write_json(&per_day)?;
    } else {
        write_text(&mut output, &per_day)?;
        output.finish()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_pivot_table() {
        let per_day = vec![
            DailyFirstClickCounts {
                day: NaiveDate::from_ymd_opt(2016, 3, 1).unwrap(),
                counts: vec![(1, 10), (2, 4)],
            },
            DailyFirstClickCounts {
                day: NaiveDate::from_ymd_opt(2016, 3, 2).unwrap(),
                counts: vec![(1, 7), (5, 1)],
            },
        ];
        let mut buf = vec![];
        write_text(&mut buf, &per_day).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[3], "  Position 03-01 03-02");
        assert_eq!(lines[5], "  1           10     7");
        assert_eq!(lines[6], "  2            4     -");
        assert_eq!(lines[7], "  5            -     1");
    }
}
