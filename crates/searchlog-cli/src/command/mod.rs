use clap::{Parser, Subcommand};

use self::{
    first_clicks::FirstClicksArg, plot::PlotArg, sessions::SessionsArg, summary::SummaryArg,
};

mod first_clicks;
mod plot;
mod sessions;
mod summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute from the search log
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Daily searches, click-through rate and zero results rate
    Summary(#[clap(flatten)] SummaryArg),
    /// Session-length distributions
    Sessions(#[clap(flatten)] SessionsArg),
    /// Per-day counts of the first clicked result position
    FirstClicks(#[clap(flatten)] FirstClicksArg),
    /// Render charts in the terminal
    Plot(#[clap(flatten)] PlotArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Sessions(arg) => sessions::run(&arg)?,
        Mode::FirstClicks(arg) => first_clicks::run(&arg)?,
        Mode::Plot(arg) => plot::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_args_are_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_plot_defaults() {
        let args = CommandArgs::try_parse_from(["searchlog", "plot", "log.csv", "ctr"]).unwrap();
        let Mode::Plot(arg) = args.mode else {
            panic!("expected plot mode");
        };
        assert_eq!(arg.top, 20);
        assert!(!arg.print);
    }
}
