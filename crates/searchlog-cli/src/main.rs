mod chart;
mod command;
mod table;
mod tui;
mod util;

fn main() -> anyhow::Result<()> {
    util::init_tracing();
    command::run()
}
