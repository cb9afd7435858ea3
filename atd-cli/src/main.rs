//! ATD CLI - Command line tool for querying airport traffic statistics.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "atd-cli",
    version,
    about = "Airport traffic dashboard queries over Eurocontrol daily flight data"
)]
struct Cli {
    #[command(flatten)]
    config: atd_cmd::DashboardConfig,

    #[command(subcommand)]
    command: atd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[ATD] cli: running {:?}", cli.command);
    atd_cmd::run(&cli.config, cli.command)
}
