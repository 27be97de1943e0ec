use clap::Parser;
use navroute::cli::{run_cli, Cli};
use navroute::telemetry::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.with_level("debug");
    } else if std::env::var("NAVR_LOG_LEVEL").is_err() {
        log_config = log_config.with_level("warn");
    }
    init_logging(&log_config)?;
    run_cli(cli)
}
