mod commands;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::commands::Cli;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GWGEN_LOG";

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose());
    cli.run()
}

/// Log to stderr. `--verbose` forces debug, otherwise `GWGEN_LOG` or warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
