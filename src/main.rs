use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shelfsearch::cli::{
    run_clear, run_index, run_interactive, run_search, run_stats, Args, Command,
};
use shelfsearch::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate()?;

    match args.command.unwrap_or(Command::Interactive) {
        Command::Index { force } => run_index(&config, force).await,
        Command::Search {
            query,
            top_k,
            document,
            json,
        } => run_search(&config, &query, top_k, document.as_deref(), json).await,
        Command::Stats { json } => run_stats(&config, json).await,
        Command::Clear => run_clear(&config).await,
        Command::Interactive => run_interactive(&config).await,
    }
}

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "shelfsearch=debug"
    } else {
        "shelfsearch=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
