//! `wayfinder`: replays a scripted navigation session on a headless stage.

mod script;
mod session;

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use wayfinder::domain::config::{AppConfig, LoggingConfig};
use wayfinder::domain::constants::APP_NAME;
use wayfinder::kernel::config::load_app_config;
use wf_logger::{Logger, parse_level};

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version, about = "Replays a navigation session through the catalog, detail and checkout features")]
struct Cli {
    /// Configuration file; `WAYFINDER__*` variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Intent script, one intent per line. A built-in session runs without it.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print the session report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Time coordinators get to react between intents.
    #[arg(long, default_value_t = 20)]
    settle_ms: u64,

    /// Log coordinator spans opening and closing.
    #[arg(long)]
    spans: bool,
}

#[wf_runtime::main(interactive)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config: AppConfig = load_app_config(cli.config.as_ref()).context("Failed to load configuration")?;
    let _logger = init_logger(&config.logging, cli.spans)?;

    let script = match &cli.script {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => script::DEFAULT_SCRIPT.to_owned(),
    };
    let intents = script::parse(&script)?;

    let app = wayfinder::bootstrap(&config)?;
    let report = session::replay(&app, &intents, Duration::from_millis(cli.settle_ms)).await;
    info!(
        completed = report.completed,
        purchases = report.purchases,
        orders = report.orders.len(),
        skipped = report.skipped.len(),
        "Session finished"
    );

    if cli.json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    }

    Ok(())
}

fn init_logger(config: &LoggingConfig, spans: bool) -> anyhow::Result<Logger> {
    let builder = Logger::builder().name(APP_NAME).console(true).level(parse_level(&config.level)?).span_events(spans);

    let logger = match &config.directory {
        Some(directory) if config.json => builder.path(directory).json().init()?,
        Some(directory) => builder.path(directory).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
