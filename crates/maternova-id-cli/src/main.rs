//! `maternova-id`: issue, reconcile and inspect patient identifiers held in a
//! JSON-lines ledger.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;
mod config;
mod ledger;
mod telemetry;

use clap::Parser;
use config::{AppConfig, CliArgs, Command};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry(config.log_format)?;

    if cfg!(debug_assertions) {
        tracing::debug!("Starting with full config: {:#?}", config);
    }

    match config.command {
        Command::Login(new) => {
            let outcome = commands::login(&config.ledger, config.authority, new)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Reconcile => {
            let report = commands::reconcile_ledger(&config.ledger, config.authority)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_clean() {
                tracing::warn!(
                    skipped = report.skipped.len(),
                    ledger = %config.ledger.display(),
                    "ledger holds malformed identifiers"
                );
            }
        }
        Command::Inspect(ids) => {
            for id in &ids {
                println!("{}", serde_json::to_string(&commands::inspect(id))?);
            }
        }
    }

    Ok(())
}
