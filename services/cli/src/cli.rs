use crate::commands::{run_quote, run_rules, QuoteArgs, RulesArgs};
use autofix_pricing::config::AppConfig;
use autofix_pricing::error::AppError;
use autofix_pricing::telemetry;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "autofix-pricing",
    about = "Evaluate AutoFix repair surcharges and loyalty discounts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a vehicle: mileage and antiquity surcharges plus loyalty discount
    Quote(QuoteArgs),
    /// Print the active rule tables
    Rules(RulesArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Quote(args) => run_quote(args, &config),
        Command::Rules(args) => run_rules(args, &config),
    }
}
