use crate::infra::{load_rules, load_sources, parse_date};
use autofix_pricing::config::AppConfig;
use autofix_pricing::error::AppError;
use autofix_pricing::pricing::{
    EngineType, FixedClock, PricingQuote, PricingService, RuleBook, RuleTable, SystemClock,
    VehicleCategory, VehicleId,
};
use chrono::NaiveDate;
use clap::Args;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Vehicle to price
    #[arg(long)]
    pub(crate) vehicle_id: u64,
    /// Engine type (GASOLINE, DIESEL, HYBRID, ELECTRIC)
    #[arg(long)]
    pub(crate) engine_type: String,
    /// Vehicle export CSV (vehicle_id,category,mileage,manufacture_year)
    #[arg(long)]
    pub(crate) vehicles: Option<PathBuf>,
    /// Repair export CSV (vehicle_id,repaired_on)
    #[arg(long)]
    pub(crate) repairs: Option<PathBuf>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// JSON rule book replacing the standard tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Emit the quote as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RulesArgs {
    /// JSON rule book replacing the standard tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Emit the rule book as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_quote(args: QuoteArgs, config: &AppConfig) -> Result<(), AppError> {
    print!("{}", quote_output(args, config)?);
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs, config: &AppConfig) -> Result<(), AppError> {
    print!("{}", rules_output(args, config)?);
    Ok(())
}

fn quote_output(args: QuoteArgs, config: &AppConfig) -> Result<String, AppError> {
    let QuoteArgs {
        vehicle_id,
        engine_type,
        vehicles,
        repairs,
        today,
        rules,
        json,
    } = args;

    let rules = load_rules(rules, &config.data)?;
    let (registry, ledger) = load_sources(vehicles, repairs, &config.data)?;
    let vehicle_id = VehicleId(vehicle_id);

    let registry = Arc::new(registry);
    let ledger = Arc::new(ledger);
    let quote = match today {
        Some(today) => PricingService::new(registry, ledger, Arc::new(FixedClock(today)), rules)
            .quote(vehicle_id, &engine_type)?,
        None => PricingService::new(registry, ledger, Arc::new(SystemClock), rules)
            .quote(vehicle_id, &engine_type)?,
    };

    if json {
        Ok(format!("{}\n", to_json(&quote)?))
    } else {
        Ok(render_quote(&quote))
    }
}

fn rules_output(args: RulesArgs, config: &AppConfig) -> Result<String, AppError> {
    let book = load_rules(args.rules, &config.data)?;
    if args.json {
        Ok(format!("{}\n", to_json(book.as_ref())?))
    } else {
        Ok(render_rules(&book))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    Ok(json)
}

fn render_quote(quote: &PricingQuote) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Vehicle {} ({}, {}) evaluated {}\n",
        quote.vehicle_id, quote.category, quote.engine_type, quote.evaluated_on
    ));
    out.push_str(&format!("- Mileage surcharge: {}%\n", quote.mileage_charge));
    out.push_str(&format!("- Antiquity surcharge: {}%\n", quote.antiquity_charge));
    out.push_str(&format!(
        "- Loyalty discount: {}% ({} repair(s) in the last year)\n",
        quote.loyalty_discount, quote.repairs_in_window
    ));
    out
}

fn render_rules(book: &RuleBook) -> String {
    let mut out = String::new();
    render_table(
        &mut out,
        "Mileage surcharge (km)",
        &book.mileage,
        VehicleCategory::ordered(),
    );
    render_table(
        &mut out,
        "Antiquity surcharge (years)",
        &book.antiquity,
        VehicleCategory::ordered(),
    );
    render_table(
        &mut out,
        "Loyalty discount (repairs in last year)",
        &book.loyalty,
        EngineType::ordered(),
    );
    out
}

fn render_table<K, const N: usize>(
    out: &mut String,
    title: &str,
    table: &RuleTable<K>,
    keys: [K; N],
) where
    K: Ord + Copy + Display,
{
    out.push_str(title);
    out.push('\n');
    for key in keys {
        let Some(brackets) = table.brackets(key) else {
            continue;
        };
        let ranges: Vec<String> = brackets
            .iter()
            .map(|bracket| match bracket.upper {
                Some(upper) => format!("{}-{}: {}%", bracket.lower, upper, bracket.percentage),
                None => format!("{}+: {}%", bracket.lower, bracket.percentage),
            })
            .collect();
        out.push_str(&format!("- {}: {}\n", key, ranges.join(", ")));
    }
    out.push('\n');
}
