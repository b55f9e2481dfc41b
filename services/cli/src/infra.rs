use autofix_pricing::config::DataConfig;
use autofix_pricing::error::AppError;
use autofix_pricing::pricing::{RepairLedger, RuleBook, VehicleRegistry};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Standard rules unless a rule book path is supplied on the command line or in config.
pub(crate) fn load_rules(
    override_path: Option<PathBuf>,
    data: &DataConfig,
) -> Result<Arc<RuleBook>, AppError> {
    match override_path.or_else(|| data.rules_path.clone()) {
        Some(path) => {
            let book = RuleBook::from_path(&path)?;
            info!(path = %path.display(), "loaded rule book");
            Ok(Arc::new(book))
        }
        None => Ok(RuleBook::standard()?),
    }
}

pub(crate) fn load_sources(
    vehicles_csv: Option<PathBuf>,
    repairs_csv: Option<PathBuf>,
    data: &DataConfig,
) -> Result<(VehicleRegistry, RepairLedger), AppError> {
    let vehicles_csv = vehicles_csv
        .or_else(|| data.vehicles_csv.clone())
        .ok_or(AppError::MissingInput("--vehicles or AUTOFIX_VEHICLES_CSV"))?;
    let repairs_csv = repairs_csv
        .or_else(|| data.repairs_csv.clone())
        .ok_or(AppError::MissingInput("--repairs or AUTOFIX_REPAIRS_CSV"))?;

    let registry = VehicleRegistry::from_path(&vehicles_csv)?;
    let ledger = RepairLedger::from_path(&repairs_csv, registry.ids())?;
    info!(
        vehicles = registry.len(),
        path = %vehicles_csv.display(),
        "loaded vehicle registry"
    );

    Ok((registry, ledger))
}
