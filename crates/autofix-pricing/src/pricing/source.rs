use super::clock::LookbackWindow;
use super::domain::{VehicleId, VehicleProfile};

/// Vehicle attribute lookup so calculators can be exercised without storage.
pub trait VehicleDirectory: Send + Sync {
    fn profile(&self, id: VehicleId) -> Result<Option<VehicleProfile>, SourceError>;
}

/// Repair history lookup. `None` means the vehicle is unknown to the source.
pub trait RepairHistory: Send + Sync {
    fn count_repairs(
        &self,
        id: VehicleId,
        window: LookbackWindow,
    ) -> Result<Option<u32>, SourceError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read source data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
}
