//! Surcharge and loyalty discount evaluation for repair pricing.
//!
//! Vehicle attributes and repair history come from collaborators behind the
//! [`VehicleDirectory`] and [`RepairHistory`] traits; the percentages come from
//! a validated [`RuleBook`]. How the percentages combine with a base repair
//! cost is left to the billing caller.

mod calculators;
mod clock;
mod domain;
mod registry;
mod rules;
mod service;
mod source;
mod table;

#[cfg(test)]
mod tests;

pub use calculators::{
    AntiquityChargeCalculator, LoyaltyDiscountCalculator, MileageChargeCalculator,
};
pub use clock::{Clock, FixedClock, LookbackWindow, SystemClock};
pub use domain::{EngineType, VehicleCategory, VehicleId, VehicleProfile};
pub use registry::{RepairLedger, VehicleRegistry};
pub use rules::{RuleBook, RuleBookError};
pub use service::{PricingQuote, PricingService};
pub use source::{RepairHistory, SourceError, VehicleDirectory};
pub use table::{Bracket, RuleTable, RuleTableError};

/// Error raised while evaluating a surcharge or discount.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("vehicle {0} not found")]
    NotFound(VehicleId),
    #[error("invalid {field}: '{value}'")]
    InvalidInput { field: &'static str, value: String },
    #[error("vehicle {vehicle_id} has manufacture year {manufacture_year} after {current_year}")]
    FutureManufactureYear {
        vehicle_id: VehicleId,
        manufacture_year: i32,
        current_year: i32,
    },
    #[error("rule configuration error: {0}")]
    Configuration(#[from] RuleTableError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
