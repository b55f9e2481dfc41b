use std::sync::Arc;

use rust_decimal::Decimal;

use super::fetch_profile;
use crate::pricing::domain::{VehicleId, VehicleProfile};
use crate::pricing::rules::RuleBook;
use crate::pricing::source::VehicleDirectory;
use crate::pricing::PricingError;

/// Surcharge driven by odometer reading, one table per vehicle category.
pub struct MileageChargeCalculator<V> {
    vehicles: Arc<V>,
    rules: Arc<RuleBook>,
}

impl<V> MileageChargeCalculator<V>
where
    V: VehicleDirectory,
{
    pub fn new(vehicles: Arc<V>, rules: Arc<RuleBook>) -> Self {
        Self { vehicles, rules }
    }

    pub fn determine(&self, vehicle_id: VehicleId) -> Result<Decimal, PricingError> {
        let profile = fetch_profile(self.vehicles.as_ref(), vehicle_id)?;
        self.evaluate(&profile)
    }

    pub fn evaluate(&self, profile: &VehicleProfile) -> Result<Decimal, PricingError> {
        let percentage = self.rules.mileage.evaluate(profile.category, profile.mileage)?;
        Ok(percentage)
    }
}
