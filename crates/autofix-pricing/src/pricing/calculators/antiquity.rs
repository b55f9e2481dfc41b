use std::sync::Arc;

use rust_decimal::Decimal;

use super::fetch_profile;
use crate::pricing::clock::Clock;
use crate::pricing::domain::{VehicleId, VehicleProfile};
use crate::pricing::rules::RuleBook;
use crate::pricing::source::VehicleDirectory;
use crate::pricing::PricingError;

/// Surcharge driven by vehicle age in whole calendar years.
pub struct AntiquityChargeCalculator<V, C> {
    vehicles: Arc<V>,
    clock: Arc<C>,
    rules: Arc<RuleBook>,
}

impl<V, C> AntiquityChargeCalculator<V, C>
where
    V: VehicleDirectory,
    C: Clock,
{
    pub fn new(vehicles: Arc<V>, clock: Arc<C>, rules: Arc<RuleBook>) -> Self {
        Self {
            vehicles,
            clock,
            rules,
        }
    }

    pub fn determine(&self, vehicle_id: VehicleId) -> Result<Decimal, PricingError> {
        let profile = fetch_profile(self.vehicles.as_ref(), vehicle_id)?;
        self.evaluate(&profile, self.clock.current_year())
    }

    /// Evaluate against an explicit year instead of reading the clock.
    pub fn evaluate(
        &self,
        profile: &VehicleProfile,
        current_year: i32,
    ) -> Result<Decimal, PricingError> {
        let age = profile.age_in(current_year)?;
        let percentage = self.rules.antiquity.evaluate(profile.category, age)?;
        Ok(percentage)
    }
}
