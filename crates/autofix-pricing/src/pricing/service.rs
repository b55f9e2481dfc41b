use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::calculators::{
    fetch_profile, AntiquityChargeCalculator, LoyaltyDiscountCalculator, MileageChargeCalculator,
};
use super::clock::Clock;
use super::domain::{EngineType, VehicleCategory, VehicleId};
use super::rules::RuleBook;
use super::source::{RepairHistory, VehicleDirectory};
use super::PricingError;

/// Service composing the three calculators over shared collaborators.
pub struct PricingService<V, H, C> {
    vehicles: Arc<V>,
    clock: Arc<C>,
    mileage: MileageChargeCalculator<V>,
    antiquity: AntiquityChargeCalculator<V, C>,
    loyalty: LoyaltyDiscountCalculator<H, C>,
}

/// Percentages applicable to one vehicle on one evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingQuote {
    pub vehicle_id: VehicleId,
    pub category: VehicleCategory,
    pub engine_type: EngineType,
    pub evaluated_on: NaiveDate,
    pub repairs_in_window: u32,
    pub mileage_charge: Decimal,
    pub antiquity_charge: Decimal,
    pub loyalty_discount: Decimal,
}

impl<V, H, C> PricingService<V, H, C>
where
    V: VehicleDirectory + 'static,
    H: RepairHistory + 'static,
    C: Clock + 'static,
{
    pub fn new(vehicles: Arc<V>, history: Arc<H>, clock: Arc<C>, rules: Arc<RuleBook>) -> Self {
        Self {
            mileage: MileageChargeCalculator::new(vehicles.clone(), rules.clone()),
            antiquity: AntiquityChargeCalculator::new(
                vehicles.clone(),
                clock.clone(),
                rules.clone(),
            ),
            loyalty: LoyaltyDiscountCalculator::new(history, clock.clone(), rules),
            vehicles,
            clock,
        }
    }

    pub fn mileage_charge(&self, vehicle_id: VehicleId) -> Result<Decimal, PricingError> {
        let result = self.mileage.determine(vehicle_id);
        trace_outcome("mileage_charge", vehicle_id, &result);
        result
    }

    pub fn antiquity_charge(&self, vehicle_id: VehicleId) -> Result<Decimal, PricingError> {
        let result = self.antiquity.determine(vehicle_id);
        trace_outcome("antiquity_charge", vehicle_id, &result);
        result
    }

    pub fn loyalty_discount(
        &self,
        vehicle_id: VehicleId,
        engine_type: &str,
    ) -> Result<Decimal, PricingError> {
        let result = self.loyalty.determine(vehicle_id, engine_type);
        trace_outcome("loyalty_discount", vehicle_id, &result);
        result
    }

    /// Evaluate every rule for a vehicle against the same evaluation date.
    ///
    /// The clock is read once and the profile and repair count are fetched
    /// once, so every field of the quote describes the same snapshot.
    pub fn quote(
        &self,
        vehicle_id: VehicleId,
        engine_type: &str,
    ) -> Result<PricingQuote, PricingError> {
        let engine_type: EngineType = engine_type.parse()?;
        let profile = fetch_profile(self.vehicles.as_ref(), vehicle_id)?;
        let today = self.clock.today();
        let repairs = self.loyalty.repairs_in_window(vehicle_id, today)?;

        let mileage_charge = self.mileage.evaluate(&profile);
        trace_outcome("mileage_charge", vehicle_id, &mileage_charge);
        let antiquity_charge = self.antiquity.evaluate(&profile, today.year());
        trace_outcome("antiquity_charge", vehicle_id, &antiquity_charge);
        let loyalty_discount = self.loyalty.evaluate(engine_type, repairs);
        trace_outcome("loyalty_discount", vehicle_id, &loyalty_discount);

        let quote = PricingQuote {
            vehicle_id,
            category: profile.category,
            engine_type,
            evaluated_on: today,
            repairs_in_window: repairs,
            mileage_charge: mileage_charge?,
            antiquity_charge: antiquity_charge?,
            loyalty_discount: loyalty_discount?,
        };

        debug!(
            vehicle = %vehicle_id,
            category = %quote.category,
            engine = %engine_type,
            mileage = %quote.mileage_charge,
            antiquity = %quote.antiquity_charge,
            loyalty = %quote.loyalty_discount,
            "pricing quote assembled"
        );

        Ok(quote)
    }
}

fn trace_outcome(
    rule: &'static str,
    vehicle_id: VehicleId,
    result: &Result<Decimal, PricingError>,
) {
    match result {
        Ok(percentage) => debug!(rule, vehicle = %vehicle_id, %percentage, "rule evaluated"),
        Err(PricingError::NotFound(_)) => warn!(rule, vehicle = %vehicle_id, "vehicle not found"),
        Err(err) => warn!(rule, vehicle = %vehicle_id, error = %err, "rule evaluation failed"),
    }
}
