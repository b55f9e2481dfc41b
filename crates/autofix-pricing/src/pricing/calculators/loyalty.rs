use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::pricing::clock::{Clock, LookbackWindow};
use crate::pricing::domain::{EngineType, VehicleId};
use crate::pricing::rules::RuleBook;
use crate::pricing::source::RepairHistory;
use crate::pricing::PricingError;

/// Discount rewarding repeat visits within the trailing year.
pub struct LoyaltyDiscountCalculator<H, C> {
    history: Arc<H>,
    clock: Arc<C>,
    rules: Arc<RuleBook>,
}

impl<H, C> LoyaltyDiscountCalculator<H, C>
where
    H: RepairHistory,
    C: Clock,
{
    pub fn new(history: Arc<H>, clock: Arc<C>, rules: Arc<RuleBook>) -> Self {
        Self {
            history,
            clock,
            rules,
        }
    }

    /// Parses `engine_type` before evaluating; unknown names are invalid input.
    pub fn determine(
        &self,
        vehicle_id: VehicleId,
        engine_type: &str,
    ) -> Result<Decimal, PricingError> {
        let engine_type: EngineType = engine_type.parse()?;
        self.determine_for(vehicle_id, engine_type)
    }

    pub fn determine_for(
        &self,
        vehicle_id: VehicleId,
        engine_type: EngineType,
    ) -> Result<Decimal, PricingError> {
        let repairs = self.repairs_in_window(vehicle_id, self.clock.today())?;
        self.evaluate(engine_type, repairs)
    }

    pub fn evaluate(&self, engine_type: EngineType, repairs: u32) -> Result<Decimal, PricingError> {
        let percentage = self.rules.loyalty.evaluate(engine_type, repairs)?;
        Ok(percentage)
    }

    /// Repairs in the year ending on `today`, inclusive.
    pub fn repairs_in_window(
        &self,
        vehicle_id: VehicleId,
        today: NaiveDate,
    ) -> Result<u32, PricingError> {
        let window = LookbackWindow::trailing_year(today);
        self.history
            .count_repairs(vehicle_id, window)?
            .ok_or(PricingError::NotFound(vehicle_id))
    }
}
