use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::pricing::{
    AntiquityChargeCalculator, FixedClock, LoyaltyDiscountCalculator, MileageChargeCalculator,
    LookbackWindow, PricingService, RepairHistory, RuleBook, SourceError, VehicleCategory,
    VehicleDirectory, VehicleId, VehicleProfile, VehicleRegistry,
};

pub(super) const VEHICLE: VehicleId = VehicleId(1);
pub(super) const MISSING: VehicleId = VehicleId(404);

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn current_year() -> i32 {
    2025
}

pub(super) fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(today()))
}

pub(super) fn rules() -> Arc<RuleBook> {
    RuleBook::standard().expect("standard rule book is valid")
}

pub(super) fn registry_with(
    category: VehicleCategory,
    mileage: u32,
    manufacture_year: i32,
) -> Arc<VehicleRegistry> {
    let mut registry = VehicleRegistry::default();
    registry.insert(VehicleProfile {
        id: VEHICLE,
        category,
        mileage,
        manufacture_year,
    });
    Arc::new(registry)
}

pub(super) fn mileage_calculator(
    category: VehicleCategory,
    mileage: u32,
) -> MileageChargeCalculator<VehicleRegistry> {
    MileageChargeCalculator::new(registry_with(category, mileage, 2015), rules())
}

pub(super) fn antiquity_calculator(
    category: VehicleCategory,
    age: i32,
) -> AntiquityChargeCalculator<VehicleRegistry, FixedClock> {
    AntiquityChargeCalculator::new(
        registry_with(category, 15_000, current_year() - age),
        clock(),
        rules(),
    )
}

pub(super) fn loyalty_calculator(
    repairs: u32,
) -> LoyaltyDiscountCalculator<StubHistory, FixedClock> {
    LoyaltyDiscountCalculator::new(Arc::new(StubHistory::with_count(repairs)), clock(), rules())
}

pub(super) fn pricing_service(
    category: VehicleCategory,
    mileage: u32,
    manufacture_year: i32,
    repairs: u32,
) -> PricingService<VehicleRegistry, StubHistory, FixedClock> {
    PricingService::new(
        registry_with(category, mileage, manufacture_year),
        Arc::new(StubHistory::with_count(repairs)),
        clock(),
        rules(),
    )
}

/// Answers a fixed count for [`VEHICLE`] and records the windows it was asked about.
#[derive(Default)]
pub(super) struct StubHistory {
    count: u32,
    windows: Mutex<Vec<LookbackWindow>>,
}

impl StubHistory {
    pub(super) fn with_count(count: u32) -> Self {
        Self {
            count,
            windows: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn windows(&self) -> Vec<LookbackWindow> {
        self.windows.lock().expect("history mutex poisoned").clone()
    }
}

impl RepairHistory for StubHistory {
    fn count_repairs(
        &self,
        id: VehicleId,
        window: LookbackWindow,
    ) -> Result<Option<u32>, SourceError> {
        self.windows
            .lock()
            .expect("history mutex poisoned")
            .push(window);
        Ok((id == VEHICLE).then_some(self.count))
    }
}

/// Directory whose backing store is down.
pub(super) struct UnavailableDirectory;

impl VehicleDirectory for UnavailableDirectory {
    fn profile(&self, _id: VehicleId) -> Result<Option<VehicleProfile>, SourceError> {
        Err(SourceError::Unavailable("connection refused".to_string()))
    }
}
