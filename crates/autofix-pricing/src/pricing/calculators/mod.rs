mod antiquity;
mod loyalty;
mod mileage;

pub use antiquity::AntiquityChargeCalculator;
pub use loyalty::LoyaltyDiscountCalculator;
pub use mileage::MileageChargeCalculator;

use super::domain::{VehicleId, VehicleProfile};
use super::source::VehicleDirectory;
use super::PricingError;

pub(crate) fn fetch_profile<V>(vehicles: &V, id: VehicleId) -> Result<VehicleProfile, PricingError>
where
    V: VehicleDirectory + ?Sized,
{
    vehicles.profile(id)?.ok_or(PricingError::NotFound(id))
}
