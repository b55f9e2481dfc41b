use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PricingError;

/// Identifier wrapper for vehicles registered with the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body categories recognised by the surcharge tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleCategory {
    Sedan,
    Hatchback,
    #[serde(rename = "SUV")]
    Suv,
    Pickup,
    Furgoneta,
}

impl VehicleCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Sedan,
            Self::Hatchback,
            Self::Suv,
            Self::Pickup,
            Self::Furgoneta,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Hatchback => "Hatchback",
            Self::Suv => "SUV",
            Self::Pickup => "Pickup",
            Self::Furgoneta => "Furgoneta",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VehicleCategory {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sedan" => Ok(Self::Sedan),
            "hatchback" => Ok(Self::Hatchback),
            "suv" => Ok(Self::Suv),
            "pickup" => Ok(Self::Pickup),
            "furgoneta" => Ok(Self::Furgoneta),
            _ => Err(PricingError::InvalidInput {
                field: "vehicle category",
                value: value.to_string(),
            }),
        }
    }
}

/// Engine families that drive the loyalty discount tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
}

impl EngineType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Gasoline, Self::Diesel, Self::Hybrid, Self::Electric]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gasoline => "GASOLINE",
            Self::Diesel => "DIESEL",
            Self::Hybrid => "HYBRID",
            Self::Electric => "ELECTRIC",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EngineType {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GASOLINE" => Ok(Self::Gasoline),
            "DIESEL" => Ok(Self::Diesel),
            "HYBRID" => Ok(Self::Hybrid),
            "ELECTRIC" => Ok(Self::Electric),
            _ => Err(PricingError::InvalidInput {
                field: "engine type",
                value: value.to_string(),
            }),
        }
    }
}

/// Snapshot of the vehicle attributes the surcharge rules depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: VehicleId,
    pub category: VehicleCategory,
    pub mileage: u32,
    pub manufacture_year: i32,
}

impl VehicleProfile {
    /// Age in whole years relative to `current_year`.
    ///
    /// A manufacture year in the future is a data-integrity problem and is
    /// reported instead of being clamped to zero.
    pub fn age_in(&self, current_year: i32) -> Result<u32, PricingError> {
        if self.manufacture_year > current_year {
            return Err(PricingError::FutureManufactureYear {
                vehicle_id: self.id,
                manufacture_year: self.manufacture_year,
                current_year,
            });
        }

        current_year
            .checked_sub(self.manufacture_year)
            .and_then(|age| u32::try_from(age).ok())
            .ok_or_else(|| PricingError::InvalidInput {
                field: "manufacture year",
                value: self.manufacture_year.to_string(),
            })
    }
}
