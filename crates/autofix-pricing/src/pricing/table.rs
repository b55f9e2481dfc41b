//! Bracket tables shared by the mileage, antiquity, and loyalty calculators.
//!
//! A [`RuleTable`] maps a closed enumeration key (vehicle category or engine
//! type) to an ordered list of [`Bracket`]s. Brackets are closed on both ends
//! and contiguous, so a value equal to a published breakpoint belongs to the
//! bracket that ends there. Tables are validated on construction; a table that
//! exists is total over `[0, +inf)` for every key it holds.

use std::collections::BTreeMap;
use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contiguous value range mapped to a single percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<u32>,
    pub percentage: Decimal,
}

impl Bracket {
    pub fn bounded(lower: u32, upper: u32, percentage: Decimal) -> Self {
        Self {
            lower,
            upper: Some(upper),
            percentage,
        }
    }

    pub fn unbounded(lower: u32, percentage: Decimal) -> Self {
        Self {
            lower,
            upper: None,
            percentage,
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value <= upper)
    }
}

/// Configuration defects detected while building or reading a rule table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleTableError {
    #[error("rule table has no brackets for {key}")]
    MissingKey { key: String },
    #[error("brackets for {key} must start at 0, found {lower}")]
    NotAnchoredAtZero { key: String, lower: u32 },
    #[error("brackets for {key} leave a gap or overlap at {lower} (expected {expected})")]
    Discontinuous {
        key: String,
        lower: u32,
        expected: u32,
    },
    #[error("bracket {lower}..={upper} for {key} is inverted")]
    Inverted { key: String, lower: u32, upper: u32 },
    #[error("brackets for {key} must end with an unbounded bracket")]
    BoundedTail { key: String },
    #[error("unbounded bracket for {key} starting at {lower} is not the last one")]
    UnboundedInterior { key: String, lower: u32 },
    #[error("percentage {percentage} for {key} must not be negative")]
    NegativePercentage { key: String, percentage: Decimal },
    #[error("percentage for {key} drops from {previous} to {percentage} at {lower}")]
    Decreasing {
        key: String,
        lower: u32,
        previous: Decimal,
        percentage: Decimal,
    },
}

/// Per-key bracket lists evaluated by a single scan routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "K: Ord + Serialize",
        deserialize = "K: Ord + Deserialize<'de>"
    )
)]
pub struct RuleTable<K> {
    brackets: BTreeMap<K, Vec<Bracket>>,
}

impl<K> RuleTable<K>
where
    K: Ord + Copy + Display,
{
    /// Builds a table, rejecting any key whose brackets do not cover the
    /// non-negative domain exactly once.
    pub fn new(brackets: BTreeMap<K, Vec<Bracket>>) -> Result<Self, RuleTableError> {
        let table = Self { brackets };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), RuleTableError> {
        for (key, brackets) in &self.brackets {
            validate_brackets(&key.to_string(), brackets)?;
        }
        Ok(())
    }

    /// Confirms every key in `keys` has been populated.
    pub fn require_keys(&self, keys: &[K]) -> Result<(), RuleTableError> {
        match keys.iter().find(|key| !self.brackets.contains_key(*key)) {
            Some(missing) => Err(RuleTableError::MissingKey {
                key: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Percentage of the bracket containing `value` for `key`.
    pub fn evaluate(&self, key: K, value: u32) -> Result<Decimal, RuleTableError> {
        let brackets = self
            .brackets
            .get(&key)
            .ok_or_else(|| RuleTableError::MissingKey {
                key: key.to_string(),
            })?;

        brackets
            .iter()
            .find(|bracket| bracket.contains(value))
            .map(|bracket| bracket.percentage)
            .ok_or_else(|| RuleTableError::BoundedTail {
                key: key.to_string(),
            })
    }

    pub fn brackets(&self, key: K) -> Option<&[Bracket]> {
        self.brackets.get(&key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.brackets.keys().copied()
    }
}

fn validate_brackets(key: &str, brackets: &[Bracket]) -> Result<(), RuleTableError> {
    let Some(first) = brackets.first() else {
        return Err(RuleTableError::MissingKey {
            key: key.to_string(),
        });
    };

    if first.lower != 0 {
        return Err(RuleTableError::NotAnchoredAtZero {
            key: key.to_string(),
            lower: first.lower,
        });
    }

    let mut expected_lower = Some(0u32);
    let mut previous: Option<Decimal> = None;

    for bracket in brackets {
        let Some(expected) = expected_lower else {
            return Err(RuleTableError::UnboundedInterior {
                key: key.to_string(),
                lower: bracket.lower,
            });
        };

        if bracket.lower != expected {
            return Err(RuleTableError::Discontinuous {
                key: key.to_string(),
                lower: bracket.lower,
                expected,
            });
        }

        if bracket.percentage < Decimal::ZERO {
            return Err(RuleTableError::NegativePercentage {
                key: key.to_string(),
                percentage: bracket.percentage,
            });
        }

        if let Some(previous) = previous.filter(|previous| bracket.percentage < *previous) {
            return Err(RuleTableError::Decreasing {
                key: key.to_string(),
                lower: bracket.lower,
                previous,
                percentage: bracket.percentage,
            });
        }
        previous = Some(bracket.percentage);

        expected_lower = match bracket.upper {
            Some(upper) if upper < bracket.lower => {
                return Err(RuleTableError::Inverted {
                    key: key.to_string(),
                    lower: bracket.lower,
                    upper,
                });
            }
            // u32::MAX as an upper bound leaves nothing above it to cover.
            Some(upper) => upper.checked_add(1),
            None => None,
        };
    }

    if expected_lower.is_some() {
        return Err(RuleTableError::BoundedTail {
            key: key.to_string(),
        });
    }

    Ok(())
}
