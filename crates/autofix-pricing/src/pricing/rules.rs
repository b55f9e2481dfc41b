use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{EngineType, VehicleCategory};
use super::table::{Bracket, RuleTable, RuleTableError};

/// The three rule tables consulted when pricing a repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    pub mileage: RuleTable<VehicleCategory>,
    pub antiquity: RuleTable<VehicleCategory>,
    pub loyalty: RuleTable<EngineType>,
}

/// Failure to load an alternative rule book.
#[derive(Debug, thiserror::Error)]
pub enum RuleBookError {
    #[error("failed to read rule book: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule book document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Table(#[from] RuleTableError),
}

impl RuleBook {
    /// Shop-wide tables, built and validated once per process.
    pub fn standard() -> Result<Arc<RuleBook>, RuleTableError> {
        static STANDARD: OnceLock<Result<Arc<RuleBook>, RuleTableError>> = OnceLock::new();
        STANDARD
            .get_or_init(|| standard_rule_book().map(Arc::new))
            .clone()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RuleBookError> {
        let book: RuleBook = serde_json::from_reader(reader)?;
        book.validate()?;
        Ok(book)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleBookError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Checks bracket coverage and that every category and engine type has a table.
    pub fn validate(&self) -> Result<(), RuleTableError> {
        self.mileage.validate()?;
        self.mileage.require_keys(&VehicleCategory::ordered())?;
        self.antiquity.validate()?;
        self.antiquity.require_keys(&VehicleCategory::ordered())?;
        self.loyalty.validate()?;
        self.loyalty.require_keys(&EngineType::ordered())?;
        Ok(())
    }
}

fn charge(whole: i64) -> Decimal {
    Decimal::new(whole * 10, 1)
}

fn discount(whole: i64) -> Decimal {
    Decimal::new(whole, 0)
}

/// Builds brackets from inclusive upper breakpoints; the last percentage
/// gets the unbounded tail.
fn brackets(breakpoints: &[u32], percentages: &[Decimal]) -> Vec<Bracket> {
    let mut lower = 0;
    let mut out = Vec::with_capacity(percentages.len());
    for (index, percentage) in percentages.iter().enumerate() {
        match breakpoints.get(index) {
            Some(&upper) => {
                out.push(Bracket::bounded(lower, upper, *percentage));
                lower = upper + 1;
            }
            None => out.push(Bracket::unbounded(lower, *percentage)),
        }
    }
    out
}

const MILEAGE_BREAKPOINTS: [u32; 4] = [5_000, 12_000, 25_000, 40_000];
const ANTIQUITY_BREAKPOINTS: [u32; 3] = [5, 10, 15];
const LOYALTY_BREAKPOINTS: [u32; 3] = [2, 5, 9];

fn mileage_percentages(category: VehicleCategory) -> [i64; 5] {
    match category {
        VehicleCategory::Sedan | VehicleCategory::Hatchback => [0, 3, 7, 12, 20],
        VehicleCategory::Suv | VehicleCategory::Pickup | VehicleCategory::Furgoneta => {
            [0, 5, 9, 12, 20]
        }
    }
}

fn antiquity_percentages(category: VehicleCategory) -> [i64; 4] {
    match category {
        VehicleCategory::Sedan | VehicleCategory::Hatchback => [0, 5, 9, 15],
        VehicleCategory::Suv | VehicleCategory::Pickup | VehicleCategory::Furgoneta => {
            [0, 7, 11, 20]
        }
    }
}

fn loyalty_percentages(engine: EngineType) -> [i64; 4] {
    match engine {
        EngineType::Gasoline => [5, 10, 15, 20],
        EngineType::Diesel => [7, 12, 17, 22],
        EngineType::Electric => [8, 13, 18, 23],
        EngineType::Hybrid => [10, 15, 20, 25],
    }
}

fn standard_rule_book() -> Result<RuleBook, RuleTableError> {
    let mileage = VehicleCategory::ordered()
        .into_iter()
        .map(|category| {
            let percentages = mileage_percentages(category).map(charge);
            (category, brackets(&MILEAGE_BREAKPOINTS, &percentages))
        })
        .collect::<BTreeMap<_, _>>();

    let antiquity = VehicleCategory::ordered()
        .into_iter()
        .map(|category| {
            let percentages = antiquity_percentages(category).map(charge);
            (category, brackets(&ANTIQUITY_BREAKPOINTS, &percentages))
        })
        .collect::<BTreeMap<_, _>>();

    let loyalty = EngineType::ordered()
        .into_iter()
        .map(|engine| {
            let percentages = loyalty_percentages(engine).map(discount);
            (engine, brackets(&LOYALTY_BREAKPOINTS, &percentages))
        })
        .collect::<BTreeMap<_, _>>();

    let book = RuleBook {
        mileage: RuleTable::new(mileage)?,
        antiquity: RuleTable::new(antiquity)?,
        loyalty: RuleTable::new(loyalty)?,
    };
    book.validate()?;
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn standard() -> Arc<RuleBook> {
        RuleBook::standard().expect("standard rule book is valid")
    }

    #[test]
    fn standard_book_covers_every_key() {
        standard().validate().expect("standard rule book is valid");
    }

    #[test]
    fn standard_book_is_shared() {
        assert!(Arc::ptr_eq(&standard(), &standard()));
    }

    #[test]
    fn charge_percentages_keep_one_decimal_place() {
        let book = standard();
        let value = book
            .mileage
            .evaluate(VehicleCategory::Sedan, 15_000)
            .expect("evaluates");
        assert_eq!(value.to_string(), "7.0");
    }

    #[test]
    fn json_round_trip_preserves_tables() {
        let book = standard();
        let json = serde_json::to_string(book.as_ref()).expect("serializes");
        let loaded = RuleBook::from_reader(Cursor::new(json)).expect("loads");
        assert_eq!(&loaded, book.as_ref());
    }

    #[test]
    fn loading_rejects_missing_categories() {
        let mut doc = serde_json::to_value(standard().as_ref()).expect("serializes");
        doc["antiquity"]
            .as_object_mut()
            .expect("antiquity is a map")
            .remove("Pickup");

        match RuleBook::from_reader(Cursor::new(doc.to_string())) {
            Err(RuleBookError::Table(RuleTableError::MissingKey { key })) => {
                assert_eq!(key, "Pickup");
            }
            other => panic!("expected missing key, got {other:?}"),
        }
    }

    #[test]
    fn loading_rejects_gapped_brackets() {
        let doc = r#"{
            "mileage": {"Sedan": [{"lower": 0, "upper": 10, "percentage": "0"},
                                   {"lower": 12, "percentage": "3"}]},
            "antiquity": {},
            "loyalty": {}
        }"#;
        assert!(matches!(
            RuleBook::from_reader(Cursor::new(doc)),
            Err(RuleBookError::Table(RuleTableError::Discontinuous { .. }))
        ));
    }
}
