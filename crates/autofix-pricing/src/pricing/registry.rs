//! In-memory collaborators hydrated from CSV exports of the shop database.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{Position, StringRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::clock::LookbackWindow;
use super::domain::{VehicleCategory, VehicleId, VehicleProfile};
use super::source::{RepairHistory, SourceError, VehicleDirectory};

/// Vehicle profiles keyed by id.
#[derive(Debug, Default, Clone)]
pub struct VehicleRegistry {
    vehicles: HashMap<VehicleId, VehicleProfile>,
}

impl VehicleRegistry {
    pub fn insert(&mut self, profile: VehicleProfile) -> Option<VehicleProfile> {
        self.vehicles.insert(profile.id, profile)
    }

    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `vehicle_id,category,mileage,manufacture_year` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut registry = Self::default();

        for_each_row(reader, |line, row: VehicleRow| {
            let category = row
                .category
                .parse::<VehicleCategory>()
                .map_err(|_| SourceError::InvalidRecord {
                    line,
                    reason: format!("unknown vehicle category '{}'", row.category),
                })?;

            let profile = VehicleProfile {
                id: VehicleId(row.vehicle_id),
                category,
                mileage: row.mileage,
                manufacture_year: row.manufacture_year,
            };

            if registry.insert(profile).is_some() {
                return Err(SourceError::InvalidRecord {
                    line,
                    reason: format!("duplicate vehicle id {}", row.vehicle_id),
                });
            }
            Ok(())
        })?;

        Ok(registry)
    }
}

impl VehicleDirectory for VehicleRegistry {
    fn profile(&self, id: VehicleId) -> Result<Option<VehicleProfile>, SourceError> {
        Ok(self.vehicles.get(&id).cloned())
    }
}

/// Repair dates per vehicle, restricted to a known set of vehicles.
#[derive(Debug, Default, Clone)]
pub struct RepairLedger {
    vehicles: HashSet<VehicleId>,
    repairs: HashMap<VehicleId, Vec<NaiveDate>>,
}

impl RepairLedger {
    pub fn for_vehicles(ids: impl IntoIterator<Item = VehicleId>) -> Self {
        Self {
            vehicles: ids.into_iter().collect(),
            repairs: HashMap::new(),
        }
    }

    /// Records a repair; returns `false` if the vehicle is not registered.
    pub fn record(&mut self, id: VehicleId, repaired_on: NaiveDate) -> bool {
        if !self.vehicles.contains(&id) {
            return false;
        }
        self.repairs.entry(id).or_default().push(repaired_on);
        true
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        vehicles: impl IntoIterator<Item = VehicleId>,
    ) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::from_reader(file, vehicles)
    }

    /// Reads `vehicle_id,repaired_on` rows with `YYYY-MM-DD` dates.
    pub fn from_reader<R: Read>(
        reader: R,
        vehicles: impl IntoIterator<Item = VehicleId>,
    ) -> Result<Self, SourceError> {
        let mut ledger = Self::for_vehicles(vehicles);

        for_each_row(reader, |line, row: RepairRow| {
            let repaired_on = NaiveDate::parse_from_str(row.repaired_on.trim(), "%Y-%m-%d")
                .map_err(|err| SourceError::InvalidRecord {
                    line,
                    reason: format!(
                        "failed to parse '{}' as YYYY-MM-DD ({err})",
                        row.repaired_on
                    ),
                })?;

            if !ledger.record(VehicleId(row.vehicle_id), repaired_on) {
                return Err(SourceError::InvalidRecord {
                    line,
                    reason: format!("repair references unknown vehicle {}", row.vehicle_id),
                });
            }
            Ok(())
        })?;

        Ok(ledger)
    }
}

impl RepairHistory for RepairLedger {
    fn count_repairs(
        &self,
        id: VehicleId,
        window: LookbackWindow,
    ) -> Result<Option<u32>, SourceError> {
        if !self.vehicles.contains(&id) {
            return Ok(None);
        }

        let count = self
            .repairs
            .get(&id)
            .map(|dates| dates.iter().filter(|date| window.contains(**date)).count())
            .unwrap_or(0);

        Ok(Some(u32::try_from(count).unwrap_or(u32::MAX)))
    }
}

#[derive(Debug, Deserialize)]
struct VehicleRow {
    vehicle_id: u64,
    category: String,
    mileage: u32,
    manufacture_year: i32,
}

#[derive(Debug, Deserialize)]
struct RepairRow {
    vehicle_id: u64,
    repaired_on: String,
}

/// Deserializes each data row and hands it over with the line it starts on.
fn for_each_row<R, T, F>(reader: R, mut visit: F) -> Result<(), SourceError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(u64, T) -> Result<(), SourceError>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut record = StringRecord::new();

    while csv_reader.read_record(&mut record)? {
        let line = record.position().map(Position::line).unwrap_or_default();
        let row = record.deserialize(Some(&headers))?;
        visit(line, row)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn registry_parses_vehicle_rows() {
        let csv = "vehicle_id,category,mileage,manufacture_year\n1,Sedan,15000,2015\n2, SUV ,5000,2026\n";
        let registry = VehicleRegistry::from_reader(Cursor::new(csv)).expect("parses");

        assert_eq!(registry.len(), 2);
        let suv = registry
            .profile(VehicleId(2))
            .expect("lookup succeeds")
            .expect("vehicle present");
        assert_eq!(suv.category, VehicleCategory::Suv);
        assert_eq!(suv.mileage, 5000);
        assert!(registry
            .profile(VehicleId(3))
            .expect("lookup succeeds")
            .is_none());
    }

    #[test]
    fn registry_reports_line_of_unknown_category() {
        let csv = "vehicle_id,category,mileage,manufacture_year\n1,Sedan,15000,2015\n2,Tractor,100,2020\n";
        match VehicleRegistry::from_reader(Cursor::new(csv)) {
            Err(SourceError::InvalidRecord { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("Tractor"));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn reported_line_accounts_for_multiline_fields() {
        let csv = "vehicle_id,category,mileage,manufacture_year\n1,\"Sedan\n\",15000,2015\n2,Tractor,100,2020\n";
        match VehicleRegistry::from_reader(Cursor::new(csv)) {
            Err(SourceError::InvalidRecord { line, reason }) => {
                assert_eq!(line, 4);
                assert!(reason.contains("Tractor"));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn registry_rejects_duplicate_ids() {
        let csv = "vehicle_id,category,mileage,manufacture_year\n1,Sedan,15000,2015\n1,Pickup,100,2020\n";
        assert!(matches!(
            VehicleRegistry::from_reader(Cursor::new(csv)),
            Err(SourceError::InvalidRecord { line: 3, .. })
        ));
    }

    #[test]
    fn registry_rejects_negative_mileage() {
        let csv = "vehicle_id,category,mileage,manufacture_year\n1,Sedan,-4,2015\n";
        assert!(matches!(
            VehicleRegistry::from_reader(Cursor::new(csv)),
            Err(SourceError::Csv(_))
        ));
    }

    #[test]
    fn ledger_counts_repairs_inside_window() {
        let csv = "vehicle_id,repaired_on\n1,2025-10-15\n1,2025-10-16\n1,2026-03-01\n1,2026-10-16\n1,2026-10-17\n";
        let ledger =
            RepairLedger::from_reader(Cursor::new(csv), [VehicleId(1), VehicleId(2)]).expect("parses");
        let window = LookbackWindow::trailing_year(date(2026, 10, 16));

        assert_eq!(
            ledger.count_repairs(VehicleId(1), window).expect("counts"),
            Some(3)
        );
        assert_eq!(
            ledger.count_repairs(VehicleId(2), window).expect("counts"),
            Some(0)
        );
        assert_eq!(ledger.count_repairs(VehicleId(9), window).expect("counts"), None);
    }

    #[test]
    fn ledger_rejects_repairs_for_unknown_vehicles() {
        let csv = "vehicle_id,repaired_on\n4,2026-01-01\n";
        assert!(matches!(
            RepairLedger::from_reader(Cursor::new(csv), [VehicleId(1)]),
            Err(SourceError::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn ledger_rejects_malformed_dates() {
        let csv = "vehicle_id,repaired_on\n1,01/02/2026\n";
        match RepairLedger::from_reader(Cursor::new(csv), [VehicleId(1)]) {
            Err(SourceError::InvalidRecord { reason, .. }) => {
                assert!(reason.contains("YYYY-MM-DD"));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }
}
