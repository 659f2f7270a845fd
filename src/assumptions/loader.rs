//! CSV-based rate table loader
//!
//! Loads rate tables and benchmarks from CSV files in data/rates/

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::error::LoadError;
use crate::profile::{FamilyStatus, HealthStatus, InsuranceType};
use super::rates::{AgeBracket, RateEntry};

/// Default path to rate table directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

fn parse_f64(file: &str, value: &str) -> Result<f64, LoadError> {
    value.trim().parse().map_err(|_| LoadError::Parse {
        file: file.to_string(),
        value: value.to_string(),
        expected: "number",
    })
}

fn parse_enum<T: FromStr>(value: &str) -> Result<T, LoadError>
where
    LoadError: From<T::Err>,
{
    Ok(value.parse::<T>()?)
}

/// Load base premium/OOP rows from CSV
/// Columns: insurance_type, family_status, health_status, premium, oop, employer_premium
pub fn load_base_costs(
    path: &Path,
) -> Result<Vec<((InsuranceType, FamilyStatus, HealthStatus), RateEntry)>, LoadError> {
    const FILE: &str = "base_costs.csv";
    let file = File::open(path.join(FILE))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let insurance_type: InsuranceType = parse_enum(&record[0])?;
        let family_status: FamilyStatus = parse_enum(&record[1])?;
        let health_status: HealthStatus = parse_enum(&record[2])?;
        let entry = RateEntry {
            premium: parse_f64(FILE, &record[3])?,
            oop: parse_f64(FILE, &record[4])?,
            employer_premium: parse_f64(FILE, &record[5])?,
        };
        rows.push(((insurance_type, family_status, health_status), entry));
    }

    Ok(rows)
}

/// Load correction ratios from CSV
/// Columns: age_bracket, health_status, insurance_type, ratio
pub fn load_correction_ratios(
    path: &Path,
) -> Result<Vec<((AgeBracket, HealthStatus, InsuranceType), f64)>, LoadError> {
    const FILE: &str = "correction_ratios.csv";
    let file = File::open(path.join(FILE))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let bracket = AgeBracket::parse(&record[0]).ok_or_else(|| LoadError::Parse {
            file: FILE.to_string(),
            value: record[0].to_string(),
            expected: "age bracket",
        })?;
        let health_status: HealthStatus = parse_enum(&record[1])?;
        let insurance_type: InsuranceType = parse_enum(&record[2])?;
        let ratio = parse_f64(FILE, &record[3])?;
        rows.push(((bracket, health_status, insurance_type), ratio));
    }

    Ok(rows)
}

/// Load named benchmark values from CSV
/// Columns: name, value
pub fn load_benchmarks(path: &Path) -> Result<HashMap<String, f64>, LoadError> {
    const FILE: &str = "benchmarks.csv";
    let file = File::open(path.join(FILE))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut values = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let name = record[0].trim().to_string();
        let value = parse_f64(FILE, &record[1])?;
        values.insert(name, value);
    }

    Ok(values)
}

/// All rate data loaded from a directory
pub struct LoadedRates {
    pub base_costs: Vec<((InsuranceType, FamilyStatus, HealthStatus), RateEntry)>,
    pub correction_ratios: Vec<((AgeBracket, HealthStatus, InsuranceType), f64)>,
    pub benchmarks: HashMap<String, f64>,
}

impl LoadedRates {
    /// Load all rate data from the default path
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_from(Path::new(DEFAULT_RATES_PATH))
    }

    /// Load all rate data from a specific path
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            base_costs: load_base_costs(path)?,
            correction_ratios: load_correction_ratios(path)?,
            benchmarks: load_benchmarks(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_rates() {
        let result = LoadedRates::load_default();
        assert!(result.is_ok(), "Failed to load rates: {:?}", result.err());

        let rates = result.unwrap();

        // 2 insured plans x 2 family statuses x 3 health statuses
        assert_eq!(rates.base_costs.len(), 12);

        // 4 brackets x 3 health statuses x 2 plans
        assert_eq!(rates.correction_ratios.len(), 24);

        assert_eq!(rates.benchmarks.get("medicare_premium"), Some(&1800.0));
        assert_eq!(rates.benchmarks.get("uninsured_lifetime_chronic"), Some(&459000.0));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = LoadedRates::load_from(Path::new("data/does_not_exist"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
