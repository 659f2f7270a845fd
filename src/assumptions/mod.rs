//! Rate tables and benchmark figures used by the projections

mod benchmarks;
mod rates;
pub mod loader;

pub use benchmarks::{
    Benchmarks, LongTermCareCosts, LongTermCareTier, MedicareValues, PensionDefaults, PensionType,
    UninsuredLifetimeCosts,
};
pub use rates::{AgeBracket, RateEntry, RateTable};
pub use loader::LoadedRates;

use log::warn;
use std::collections::HashMap;
use std::path::Path;

use crate::error::LoadError;

/// Container for all static projection data
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub rates: RateTable,
    pub benchmarks: Benchmarks,
}

impl Assumptions {
    /// National-average tables compiled into the crate
    pub fn national_averages() -> Self {
        Self {
            rates: RateTable::national_averages(),
            benchmarks: Benchmarks::default(),
        }
    }

    /// Load rate tables from CSV files in the default location (data/rates/)
    pub fn from_csv() -> Result<Self, LoadError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RATES_PATH))
    }

    /// Load rate tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let loaded = LoadedRates::load_from(path)?;

        Ok(Self {
            rates: RateTable::from_rows(loaded.base_costs, loaded.correction_ratios),
            benchmarks: benchmarks_from_loaded(&loaded.benchmarks),
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::national_averages()
    }
}

/// Named values override the defaults; unknown or absent names keep them
fn benchmarks_from_loaded(values: &HashMap<String, f64>) -> Benchmarks {
    let mut b = Benchmarks::default();

    for (name, &value) in values {
        match name.as_str() {
            "uninsured_lifetime_healthy" => b.uninsured_lifetime.healthy = value,
            "uninsured_lifetime_chronic" => b.uninsured_lifetime.chronic = value,
            "uninsured_lifetime_high_risk" => b.uninsured_lifetime.high_risk = value,
            "lifetime_horizon_age" => b.lifetime_horizon_age = value as u32,
            "medicare_eligibility_age" => b.medicare.eligibility_age = value as u32,
            "medicare_premium" => b.medicare.premium = value,
            "medicare_employer_premium" => b.medicare.employer_premium = value,
            "medicare_oop_factor" => b.medicare.oop_factor = value,
            "pension_private" => b.pensions.private = value,
            "pension_state" => b.pensions.state = value,
            "pension_federal" => b.pensions.federal = value,
            "ltc_assisted_living" => b.long_term_care.assisted_living = value,
            "ltc_nursing_semi_private" => b.long_term_care.nursing_semi_private = value,
            "ltc_nursing_private" => b.long_term_care.nursing_private = value,
            "ltc_onset_age" => b.long_term_care.onset_age = value as u32,
            "digital_first_monthly" => b.digital_first_monthly = value,
            other => warn!("ignoring unknown benchmark `{}`", other),
        }
    }

    b
}
