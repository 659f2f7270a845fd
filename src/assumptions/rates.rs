//! National-average premium and OOP rate tables with age-bracket correction ratios

use log::warn;
use std::collections::HashMap;

use crate::error::ProjectionError;
use crate::profile::{FamilyStatus, HealthStatus, InsuranceType};

/// Age bracket used by the correction table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBracket {
    /// [18, 35)
    Under35,
    /// [35, 50)
    From35To49,
    /// [50, 65)
    From50To64,
    /// [65, Inf)
    Over65,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::Under35,
        AgeBracket::From35To49,
        AgeBracket::From50To64,
        AgeBracket::Over65,
    ];

    pub fn from_age(age: u32) -> Self {
        if age < 35 {
            AgeBracket::Under35
        } else if age < 50 {
            AgeBracket::From35To49
        } else if age < 65 {
            AgeBracket::From50To64
        } else {
            AgeBracket::Over65
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Under35 => "18-34",
            AgeBracket::From35To49 => "35-49",
            AgeBracket::From50To64 => "50-64",
            AgeBracket::Over65 => "65+",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        AgeBracket::ALL.iter().copied().find(|b| b.as_str() == s.trim())
    }
}

/// Annual base amounts for one (insurance type, family status, health status) cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEntry {
    /// Employee premium
    pub premium: f64,
    pub oop: f64,
    /// Employer share of the premium (0 outside employer plans)
    pub employer_premium: f64,
}

type BaseKey = (InsuranceType, FamilyStatus, HealthStatus);
type CorrectionKey = (AgeBracket, HealthStatus, InsuranceType);

/// Bucket used when a base entry is missing
const DEFAULT_BUCKET: BaseKey = (InsuranceType::Employer, FamilyStatus::Single, HealthStatus::Healthy);

/// Base rates and correction ratios for insured plans
#[derive(Debug, Clone)]
pub struct RateTable {
    base: HashMap<BaseKey, RateEntry>,
    corrections: HashMap<CorrectionKey, f64>,
}

impl RateTable {
    /// Build from explicit rows
    pub fn from_rows(
        base: impl IntoIterator<Item = (BaseKey, RateEntry)>,
        corrections: impl IntoIterator<Item = (CorrectionKey, f64)>,
    ) -> Self {
        Self {
            base: base.into_iter().collect(),
            corrections: corrections.into_iter().collect(),
        }
    }

    /// National averages for employer (ESI) and marketplace (ACA) plans
    pub fn national_averages() -> Self {
        use FamilyStatus::*;
        use HealthStatus::*;
        use InsuranceType::{Employer, Marketplace};

        let mut base = HashMap::new();

        // (premium single, premium family, oop single, oop family)
        let employer = [
            (Healthy, 1_541.0, 3_082.0, 2_200.0, 4_400.0),
            (Chronic, 1_920.0, 3_840.0, 2_600.0, 5_200.0),
            (HighRisk, 2_400.0, 4_800.0, 3_100.0, 6_200.0),
        ];
        let marketplace = [
            (Healthy, 5_100.0, 10_200.0, 4_500.0, 9_000.0),
            (Chronic, 5_800.0, 11_600.0, 5_200.0, 10_400.0),
            (HighRisk, 6_800.0, 13_600.0, 6_500.0, 13_000.0),
        ];
        // Employer contribution toward the premium
        let employer_share_single = 7_034.0;
        let employer_share_family = 17_393.0;

        for (health, p_single, p_family, o_single, o_family) in employer {
            base.insert((Employer, Single, health), RateEntry {
                premium: p_single,
                oop: o_single,
                employer_premium: employer_share_single,
            });
            base.insert((Employer, Family, health), RateEntry {
                premium: p_family,
                oop: o_family,
                employer_premium: employer_share_family,
            });
        }
        for (health, p_single, p_family, o_single, o_family) in marketplace {
            base.insert((Marketplace, Single, health), RateEntry {
                premium: p_single,
                oop: o_single,
                employer_premium: 0.0,
            });
            base.insert((Marketplace, Family, health), RateEntry {
                premium: p_family,
                oop: o_family,
                employer_premium: 0.0,
            });
        }

        let mut corrections = HashMap::new();
        // bracket -> (health -> (ESI, ACA))
        let table = [
            (AgeBracket::Under35, [(Healthy, 1.0, 1.1), (Chronic, 1.2, 1.3), (HighRisk, 1.5, 1.7)]),
            (AgeBracket::From35To49, [(Healthy, 1.1, 1.2), (Chronic, 1.3, 1.4), (HighRisk, 1.6, 1.8)]),
            (AgeBracket::From50To64, [(Healthy, 1.2, 1.3), (Chronic, 1.4, 1.5), (HighRisk, 1.7, 1.9)]),
            (AgeBracket::Over65, [(Healthy, 1.0, 1.0), (Chronic, 1.0, 1.0), (HighRisk, 1.0, 1.0)]),
        ];
        for (bracket, row) in table {
            for (health, esi, aca) in row {
                corrections.insert((bracket, health, Employer), esi);
                corrections.insert((bracket, health, Marketplace), aca);
            }
        }

        Self { base, corrections }
    }

    /// Base entry for a cell, if present
    pub fn base_entry(
        &self,
        insurance_type: InsuranceType,
        family_status: FamilyStatus,
        health_status: HealthStatus,
    ) -> Option<&RateEntry> {
        self.base.get(&(insurance_type, family_status, health_status))
    }

    /// Base entry for a cell, falling back to the default bucket when missing
    pub fn base_entry_or_default(
        &self,
        insurance_type: InsuranceType,
        family_status: FamilyStatus,
        health_status: HealthStatus,
    ) -> RateEntry {
        if let Some(entry) = self.base_entry(insurance_type, family_status, health_status) {
            return *entry;
        }
        warn!(
            "no base rate for ({}, {}, {}); using default bucket",
            insurance_type, family_status, health_status
        );
        self.base
            .get(&DEFAULT_BUCKET)
            .copied()
            .unwrap_or(RateEntry { premium: 0.0, oop: 0.0, employer_premium: 0.0 })
    }

    /// Correction multiplier at an attained age. Missing cells are neutral (1.0).
    pub fn correction(&self, age: u32, health_status: HealthStatus, insurance_type: InsuranceType) -> f64 {
        let bracket = AgeBracket::from_age(age);
        self.corrections
            .get(&(bracket, health_status, insurance_type))
            .copied()
            .unwrap_or(1.0)
    }

    /// Strict lookup of corrected (premium, oop) at an attained age, without inflation
    pub fn lookup(
        &self,
        insurance_type: InsuranceType,
        family_status: FamilyStatus,
        health_status: HealthStatus,
        age: u32,
    ) -> Result<(f64, f64), ProjectionError> {
        let entry = self.base_entry(insurance_type, family_status, health_status).ok_or_else(|| {
            ProjectionError::MissingRateTableEntry(format!(
                "({}, {}, {})",
                insurance_type, family_status, health_status
            ))
        })?;
        let correction = self.correction(age, health_status, insurance_type);
        Ok((entry.premium * correction, entry.oop * correction))
    }

    pub fn base_len(&self) -> usize {
        self.base.len()
    }

    pub fn corrections_len(&self) -> usize {
        self.corrections.len()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::national_averages()
    }
}
