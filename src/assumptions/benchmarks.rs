//! Published benchmark figures: uninsured lifetime costs, Medicare-equivalent
//! values, pension defaults, long-term-care tiers, and the digital-first care
//! benchmark

use serde::{Deserialize, Serialize};

use crate::profile::HealthStatus;

/// Lifetime out-of-pocket cost for an uninsured individual (PMC10314135)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UninsuredLifetimeCosts {
    pub healthy: f64,
    pub chronic: f64,
    pub high_risk: f64,
}

impl UninsuredLifetimeCosts {
    pub fn for_status(&self, status: HealthStatus) -> f64 {
        match status {
            HealthStatus::Healthy => self.healthy,
            HealthStatus::Chronic => self.chronic,
            HealthStatus::HighRisk => self.high_risk,
        }
    }
}

impl Default for UninsuredLifetimeCosts {
    fn default() -> Self {
        Self {
            healthy: 75_000.0,
            chronic: 459_000.0,
            high_risk: 472_000.0,
        }
    }
}

/// Values used once an employer-plan member reaches Medicare age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedicareValues {
    /// Eligibility age
    pub eligibility_age: u32,
    /// Fixed annual employee premium (not inflated)
    pub premium: f64,
    /// Fixed annual employer premium
    pub employer_premium: f64,
    /// Applied to the inflated base OOP
    pub oop_factor: f64,
}

impl Default for MedicareValues {
    fn default() -> Self {
        Self {
            eligibility_age: 65,
            premium: 1_800.0,
            employer_premium: 0.0,
            oop_factor: 0.7,
        }
    }
}

/// Pension plan sponsor, used when the annual amount is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionType {
    Private,
    State,
    Federal,
}

/// Typical annual pension by sponsor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionDefaults {
    pub private: f64,
    pub state: f64,
    pub federal: f64,
}

impl PensionDefaults {
    pub fn for_type(&self, pension_type: PensionType) -> f64 {
        match pension_type {
            PensionType::Private => self.private,
            PensionType::State => self.state,
            PensionType::Federal => self.federal,
        }
    }
}

impl Default for PensionDefaults {
    fn default() -> Self {
        Self {
            private: 18_000.0,
            state: 26_000.0,
            federal: 30_000.0,
        }
    }
}

/// Long-term-care setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongTermCareTier {
    AssistedLiving,
    NursingHomeSemiPrivate,
    NursingHomePrivate,
}

/// Monthly long-term-care costs by tier, and the age care begins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongTermCareCosts {
    pub assisted_living: f64,
    pub nursing_semi_private: f64,
    pub nursing_private: f64,
    pub onset_age: u32,
}

impl LongTermCareCosts {
    pub fn monthly_cost(&self, tier: LongTermCareTier) -> f64 {
        match tier {
            LongTermCareTier::AssistedLiving => self.assisted_living,
            LongTermCareTier::NursingHomeSemiPrivate => self.nursing_semi_private,
            LongTermCareTier::NursingHomePrivate => self.nursing_private,
        }
    }
}

impl Default for LongTermCareCosts {
    fn default() -> Self {
        Self {
            assisted_living: 5_900.0,
            nursing_semi_private: 9_277.0,
            nursing_private: 10_646.0,
            onset_age: 75,
        }
    }
}

/// All benchmark figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub uninsured_lifetime: UninsuredLifetimeCosts,
    pub medicare: MedicareValues,
    pub pensions: PensionDefaults,
    pub long_term_care: LongTermCareCosts,
    /// Monthly cost of virtual primary care + surgical bundle + eye/dental add-on
    pub digital_first_monthly: f64,
    /// Age the uninsured lifetime cost is spread to
    pub lifetime_horizon_age: u32,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            uninsured_lifetime: UninsuredLifetimeCosts::default(),
            medicare: MedicareValues::default(),
            pensions: PensionDefaults::default(),
            long_term_care: LongTermCareCosts::default(),
            digital_first_monthly: 80.0 + 100.0 + 50.0,
            lifetime_horizon_age: 85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_benchmarks() {
        let b = Benchmarks::default();
        assert_eq!(b.digital_first_monthly, 230.0);
        assert_eq!(b.uninsured_lifetime.for_status(HealthStatus::Chronic), 459_000.0);
        assert_eq!(b.long_term_care.monthly_cost(LongTermCareTier::NursingHomePrivate), 10_646.0);
        assert_eq!(b.medicare.eligibility_age, 65);
    }
}
