//! Age- and duration-triggered regime switches
//!
//! Each sequence that changes formula partway through a projection owns one of
//! these state machines. The projector asks for the regime of year `i`, then
//! advances it. Every transition is one-way.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::profile::{HealthStatus, InsuranceType};

/// Health status used for pricing in a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthRegime {
    Healthy,
    Chronic,
    /// High-risk pricing for the remaining number of years, then chronic
    HighRisk { years_remaining: u32 },
}

impl HealthRegime {
    pub fn start(status: HealthStatus, high_risk_years: u32) -> Self {
        match status {
            HealthStatus::Healthy => HealthRegime::Healthy,
            HealthStatus::Chronic => HealthRegime::Chronic,
            HealthStatus::HighRisk if high_risk_years == 0 => HealthRegime::Chronic,
            HealthStatus::HighRisk => HealthRegime::HighRisk { years_remaining: high_risk_years },
        }
    }

    pub fn status(&self) -> HealthStatus {
        match self {
            HealthRegime::Healthy => HealthStatus::Healthy,
            HealthRegime::Chronic => HealthStatus::Chronic,
            HealthRegime::HighRisk { .. } => HealthStatus::HighRisk,
        }
    }

    /// Regime for the following year
    pub fn advance(self) -> Self {
        match self {
            HealthRegime::HighRisk { years_remaining } if years_remaining <= 1 => {
                debug!("high-risk period over, pricing as chronic");
                HealthRegime::Chronic
            }
            HealthRegime::HighRisk { years_remaining } => HealthRegime::HighRisk {
                years_remaining: years_remaining - 1,
            },
            other => other,
        }
    }
}

/// Coverage in force in a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageRegime {
    Employer,
    Marketplace,
    Uninsured,
    /// Employer plan replaced by Medicare-equivalent values
    Medicare,
}

impl CoverageRegime {
    pub fn start(insurance_type: InsuranceType) -> Self {
        match insurance_type {
            InsuranceType::Employer => CoverageRegime::Employer,
            InsuranceType::Marketplace => CoverageRegime::Marketplace,
            InsuranceType::None => CoverageRegime::Uninsured,
        }
    }

    /// Regime at an attained age. Only employer plans move to Medicare.
    pub fn at_age(self, age: i32, medicare_age: i32) -> Self {
        match self {
            CoverageRegime::Employer if age >= medicare_age => {
                debug!("age {}: employer plan switches to Medicare values", age);
                CoverageRegime::Medicare
            }
            other => other,
        }
    }
}

/// Earnings regime of one adult
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementRegime {
    Working,
    /// Income fixed from the last working year
    Retired { final_income: f64 },
}

impl RetirementRegime {
    /// Regime at an attained age. `last_income` is the most recent working-year
    /// income, or the entered income when the adult never worked in the projection.
    pub fn at_age(self, age: i32, retirement_age: i32, last_income: f64) -> Self {
        match self {
            RetirementRegime::Working if age >= retirement_age => {
                debug!("age {}: retired with final income {:.2}", age, last_income);
                RetirementRegime::Retired { final_income: last_income }
            }
            other => other,
        }
    }

    pub fn is_retired(&self) -> bool {
        matches!(self, RetirementRegime::Retired { .. })
    }
}

/// Post-retirement spending adjustment on household expenses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingRegime {
    /// Expenses follow inflation
    Inflating,
    /// Stepped down once; declines from `base` each later year
    SteppedDown { base: f64, years_since: u32 },
}

impl SpendingRegime {
    /// Expense for this year and the regime for the next. The step-down fires
    /// only in the first year past the retirement age.
    pub fn apply(
        self,
        age: i32,
        retirement_age: i32,
        inflated: f64,
        step_down: f64,
        annual_decline: f64,
    ) -> (f64, Self) {
        match self {
            SpendingRegime::Inflating if age == retirement_age + 1 => {
                let base = inflated * step_down;
                debug!("age {}: household spending steps down to {:.2}", age, base);
                (base, SpendingRegime::SteppedDown { base, years_since: 1 })
            }
            SpendingRegime::Inflating => (inflated, SpendingRegime::Inflating),
            SpendingRegime::SteppedDown { base, years_since } => {
                let value = base * (1.0 - annual_decline).powi(years_since as i32);
                (value, SpendingRegime::SteppedDown { base, years_since: years_since + 1 })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_high_risk_downgrade_is_one_way() {
        let mut regime = HealthRegime::start(HealthStatus::HighRisk, 10);
        let mut statuses = Vec::new();
        for _ in 0..30 {
            statuses.push(regime.status());
            regime = regime.advance();
        }
        assert!(statuses[..10].iter().all(|s| *s == HealthStatus::HighRisk));
        assert!(statuses[10..].iter().all(|s| *s == HealthStatus::Chronic));
    }

    #[test]
    fn test_zero_high_risk_years_starts_chronic() {
        assert_eq!(HealthRegime::start(HealthStatus::HighRisk, 0), HealthRegime::Chronic);
        assert_eq!(HealthRegime::Healthy.advance(), HealthRegime::Healthy);
    }

    #[test]
    fn test_only_employer_moves_to_medicare() {
        assert_eq!(CoverageRegime::Employer.at_age(64, 65), CoverageRegime::Employer);
        assert_eq!(CoverageRegime::Employer.at_age(65, 65), CoverageRegime::Medicare);
        assert_eq!(CoverageRegime::Marketplace.at_age(70, 65), CoverageRegime::Marketplace);
        assert_eq!(CoverageRegime::Uninsured.at_age(70, 65), CoverageRegime::Uninsured);
        assert_eq!(CoverageRegime::Medicare.at_age(60, 65), CoverageRegime::Medicare);
    }

    #[test]
    fn test_retirement_keeps_first_final_income() {
        let regime = RetirementRegime::Working.at_age(64, 65, 50_000.0);
        assert_eq!(regime, RetirementRegime::Working);

        let regime = regime.at_age(65, 65, 51_000.0);
        assert_eq!(regime, RetirementRegime::Retired { final_income: 51_000.0 });

        let regime = regime.at_age(66, 65, 99_999.0);
        assert_eq!(regime, RetirementRegime::Retired { final_income: 51_000.0 });
        assert!(regime.is_retired());
    }

    #[test]
    fn test_spending_step_down_then_decline() {
        let (v, regime) = SpendingRegime::Inflating.apply(65, 65, 1_000.0, 0.85, 0.01);
        assert_eq!(v, 1_000.0);

        let (v, regime) = regime.apply(66, 65, 1_100.0, 0.85, 0.01);
        assert_relative_eq!(v, 935.0);

        let (v, regime) = regime.apply(67, 65, 1_200.0, 0.85, 0.01);
        assert_relative_eq!(v, 935.0 * 0.99);

        let (v, _) = regime.apply(68, 65, 1_300.0, 0.85, 0.01);
        assert_relative_eq!(v, 935.0 * 0.99 * 0.99);
    }

    #[test]
    fn test_no_step_down_when_already_past_it() {
        let (v, regime) = SpendingRegime::Inflating.apply(70, 65, 1_000.0, 0.85, 0.01);
        assert_eq!(v, 1_000.0);
        assert_eq!(regime, SpendingRegime::Inflating);
    }
}
