//! Retirement drawdown: consume the capital pool to cover income shortfalls

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Inputs for the retirement years of a projection
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownInputs {
    /// Attained age of the primary adult for each retirement year
    pub ages: Vec<i32>,
    /// Income shortfall per retirement year (clamped to >= 0 by the caller)
    pub shortfall: Vec<f64>,
    /// Savings + 401(k) at the retirement boundary
    pub starting_pool: f64,
    /// Constant annual pension
    pub pension: f64,
    /// Social security in the first retirement year
    pub social_security: f64,
    /// Annual cost-of-living adjustment on social security (0 = flat)
    pub social_security_cola: f64,
}

/// Per-year drawdown records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownResult {
    pub ages: Vec<i32>,
    pub starting_pool: f64,
    pub capital_used: Vec<f64>,
    pub capital_remaining: Vec<f64>,
    pub unfunded_gap: Vec<f64>,
    pub pension: Vec<f64>,
    pub social_security: Vec<f64>,
}

impl DrawdownResult {
    pub fn len(&self) -> usize {
        self.capital_used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capital_used.is_empty()
    }

    /// First age at which the pool is exhausted
    pub fn depletion_age(&self) -> Option<i32> {
        if self.starting_pool <= 0.0 {
            return None;
        }
        self.capital_remaining
            .iter()
            .position(|&r| r <= 0.0)
            .map(|i| self.ages[i])
    }

    pub fn total_unfunded_gap(&self) -> f64 {
        self.unfunded_gap.iter().sum()
    }
}

/// Run the drawdown over every retirement year. The pool only ever shrinks and
/// the loop records all years, including those after depletion.
pub fn run_drawdown(inputs: &DrawdownInputs) -> Result<DrawdownResult, ProjectionError> {
    let years = inputs.shortfall.len();
    crate::error::ensure_aligned("drawdown ages", years, inputs.ages.len())?;
    if inputs.starting_pool < 0.0 || inputs.pension < 0.0 || inputs.social_security < 0.0 {
        return Err(ProjectionError::invalid_config("drawdown amounts must be non-negative"));
    }

    let mut result = DrawdownResult {
        ages: inputs.ages.clone(),
        starting_pool: inputs.starting_pool,
        capital_used: Vec::with_capacity(years),
        capital_remaining: Vec::with_capacity(years),
        unfunded_gap: Vec::with_capacity(years),
        pension: Vec::with_capacity(years),
        social_security: Vec::with_capacity(years),
    };

    let mut pool = inputs.starting_pool;

    for (k, &shortfall) in inputs.shortfall.iter().enumerate() {
        let social_security = inputs.social_security * (1.0 + inputs.social_security_cola).powi(k as i32);
        let income = inputs.pension + social_security;

        let uncovered = (shortfall.max(0.0) - income).max(0.0);
        let used = uncovered.min(pool);
        pool -= used;
        let gap = (uncovered - used).max(0.0);

        result.capital_used.push(used);
        result.capital_remaining.push(pool);
        result.unfunded_gap.push(gap);
        result.pension.push(inputs.pension);
        result.social_security.push(social_security);
    }

    if let Some(age) = result.depletion_age() {
        debug!("drawdown pool of {:.2} depleted at age {}", inputs.starting_pool, age);
    }

    Ok(result)
}

/// Social security estimate: a share of final pre-retirement income, with the
/// income capped first
pub fn social_security_estimate(final_income: f64, ratio: f64, income_cap: f64) -> f64 {
    ratio * final_income.min(income_cap).max(0.0)
}

/// Savings needed to replace income through retirement beyond social security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageNeed {
    pub final_income: f64,
    /// Yearly income gap after social security
    pub annual_gap: f64,
    pub retirement_years: usize,
    pub total_need: f64,
    pub balance_401k_at_retirement: f64,
    /// Positive when the 401(k) falls short of the need
    pub shortfall: f64,
}

impl CoverageNeed {
    pub fn compute(
        final_income: f64,
        replacement_ratio: f64,
        social_security_ratio: f64,
        retirement_years: usize,
        balance_401k_at_retirement: f64,
    ) -> Self {
        let annual_gap = final_income * (replacement_ratio - social_security_ratio).max(0.0);
        let total_need = annual_gap * retirement_years as f64;

        Self {
            final_income,
            annual_gap,
            retirement_years,
            total_need,
            balance_401k_at_retirement,
            shortfall: (total_need - balance_401k_at_retirement).max(0.0),
        }
    }

    pub fn is_covered(&self) -> bool {
        self.shortfall <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(shortfall: Vec<f64>, pool: f64) -> DrawdownInputs {
        DrawdownInputs {
            ages: (65..65 + shortfall.len() as i32).collect(),
            shortfall,
            starting_pool: pool,
            pension: 10_000.0,
            social_security: 20_000.0,
            social_security_cola: 0.0,
        }
    }

    #[test]
    fn test_pool_covers_uncovered_shortfall() {
        let r = run_drawdown(&inputs(vec![50_000.0, 25_000.0], 100_000.0)).unwrap();
        assert_eq!(r.capital_used, vec![20_000.0, 0.0]);
        assert_eq!(r.capital_remaining, vec![80_000.0, 80_000.0]);
        assert_eq!(r.unfunded_gap, vec![0.0, 0.0]);
        assert_eq!(r.depletion_age(), None);
    }

    #[test]
    fn test_depletion_is_monotone_and_gap_positive() {
        let shortfall = vec![60_000.0, 60_000.0, 10_000.0, 60_000.0, 45_000.0];
        let r = run_drawdown(&inputs(shortfall.clone(), 50_000.0)).unwrap();

        assert_eq!(r.len(), 5);
        assert!(r.capital_remaining.windows(2).all(|w| w[1] <= w[0]));

        let depleted = r.capital_remaining.iter().position(|&x| x == 0.0).unwrap();
        assert_eq!(depleted, 1);
        assert_eq!(r.depletion_age(), Some(66));
        for j in depleted..shortfall.len() {
            assert_eq!(r.capital_remaining[j], 0.0);
            if shortfall[j] > 30_000.0 {
                assert!(r.unfunded_gap[j] > 0.0);
            }
        }
        // A surplus year never replenishes the pool
        assert_eq!(r.unfunded_gap[2], 0.0);
        assert_relative_eq!(r.unfunded_gap[1], 30_000.0 - 20_000.0);
    }

    #[test]
    fn test_social_security_cola() {
        let mut i = inputs(vec![0.0; 3], 0.0);
        i.social_security_cola = 0.02;
        let r = run_drawdown(&i).unwrap();
        assert_relative_eq!(r.social_security[2], 20_000.0 * 1.02f64.powi(2));
    }

    #[test]
    fn test_empty_horizon() {
        let r = run_drawdown(&inputs(Vec::new(), 100_000.0)).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_social_security_cap() {
        assert_relative_eq!(social_security_estimate(60_000.0, 0.4, 500_000.0), 24_000.0);
        assert_relative_eq!(social_security_estimate(900_000.0, 0.4, 500_000.0), 200_000.0);
    }

    #[test]
    fn test_coverage_need() {
        let need = CoverageNeed::compute(100_000.0, 0.85, 0.40, 20, 500_000.0);
        assert_relative_eq!(need.annual_gap, 45_000.0);
        assert_relative_eq!(need.total_need, 900_000.0);
        assert_relative_eq!(need.shortfall, 400_000.0);
        assert!(!need.is_covered());
    }
}
