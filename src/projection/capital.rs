//! Capital care fund: three growth buckets with vesting rules
//!
//! Each year's contribution is split across short-, mid-, and long-term
//! buckets. The fund value compounds everything allocated; the available
//! (vested) value only counts what the bucket's vesting rule releases.

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Tolerance on the allocation sum
pub const ALLOCATION_TOLERANCE: f64 = 1e-6;

/// Where contributions to the fund come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    /// A share of current savings seeds the fund once
    Savings,
    /// A fixed monthly contribution every year
    Income,
}

/// Bucket fractions; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub short: f64,
    pub mid: f64,
    pub long: f64,
}

impl Allocation {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        for (name, value) in [("short", self.short), ("mid", self.mid), ("long", self.long)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProjectionError::invalid_config(format!(
                    "{} allocation {} is outside [0, 1]",
                    name, value
                )));
            }
        }
        let total = self.short + self.mid + self.long;
        if (total - 1.0).abs() > ALLOCATION_TOLERANCE {
            return Err(ProjectionError::invalid_config(format!(
                "allocation fractions sum to {}, expected 1.0",
                total
            )));
        }
        Ok(())
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self { short: 0.2, mid: 0.3, long: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketGrowth {
    pub short: f64,
    pub mid: f64,
    pub long: f64,
}

impl Default for BucketGrowth {
    fn default() -> Self {
        Self { short: 0.03, mid: 0.05, long: 0.07 }
    }
}

/// When the long-term bucket becomes available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LongTermLock {
    /// Vests fully once the household reaches this age
    UntilAge { age: i32 },
    /// Locked for a number of years set by the starting age band
    AgeBanded,
}

impl LongTermLock {
    /// Lock period by starting age: younger households lock longer
    pub fn banded_years(starting_age: i32) -> u32 {
        if starting_age < 30 {
            30
        } else if starting_age < 40 {
            20
        } else if starting_age < 50 {
            15
        } else if starting_age < 60 {
            10
        } else {
            5
        }
    }

    pub fn is_vested(&self, starting_age: i32, year_index: usize) -> bool {
        match self {
            LongTermLock::UntilAge { age } => starting_age + year_index as i32 >= *age,
            LongTermLock::AgeBanded => year_index >= Self::banded_years(starting_age) as usize,
        }
    }
}

impl Default for LongTermLock {
    fn default() -> Self {
        LongTermLock::UntilAge { age: 65 }
    }
}

/// Capital strategy chosen by the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalStrategy {
    pub funding_source: FundingSource,
    /// Share of current savings used to seed the fund (savings funding)
    pub savings_percent: f64,
    /// Monthly contribution (income funding)
    pub monthly_contribution: f64,
    /// Redirect premium spending above the digital-first benchmark
    pub reallocate_premium: bool,
    pub allocation: Allocation,
    pub growth: BucketGrowth,
    pub long_term_lock: LongTermLock,
    /// Short bucket rolling vesting window in years
    pub short_vesting_years: usize,
    /// Mid bucket rolling vesting window in years
    pub mid_vesting_years: usize,
}

impl Default for CapitalStrategy {
    fn default() -> Self {
        Self {
            funding_source: FundingSource::Savings,
            savings_percent: 0.0,
            monthly_contribution: 0.0,
            reallocate_premium: false,
            allocation: Allocation::default(),
            growth: BucketGrowth::default(),
            long_term_lock: LongTermLock::default(),
            short_vesting_years: 2,
            mid_vesting_years: 5,
        }
    }
}

impl CapitalStrategy {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        self.allocation.validate()?;
        if !(0.0..=1.0).contains(&self.savings_percent) {
            return Err(ProjectionError::invalid_config(format!(
                "savings percent {} is outside [0, 1]",
                self.savings_percent
            )));
        }
        if self.monthly_contribution < 0.0 {
            return Err(ProjectionError::invalid_config("monthly contribution must be non-negative"));
        }
        for rate in [self.growth.short, self.growth.mid, self.growth.long] {
            if rate < 0.0 {
                return Err(ProjectionError::invalid_config("bucket growth must be non-negative"));
            }
        }
        Ok(())
    }
}

/// Per-year bucket allocations and fund values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalResult {
    pub initial_capital: f64,
    /// Monthly amount added each year, including any premium reallocation
    pub monthly_contribution: f64,
    pub short_allocated: Vec<f64>,
    pub mid_allocated: Vec<f64>,
    pub long_allocated: Vec<f64>,
    pub short_vested: Vec<f64>,
    pub mid_vested: Vec<f64>,
    pub long_vested: Vec<f64>,
    /// Everything allocated, compounded, regardless of vesting
    pub fund_value: Vec<f64>,
    /// Liquid under the vesting rules
    pub available: Vec<f64>,
}

impl CapitalResult {
    pub fn len(&self) -> usize {
        self.fund_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fund_value.is_empty()
    }
}

/// Sum over j in [max(0, i - window), i] of allocated[j] x (1 + rate)^(i - j)
fn rolling_vested(allocated: &[f64], rate: f64, i: usize, window: usize) -> f64 {
    let start = i.saturating_sub(window);
    (start..=i)
        .map(|j| allocated[j] * (1.0 + rate).powi((i - j) as i32))
        .sum()
}

/// Simulate the capital fund.
///
/// `current_savings` seeds the fund under savings funding. `monthly_premium`
/// is the household's current total monthly premium, used for reallocation
/// against `benchmark_monthly`.
pub fn simulate_capital(
    strategy: &CapitalStrategy,
    current_savings: f64,
    monthly_premium: f64,
    benchmark_monthly: f64,
    starting_age: i32,
    years: usize,
) -> Result<CapitalResult, ProjectionError> {
    strategy.validate()?;

    let (initial_capital, mut monthly) = match strategy.funding_source {
        FundingSource::Savings => (current_savings.max(0.0) * strategy.savings_percent, 0.0),
        FundingSource::Income => (0.0, strategy.monthly_contribution),
    };
    if strategy.reallocate_premium {
        monthly += (monthly_premium - benchmark_monthly).max(0.0);
    }

    let alloc = strategy.allocation;
    let growth = strategy.growth;

    let mut out = CapitalResult {
        initial_capital,
        monthly_contribution: monthly,
        ..CapitalResult::default()
    };

    let (mut short_bal, mut mid_bal, mut long_bal) = (0.0, 0.0, 0.0);

    for i in 0..years {
        let seed = if i == 0 { initial_capital } else { 0.0 };
        let contribution = seed + monthly * 12.0;

        out.short_allocated.push(contribution * alloc.short);
        out.mid_allocated.push(contribution * alloc.mid);
        out.long_allocated.push(contribution * alloc.long);

        short_bal = short_bal * (1.0 + growth.short) + out.short_allocated[i];
        mid_bal = mid_bal * (1.0 + growth.mid) + out.mid_allocated[i];
        long_bal = long_bal * (1.0 + growth.long) + out.long_allocated[i];

        let short_vested = rolling_vested(&out.short_allocated, growth.short, i, strategy.short_vesting_years);
        let mid_vested = rolling_vested(&out.mid_allocated, growth.mid, i, strategy.mid_vesting_years);
        let long_vested = if strategy.long_term_lock.is_vested(starting_age, i) {
            long_bal
        } else {
            0.0
        };

        out.short_vested.push(short_vested);
        out.mid_vested.push(mid_vested);
        out.long_vested.push(long_vested);
        out.fund_value.push(short_bal + mid_bal + long_bal);
        out.available.push(short_vested + mid_vested + long_vested);
    }

    Ok(out)
}
