//! Household financial projector: income, 401(k), savings, and expenses

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assumptions::Benchmarks;
use crate::error::{ensure_aligned, ProjectionError};
use crate::profile::{AdultFinances, HouseholdFinances, Profile};
use super::engine::{ProjectionConfig, SavingsContributionPolicy};
use super::regime::{RetirementRegime, SpendingRegime};

/// Year-indexed series for one adult
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdultProjection {
    pub income: Vec<f64>,
    pub balance_401k: Vec<f64>,
    pub retired: Vec<bool>,
    /// Income the retirement replacement is based on
    pub final_income: f64,
    /// Annual pension paid once retired
    pub pension: f64,
}

impl AdultProjection {
    /// All-zero series for an absent adult
    pub fn zeros(years: usize) -> Self {
        Self {
            income: vec![0.0; years],
            balance_401k: vec![0.0; years],
            retired: vec![false; years],
            final_income: 0.0,
            pension: 0.0,
        }
    }
}

/// Project one adult's income and 401(k) balance.
///
/// Income grows from net pay while working. From the retirement age it is a
/// fixed share of the last working year's income plus the pension. The 401(k)
/// takes contributions through the retirement age and only grows afterwards.
pub fn project_adult(
    finances: &AdultFinances,
    pension: f64,
    starting_age: i32,
    years: usize,
    config: &ProjectionConfig,
) -> Result<AdultProjection, ProjectionError> {
    finances.validate("adult")?;
    if pension < 0.0 {
        return Err(ProjectionError::invalid_profile("pension must be non-negative"));
    }

    let net_income = finances.net_annual_income();
    let contribution = finances.annual_401k_contribution();
    let growth = finances.growth_401k;

    let mut out = AdultProjection {
        income: Vec::with_capacity(years),
        balance_401k: Vec::with_capacity(years),
        retired: Vec::with_capacity(years),
        final_income: net_income,
        pension,
    };

    let mut regime = RetirementRegime::Working;
    let mut last_income = net_income;
    let mut balance = finances.starting_401k;

    for i in 0..years {
        let age = starting_age + i as i32;
        regime = regime.at_age(age, config.retirement_age, last_income);

        let income = match regime {
            RetirementRegime::Working => {
                let income = net_income * (1.0 + finances.income_growth).powi(i as i32);
                last_income = income;
                income
            }
            RetirementRegime::Retired { final_income } => {
                config.retirement_income_ratio * final_income + pension
            }
        };

        balance = if age <= config.retirement_age {
            (balance + contribution) * (1.0 + growth)
        } else {
            balance * (1.0 + growth)
        };

        out.income.push(income);
        out.balance_401k.push(balance);
        out.retired.push(regime.is_retired());
    }

    out.final_income = match regime {
        RetirementRegime::Retired { final_income } => final_income,
        RetirementRegime::Working => last_income,
    };

    Ok(out)
}

/// Combined household series. Every column has the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdProjection {
    pub user: AdultProjection,
    /// All-zero when there is no earning partner
    pub partner: AdultProjection,
    pub income: Vec<f64>,
    pub balance_401k: Vec<f64>,
    pub savings: Vec<f64>,
    pub household_expense: Vec<f64>,
    pub debt_payment: Vec<f64>,
}

impl HouseholdProjection {
    pub fn len(&self) -> usize {
        self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
    }

    /// Combined final pre-retirement income of both adults
    pub fn final_income(&self) -> f64 {
        self.user.final_income + self.partner.final_income
    }

    /// Combined annual pension of both adults
    pub fn pension(&self) -> f64 {
        self.user.pension + self.partner.pension
    }
}

/// Project the household: each adult independently, then combined, plus the
/// household savings, expense, and debt series gated by the primary adult's age.
pub fn project_household(
    profile: &Profile,
    finances: &HouseholdFinances,
    benchmarks: &Benchmarks,
    config: &ProjectionConfig,
    years: usize,
) -> Result<HouseholdProjection, ProjectionError> {
    finances.validate()?;
    if config.expense_inflation < 0.0 {
        return Err(ProjectionError::invalid_config("expense inflation must be non-negative"));
    }

    let user_pension = finances.user.pension.annual_amount(&benchmarks.pensions);
    let user = project_adult(&finances.user, user_pension, profile.age, years, config)?;

    let partner = match (&profile.partner, &finances.partner) {
        (Some(partner), Some(partner_finances)) => {
            let pension = partner_finances.pension.annual_amount(&benchmarks.pensions);
            project_adult(partner_finances, pension, partner.age, years, config)?
        }
        (Some(_), None) => AdultProjection::zeros(years),
        (None, Some(_)) => {
            return Err(ProjectionError::invalid_profile(
                "partner finances given but the profile has no partner",
            ))
        }
        (None, None) => AdultProjection::zeros(years),
    };

    let income = sum_columns("partner income", &user.income, &partner.income)?;
    let balance_401k = sum_columns("partner 401(k)", &user.balance_401k, &partner.balance_401k)?;

    let savings = project_savings(finances, profile.age, years, config);
    let household_expense = project_household_expense(
        finances.monthly_household_expenses,
        profile.age,
        years,
        config,
    );
    let debt_payment = project_debt(finances, years, config.expense_inflation);

    debug!(
        "household projection: {} years, combined final income {:.2}",
        years,
        user.final_income + partner.final_income
    );

    Ok(HouseholdProjection {
        user,
        partner,
        income,
        balance_401k,
        savings,
        household_expense,
        debt_payment,
    })
}

fn project_savings(finances: &HouseholdFinances, starting_age: i32, years: usize, config: &ProjectionConfig) -> Vec<f64> {
    let mut balance = finances.starting_savings;
    let mut out = Vec::with_capacity(years);

    for i in 0..years {
        let age = starting_age + i as i32;
        let contributing = match config.savings_policy {
            SavingsContributionPolicy::StopAtRetirement => age <= config.retirement_age,
            SavingsContributionPolicy::Continue => true,
        };
        let contribution = if contributing { finances.annual_savings_contribution } else { 0.0 };

        balance = (balance + contribution) * (1.0 + finances.savings_growth);
        out.push(balance);
    }

    out
}

fn project_household_expense(monthly: f64, starting_age: i32, years: usize, config: &ProjectionConfig) -> Vec<f64> {
    let spending = &config.spending;
    let mut regime = SpendingRegime::Inflating;
    let mut out = Vec::with_capacity(years);

    for i in 0..years {
        let inflated = monthly * 12.0 * (1.0 + config.expense_inflation).powi(i as i32);
        if !spending.enabled {
            out.push(inflated);
            continue;
        }
        let age = starting_age + i as i32;
        let (value, next) = regime.apply(
            age,
            config.retirement_age,
            inflated,
            spending.step_down,
            spending.annual_decline,
        );
        out.push(value);
        regime = next;
    }

    out
}

fn project_debt(finances: &HouseholdFinances, years: usize, inflation: f64) -> Vec<f64> {
    let annual = finances.monthly_debt_payment * 12.0;
    let paid_off = finances.debt_years_remaining.map(|y| y as usize).unwrap_or(usize::MAX);

    (0..years)
        .map(|i| if i < paid_off { annual * (1.0 + inflation).powi(i as i32) } else { 0.0 })
        .collect()
}

/// Element-wise sum of two year-indexed columns
pub(crate) fn sum_columns(column: &'static str, a: &[f64], b: &[f64]) -> Result<Vec<f64>, ProjectionError> {
    ensure_aligned(column, a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}
