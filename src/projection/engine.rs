//! Core projection engine: threads each component's output into the next

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::{ensure_aligned, ProjectionError};
use crate::profile::{HouseholdFinances, Profile, MAX_AGE};
use super::capital::{simulate_capital, CapitalStrategy};
use super::cashflows::{ProjectionResult, YearlyRow};
use super::drawdown::{run_drawdown, social_security_estimate, CoverageNeed, DrawdownInputs, DrawdownResult};
use super::household::project_household;
use super::insurance::{project_insurance, InsuranceInputs};
use super::long_term_care::project_long_term_care;

/// Whether household savings contributions continue once retired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsContributionPolicy {
    /// Contributions through the retirement age, none afterwards
    StopAtRetirement,
    Continue,
}

/// Post-retirement spending adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendingAdjustment {
    pub enabled: bool,
    /// Multiplier applied once, the first year past retirement age
    pub step_down: f64,
    /// Real decline per year after the step-down
    pub annual_decline: f64,
}

impl Default for SpendingAdjustment {
    fn default() -> Self {
        Self {
            enabled: true,
            step_down: 0.85,
            annual_decline: 0.01,
        }
    }
}

/// Social security estimate used in the drawdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSecurity {
    /// Share of final pre-retirement income
    pub ratio: f64,
    /// Income above this is ignored
    pub income_cap: f64,
    /// Annual cost-of-living adjustment (0 keeps it flat)
    pub cola: f64,
}

impl Default for SocialSecurity {
    fn default() -> Self {
        Self {
            ratio: 0.40,
            income_cap: 500_000.0,
            cola: 0.0,
        }
    }
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Last attained age projected
    pub end_age: i32,

    /// Overrides the number of projected years
    pub years: Option<usize>,

    pub retirement_age: i32,

    /// Annual growth of premiums, OOP, and long-term care
    pub healthcare_inflation: f64,

    /// Annual growth of household expenses and debt payments
    pub expense_inflation: f64,

    /// Years of high-risk pricing before the chronic downgrade
    pub high_risk_years: u32,

    /// Share of final working income kept in retirement
    pub retirement_income_ratio: f64,

    pub savings_policy: SavingsContributionPolicy,

    pub spending: SpendingAdjustment,

    pub social_security: SocialSecurity,

    /// Target share of final income to replace in retirement
    pub replacement_ratio: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            end_age: 85,
            years: None,
            retirement_age: 65,
            healthcare_inflation: 0.05,
            expense_inflation: 0.03,
            high_risk_years: 10,
            retirement_income_ratio: 0.40,
            savings_policy: SavingsContributionPolicy::StopAtRetirement,
            spending: SpendingAdjustment::default(),
            social_security: SocialSecurity::default(),
            replacement_ratio: 0.85,
        }
    }
}

impl ProjectionConfig {
    /// Projected years for a starting age: through `end_age` unless overridden
    pub fn years_for(&self, starting_age: i32) -> usize {
        self.years
            .unwrap_or_else(|| (self.end_age - starting_age + 1).max(0) as usize)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        for (label, age) in [("end age", self.end_age), ("retirement age", self.retirement_age)] {
            if age <= 0 || age > MAX_AGE {
                return Err(ProjectionError::invalid_config(format!(
                    "{} {} is outside 1..={}",
                    label, age, MAX_AGE
                )));
            }
        }
        if let Some(years) = self.years {
            if years > MAX_AGE as usize {
                return Err(ProjectionError::invalid_config(format!(
                    "{} projected years exceeds {}",
                    years, MAX_AGE
                )));
            }
        }
        let non_negative = [
            ("healthcare inflation", self.healthcare_inflation),
            ("expense inflation", self.expense_inflation),
            ("social security cola", self.social_security.cola),
            ("social security income cap", self.social_security.income_cap),
        ];
        for (label, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ProjectionError::invalid_config(format!("{} must be non-negative", label)));
            }
        }
        let fractions = [
            ("retirement income ratio", self.retirement_income_ratio),
            ("replacement ratio", self.replacement_ratio),
            ("social security ratio", self.social_security.ratio),
            ("spending step-down", self.spending.step_down),
            ("spending decline", self.spending.annual_decline),
        ];
        for (label, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProjectionError::invalid_config(format!(
                    "{} {} is outside [0, 1]",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Run the full projection for one household
    pub fn project(
        &self,
        profile: &Profile,
        finances: &HouseholdFinances,
        capital: Option<&CapitalStrategy>,
    ) -> Result<ProjectionResult, ProjectionError> {
        profile.validate()?;
        finances.validate()?;
        self.config.validate()?;

        let config = &self.config;
        let benchmarks = &self.assumptions.benchmarks;
        let years = config.years_for(profile.age);
        info!(
            "projecting {} years from age {} ({}, {}, {})",
            years, profile.age, profile.insurance_type, profile.health_status, profile.family_status
        );

        let insurance = project_insurance(
            &self.assumptions,
            &InsuranceInputs {
                insurance_type: profile.insurance_type,
                health_status: profile.health_status,
                family_status: profile.family_status,
                starting_age: profile.age,
                years,
                healthcare_inflation: config.healthcare_inflation,
                high_risk_years: config.high_risk_years,
                employer_premium_override: finances.annual_employer_premium,
            },
        )?;
        let long_term_care = project_long_term_care(
            finances.long_term_care.as_ref(),
            &benchmarks.long_term_care,
            profile.age,
            years,
            config.healthcare_inflation,
        );
        let household = project_household(profile, finances, benchmarks, config, years)?;

        ensure_aligned("premium", years, insurance.premium.len())?;
        ensure_aligned("oop_cost", years, insurance.oop.len())?;
        ensure_aligned("long_term_care", years, long_term_care.len())?;
        ensure_aligned("income", years, household.income.len())?;
        ensure_aligned("savings_balance", years, household.savings.len())?;
        ensure_aligned("household_expense", years, household.household_expense.len())?;
        ensure_aligned("debt_payment", years, household.debt_payment.len())?;

        let rows: Vec<YearlyRow> = (0..years)
            .map(|i| {
                let mut row = YearlyRow::new(i as u32, profile.age + i as i32);
                row.premium = insurance.premium[i];
                row.employer_premium = insurance.employer_premium[i];
                row.oop_cost = insurance.oop[i];
                row.long_term_care = long_term_care[i];
                row.household_expense = household.household_expense[i];
                row.debt_payment = household.debt_payment[i];
                row.income = household.income[i];
                row.savings_balance = household.savings[i];
                row.balance_401k = household.balance_401k[i];
                row.finalize();
                row
            })
            .collect();

        // First year at or past the retirement age
        let retirement_index = Some((config.retirement_age - profile.age).max(0) as usize).filter(|&i| i < years);

        let (drawdown, coverage_need) = match retirement_index {
            Some(idx) => {
                let final_income = household.final_income();
                let social_security = social_security_estimate(
                    final_income,
                    config.social_security.ratio,
                    config.social_security.income_cap,
                );
                let retired = &rows[idx..];
                let drawdown = run_drawdown(&DrawdownInputs {
                    ages: retired.iter().map(|r| r.age).collect(),
                    shortfall: retired.iter().map(|r| (-r.surplus).max(0.0)).collect(),
                    starting_pool: rows[idx].savings_balance + rows[idx].balance_401k,
                    pension: household.pension(),
                    social_security,
                    social_security_cola: config.social_security.cola,
                })?;
                let need = CoverageNeed::compute(
                    final_income,
                    config.replacement_ratio,
                    config.social_security.ratio,
                    years - idx,
                    rows[idx].balance_401k,
                );
                debug!(
                    "retirement at index {}: pool {:.2}, coverage need {:.2}",
                    idx, drawdown.starting_pool, need.total_need
                );
                (drawdown, Some(need))
            }
            None => (DrawdownResult::default(), None),
        };

        let capital = match capital {
            Some(strategy) => {
                let monthly_premium = rows
                    .first()
                    .map(|r| (r.premium + r.employer_premium) / 12.0)
                    .unwrap_or(0.0);
                Some(simulate_capital(
                    strategy,
                    finances.starting_savings,
                    monthly_premium,
                    benchmarks.digital_first_monthly,
                    profile.age,
                    years,
                )?)
            }
            None => None,
        };

        let result = ProjectionResult {
            rows,
            insurance,
            household,
            retirement_index,
            drawdown,
            coverage_need,
            capital,
        };
        info!(
            "projection complete: first deficit age {:?}, depletion age {:?}",
            result.first_deficit_age(),
            result.drawdown.depletion_age()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AdultFinances, FamilyStatus, Gender, HealthStatus, InsuranceType, LongTermCareElection};
    use crate::assumptions::LongTermCareTier;
    use crate::projection::regime::CoverageRegime;
    use approx::assert_relative_eq;

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(Assumptions::default(), ProjectionConfig::default())
    }

    fn profile(age: i32, health: HealthStatus, insurance: InsuranceType) -> Profile {
        Profile::new(age, Gender::Female, health, FamilyStatus::Single, insurance)
    }

    fn zero_balances() -> HouseholdFinances {
        HouseholdFinances {
            user: AdultFinances {
                monthly_gross_income: 5_000.0,
                starting_401k: 0.0,
                ..AdultFinances::default()
            },
            starting_savings: 0.0,
            ..HouseholdFinances::default()
        }
    }

    #[test]
    fn test_default_horizon_runs_to_85() {
        let result = engine()
            .project(&profile(30, HealthStatus::Healthy, InsuranceType::Employer), &zero_balances(), None)
            .unwrap();
        assert_eq!(result.rows.len(), 56);
        assert_eq!(result.rows.first().unwrap().age, 30);
        assert_eq!(result.rows.last().unwrap().age, 85);
        assert_eq!(result.retirement_index, Some(35));
        assert_eq!(result.drawdown.len(), 21);
    }

    #[test]
    fn test_employer_healthy_age_30_scenario() {
        let config = ProjectionConfig { years: Some(35), ..ProjectionConfig::default() };
        let engine = ProjectionEngine::new(Assumptions::default(), config);
        let result = engine
            .project(&profile(30, HealthStatus::Healthy, InsuranceType::Employer), &zero_balances(), None)
            .unwrap();

        assert_eq!(result.rows.len(), 35);
        assert_eq!(result.insurance.premium.len(), 35);
        assert_eq!(result.insurance.oop.len(), 35);
        assert_relative_eq!(result.rows[0].premium, 1_541.0);
        // No retirement year inside 35 years from 30
        assert_eq!(result.retirement_index, None);
        assert!(result.coverage_need.is_none());

        let config = ProjectionConfig { years: Some(36), ..ProjectionConfig::default() };
        let engine = ProjectionEngine::new(Assumptions::default(), config);
        let result = engine
            .project(&profile(30, HealthStatus::Healthy, InsuranceType::Employer), &zero_balances(), None)
            .unwrap();
        assert_eq!(result.rows[35].age, 65);
        assert_eq!(result.rows[35].premium, 1_800.0);
        assert_eq!(result.insurance.coverage[35], CoverageRegime::Medicare);
    }

    #[test]
    fn test_surplus_identity() {
        let mut finances = zero_balances();
        finances.long_term_care = Some(LongTermCareElection::Tier(LongTermCareTier::AssistedLiving));
        let result = engine()
            .project(&profile(60, HealthStatus::Chronic, InsuranceType::Marketplace), &finances, None)
            .unwrap();

        for r in &result.rows {
            let expected = r.income - r.household_expense - r.debt_payment - r.premium - r.oop_cost - r.long_term_care;
            assert_relative_eq!(r.surplus, expected, epsilon = 1e-6);
        }
        assert_eq!(result.rows[14].long_term_care, 0.0);
        assert!(result.rows[15].long_term_care > 0.0);
    }

    #[test]
    fn test_drawdown_uses_pool_at_retirement() {
        let mut finances = zero_balances();
        finances.starting_savings = 50_000.0;
        finances.user.starting_401k = 100_000.0;
        let result = engine()
            .project(&profile(60, HealthStatus::Healthy, InsuranceType::Employer), &finances, None)
            .unwrap();

        let idx = result.retirement_index.unwrap();
        assert_eq!(idx, 5);
        let expected_pool = result.rows[idx].savings_balance + result.rows[idx].balance_401k;
        assert_relative_eq!(result.drawdown.starting_pool, expected_pool);
        assert_eq!(result.drawdown.len(), result.rows.len() - idx);
        assert!(result.drawdown.capital_remaining.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_started_retired_household() {
        let result = engine()
            .project(&profile(70, HealthStatus::Healthy, InsuranceType::Marketplace), &HouseholdFinances::default(), None)
            .unwrap();
        assert_eq!(result.retirement_index, Some(0));
        assert_eq!(result.drawdown.len(), 16);
    }

    #[test]
    fn test_past_horizon_is_empty() {
        let result = engine()
            .project(&profile(90, HealthStatus::Healthy, InsuranceType::None), &HouseholdFinances::default(), None)
            .unwrap();
        assert!(result.rows.is_empty());
        assert!(result.drawdown.is_empty());
        assert_eq!(result.summary().total_years, 0);
    }

    #[test]
    fn test_invalid_inputs_block_projection() {
        let bad_profile = profile(0, HealthStatus::Healthy, InsuranceType::Employer);
        assert!(matches!(
            engine().project(&bad_profile, &HouseholdFinances::default(), None),
            Err(ProjectionError::InvalidProfile(_))
        ));

        let mut bad_finances = HouseholdFinances::default();
        bad_finances.user.growth_401k = -0.02;
        assert!(engine()
            .project(&profile(40, HealthStatus::Healthy, InsuranceType::Employer), &bad_finances, None)
            .is_err());

        let bad_config = ProjectionConfig { replacement_ratio: 1.5, ..ProjectionConfig::default() };
        let engine = ProjectionEngine::new(Assumptions::default(), bad_config);
        assert!(matches!(
            engine.project(&profile(40, HealthStatus::Healthy, InsuranceType::Employer), &HouseholdFinances::default(), None),
            Err(ProjectionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_horizon_and_ages_are_bounded() {
        let p = profile(40, HealthStatus::Healthy, InsuranceType::Employer);
        let bad_configs = [
            ProjectionConfig { years: Some(usize::MAX), ..ProjectionConfig::default() },
            ProjectionConfig { years: Some(121), ..ProjectionConfig::default() },
            ProjectionConfig { retirement_age: i32::MAX, years: Some(3), ..ProjectionConfig::default() },
            ProjectionConfig { end_age: i32::MAX, ..ProjectionConfig::default() },
            ProjectionConfig { end_age: 0, ..ProjectionConfig::default() },
        ];
        for config in bad_configs {
            assert!(matches!(config.validate(), Err(ProjectionError::InvalidConfig(_))));
            let engine = ProjectionEngine::new(Assumptions::default(), config);
            assert!(matches!(
                engine.project(&p, &HouseholdFinances::default(), None),
                Err(ProjectionError::InvalidConfig(_))
            ));
        }

        let edge = ProjectionConfig { years: Some(120), end_age: 120, retirement_age: 120, ..ProjectionConfig::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_capital_strategy_included() {
        let strategy = CapitalStrategy { savings_percent: 0.5, ..CapitalStrategy::default() };
        let result = engine()
            .project(
                &profile(40, HealthStatus::Healthy, InsuranceType::Employer),
                &HouseholdFinances::default(),
                Some(&strategy),
            )
            .unwrap();
        let capital = result.capital.as_ref().unwrap();
        assert_eq!(capital.len(), result.rows.len());
        assert_eq!(capital.initial_capital, 10_000.0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let p = profile(45, HealthStatus::HighRisk, InsuranceType::Marketplace);
        let a = engine().project(&p, &HouseholdFinances::default(), None).unwrap();
        let b = engine().project(&p, &HouseholdFinances::default(), None).unwrap();
        assert_eq!(a, b);
    }
}
