//! Financial inputs per adult and per household

use serde::{Deserialize, Serialize};

use crate::assumptions::{LongTermCareCosts, LongTermCareTier, PensionDefaults, PensionType};
use crate::error::ProjectionError;

/// Annual pension received from retirement onward
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Pension {
    #[default]
    None,
    /// Known annual amount
    Annual { amount: f64 },
    /// Typical amount for the sponsor type
    Typical { pension_type: PensionType },
}

impl Pension {
    pub fn annual_amount(&self, defaults: &PensionDefaults) -> f64 {
        match self {
            Pension::None => 0.0,
            Pension::Annual { amount } => *amount,
            Pension::Typical { pension_type } => defaults.for_type(*pension_type),
        }
    }
}

/// Earnings and retirement accounts of one adult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdultFinances {
    pub monthly_gross_income: f64,

    /// Flat effective tax rate in [0, 1]
    pub tax_rate: f64,

    /// Annual income growth while working
    pub income_growth: f64,

    pub starting_401k: f64,

    /// Annual employee 401(k) contribution, deducted pre-tax
    pub employee_401k_contribution: f64,

    /// Annual employer match
    pub employer_401k_match: f64,

    pub growth_401k: f64,

    pub pension: Pension,
}

impl AdultFinances {
    /// Total annual 401(k) deposit
    pub fn annual_401k_contribution(&self) -> f64 {
        self.employee_401k_contribution + self.employer_401k_match
    }

    /// Annual take-home pay after the pre-tax 401(k) deferral
    pub fn net_annual_income(&self) -> f64 {
        (self.monthly_gross_income - self.employee_401k_contribution / 12.0) * (1.0 - self.tax_rate) * 12.0
    }

    pub fn validate(&self, who: &str) -> Result<(), ProjectionError> {
        let non_negative = [
            ("monthly gross income", self.monthly_gross_income),
            ("income growth", self.income_growth),
            ("starting 401(k)", self.starting_401k),
            ("employee 401(k) contribution", self.employee_401k_contribution),
            ("employer 401(k) match", self.employer_401k_match),
            ("401(k) growth", self.growth_401k),
        ];
        for (label, value) in non_negative {
            check_non_negative(who, label, value)?;
        }
        if let Pension::Annual { amount } = self.pension {
            check_non_negative(who, "pension", amount)?;
        }

        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(ProjectionError::invalid_profile(format!(
                "{} tax rate {} is outside [0, 1]",
                who, self.tax_rate
            )));
        }
        if self.employee_401k_contribution / 12.0 > self.monthly_gross_income {
            return Err(ProjectionError::invalid_profile(format!(
                "{} 401(k) contribution exceeds gross income",
                who
            )));
        }

        Ok(())
    }
}

impl Default for AdultFinances {
    fn default() -> Self {
        Self {
            monthly_gross_income: 5_000.0,
            tax_rate: 0.25,
            income_growth: 0.02,
            starting_401k: 0.0,
            employee_401k_contribution: 0.0,
            employer_401k_match: 0.0,
            growth_401k: 0.05,
            pension: Pension::None,
        }
    }
}

/// Optional long-term-care election
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongTermCareElection {
    Tier(LongTermCareTier),
    Custom { monthly_cost: f64 },
}

impl LongTermCareElection {
    pub fn monthly_cost(&self, costs: &LongTermCareCosts) -> f64 {
        match self {
            LongTermCareElection::Tier(tier) => costs.monthly_cost(*tier),
            LongTermCareElection::Custom { monthly_cost } => *monthly_cost,
        }
    }
}

/// Household-level balances and spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdFinances {
    pub user: AdultFinances,

    /// Earnings of the partner; absent means a non-earning partner or none
    pub partner: Option<AdultFinances>,

    pub starting_savings: f64,

    pub annual_savings_contribution: f64,

    pub savings_growth: f64,

    pub monthly_household_expenses: f64,

    pub monthly_debt_payment: f64,

    /// Years until debt is paid off; None means it runs the whole horizon
    pub debt_years_remaining: Option<u32>,

    /// Overrides the table employer premium share
    pub annual_employer_premium: Option<f64>,

    pub long_term_care: Option<LongTermCareElection>,
}

impl HouseholdFinances {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        self.user.validate("user")?;
        if let Some(partner) = &self.partner {
            partner.validate("partner")?;
        }

        check_non_negative("household", "starting savings", self.starting_savings)?;
        check_non_negative("household", "savings contribution", self.annual_savings_contribution)?;
        check_non_negative("household", "savings growth", self.savings_growth)?;
        check_non_negative("household", "monthly expenses", self.monthly_household_expenses)?;
        check_non_negative("household", "monthly debt payment", self.monthly_debt_payment)?;
        if let Some(share) = self.annual_employer_premium {
            check_non_negative("household", "employer premium", share)?;
        }
        if let Some(LongTermCareElection::Custom { monthly_cost }) = self.long_term_care {
            check_non_negative("household", "long-term-care cost", monthly_cost)?;
        }

        Ok(())
    }
}

impl Default for HouseholdFinances {
    fn default() -> Self {
        Self {
            user: AdultFinances::default(),
            partner: None,
            starting_savings: 20_000.0,
            annual_savings_contribution: 1_200.0,
            savings_growth: 0.03,
            monthly_household_expenses: 6_440.0,
            monthly_debt_payment: 1_500.0,
            debt_years_remaining: None,
            annual_employer_premium: None,
            long_term_care: None,
        }
    }
}

fn check_non_negative(who: &str, label: &str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::invalid_profile(format!(
            "{} {} must be a non-negative number, got {}",
            who, label, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_net_income_deducts_401k_before_tax() {
        let adult = AdultFinances {
            monthly_gross_income: 6_000.0,
            employee_401k_contribution: 12_000.0,
            tax_rate: 0.2,
            ..AdultFinances::default()
        };
        // (6000 - 1000) * 0.8 * 12
        assert_relative_eq!(adult.net_annual_income(), 48_000.0);
        assert_relative_eq!(AdultFinances::default().net_annual_income(), 45_000.0);
    }

    #[test]
    fn test_pension_amounts() {
        let defaults = PensionDefaults::default();
        assert_eq!(Pension::default(), Pension::None);
        assert_eq!(Pension::None.annual_amount(&defaults), 0.0);
        assert_eq!(Pension::Annual { amount: 12_000.0 }.annual_amount(&defaults), 12_000.0);
        assert_eq!(
            Pension::Typical { pension_type: PensionType::Federal }.annual_amount(&defaults),
            30_000.0
        );
    }

    #[test]
    fn test_validation_rejects_negative_rates() {
        let mut finances = HouseholdFinances::default();
        assert!(finances.validate().is_ok());

        finances.savings_growth = -0.01;
        assert!(matches!(finances.validate(), Err(ProjectionError::InvalidProfile(_))));

        let mut finances = HouseholdFinances::default();
        finances.user.employee_401k_contribution = -100.0;
        assert!(finances.validate().is_err());

        let mut finances = HouseholdFinances::default();
        finances.user.tax_rate = 1.5;
        assert!(finances.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let finances: HouseholdFinances =
            serde_json::from_str(r#"{"starting_savings": 5000.0, "user": {"monthly_gross_income": 7000.0}}"#)
                .unwrap();
        assert_eq!(finances.starting_savings, 5_000.0);
        assert_eq!(finances.user.monthly_gross_income, 7_000.0);
        assert_eq!(finances.user.tax_rate, 0.25);
        assert_eq!(finances.monthly_household_expenses, 6_440.0);
    }

    #[test]
    fn test_long_term_care_election_serde() {
        let tier: LongTermCareElection = serde_json::from_str(r#"{"tier": "nursing_home_private"}"#).unwrap();
        assert_eq!(tier.monthly_cost(&LongTermCareCosts::default()), 10_646.0);

        let custom: LongTermCareElection = serde_json::from_str(r#"{"custom": {"monthly_cost": 4000.0}}"#).unwrap();
        assert_eq!(custom.monthly_cost(&LongTermCareCosts::default()), 4_000.0);
    }
}
