//! Load households for batch runs from CSV

use csv::Reader;
use std::path::Path;

use super::{
    AdultFinances, FamilyStatus, Gender, HealthStatus, HouseholdFinances, InsuranceType, Pension,
    Profile,
};
use crate::error::LoadError;

/// One household from a batch file
#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    pub household_id: String,
    pub profile: Profile,
    pub finances: HouseholdFinances,
}

/// Raw CSV row. Partner columns may be left empty.
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    household_id: String,
    age: i32,
    gender: String,
    health_status: String,
    family_status: String,
    insurance_type: String,
    partner_age: Option<i32>,
    partner_health_status: Option<String>,
    dependent_ages: Option<String>,
    monthly_gross_income: f64,
    partner_monthly_gross_income: Option<f64>,
    tax_rate: f64,
    starting_savings: f64,
    starting_401k: f64,
    employee_401k_contribution: f64,
    employer_401k_match: f64,
    annual_pension: f64,
    monthly_household_expenses: f64,
    monthly_debt_payment: f64,
}

impl CsvRow {
    fn to_household(self) -> Result<Household, LoadError> {
        let health_status: HealthStatus = self.health_status.parse()?;
        let mut profile = Profile::new(
            self.age,
            self.gender.parse::<Gender>()?,
            health_status,
            self.family_status.parse::<FamilyStatus>()?,
            self.insurance_type.parse::<InsuranceType>()?,
        );

        if let Some(partner_age) = self.partner_age {
            let partner_health = match self.partner_health_status.as_deref() {
                Some(s) if !s.trim().is_empty() => s.parse()?,
                _ => health_status,
            };
            profile = profile.with_partner(partner_age, partner_health);
        }

        // Batch files carry dependent ages only
        if let Some(ages) = self.dependent_ages.as_deref() {
            for age in ages.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                let age: i32 = age.parse().map_err(|_| LoadError::Parse {
                    file: "households".to_string(),
                    value: age.to_string(),
                    expected: "dependent age",
                })?;
                profile = profile.with_dependent(age, HealthStatus::Healthy);
            }
        }

        let pension = if self.annual_pension > 0.0 {
            Pension::Annual { amount: self.annual_pension }
        } else {
            Pension::None
        };

        let user = AdultFinances {
            monthly_gross_income: self.monthly_gross_income,
            tax_rate: self.tax_rate,
            starting_401k: self.starting_401k,
            employee_401k_contribution: self.employee_401k_contribution,
            employer_401k_match: self.employer_401k_match,
            pension,
            ..AdultFinances::default()
        };
        let partner = self.partner_monthly_gross_income.map(|income| AdultFinances {
            monthly_gross_income: income,
            tax_rate: self.tax_rate,
            ..AdultFinances::default()
        });

        let finances = HouseholdFinances {
            user,
            partner,
            starting_savings: self.starting_savings,
            monthly_household_expenses: self.monthly_household_expenses,
            monthly_debt_payment: self.monthly_debt_payment,
            ..HouseholdFinances::default()
        };

        profile.validate()?;
        finances.validate()?;

        Ok(Household {
            household_id: self.household_id,
            profile,
            finances,
        })
    }
}

/// Load all households from a CSV file
pub fn load_households<P: AsRef<Path>>(path: P) -> Result<Vec<Household>, LoadError> {
    let reader = Reader::from_path(path)?;
    collect_households(reader)
}

/// Load households from any reader (e.g., string buffer, request body)
pub fn load_households_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Household>, LoadError> {
    collect_households(Reader::from_reader(reader))
}

fn collect_households<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Household>, LoadError> {
    let mut households = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        households.push(row.to_household()?);
    }

    Ok(households)
}
