//! Insurance cost projector: premium, employer premium, and OOP per year

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::ProjectionError;
use crate::profile::{FamilyStatus, HealthStatus, InsuranceType};
use super::regime::{CoverageRegime, HealthRegime};

/// Inputs for one insured individual (or household plan)
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceInputs {
    pub insurance_type: InsuranceType,
    pub health_status: HealthStatus,
    pub family_status: FamilyStatus,
    pub starting_age: i32,
    pub years: usize,
    pub healthcare_inflation: f64,
    /// Years high-risk pricing holds before the chronic downgrade
    pub high_risk_years: u32,
    /// Replaces the table employer share for employer plans
    pub employer_premium_override: Option<f64>,
}

/// Year-indexed insurance costs. All columns have `years` rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuranceProjection {
    pub premium: Vec<f64>,
    pub employer_premium: Vec<f64>,
    pub oop: Vec<f64>,
    /// Age-bracket multiplier applied in each year (1.0 when none applies)
    pub correction: Vec<f64>,
    pub health: Vec<HealthStatus>,
    pub coverage: Vec<CoverageRegime>,
}

impl InsuranceProjection {
    fn with_capacity(years: usize) -> Self {
        Self {
            premium: Vec::with_capacity(years),
            employer_premium: Vec::with_capacity(years),
            oop: Vec::with_capacity(years),
            correction: Vec::with_capacity(years),
            health: Vec::with_capacity(years),
            coverage: Vec::with_capacity(years),
        }
    }

    pub fn len(&self) -> usize {
        self.premium.len()
    }

    pub fn is_empty(&self) -> bool {
        self.premium.is_empty()
    }
}

/// Project insurance costs year by year.
///
/// Uninsured: the lifetime benchmark for the health status spread evenly to the
/// horizon age, zero afterwards, never inflated. Insured: base table amounts x
/// age-bracket correction x compounding healthcare inflation, with employer
/// plans switching to fixed Medicare values at the eligibility age.
pub fn project_insurance(
    assumptions: &Assumptions,
    inputs: &InsuranceInputs,
) -> Result<InsuranceProjection, ProjectionError> {
    if inputs.starting_age <= 0 {
        return Err(ProjectionError::invalid_profile(format!(
            "starting age {} must be positive",
            inputs.starting_age
        )));
    }
    if inputs.healthcare_inflation < 0.0 {
        return Err(ProjectionError::invalid_config("healthcare inflation must be non-negative"));
    }

    let benchmarks = &assumptions.benchmarks;
    let medicare = &benchmarks.medicare;
    let medicare_age = medicare.eligibility_age as i32;
    let horizon_age = benchmarks.lifetime_horizon_age as i32;

    let mut out = InsuranceProjection::with_capacity(inputs.years);
    let mut health = HealthRegime::start(inputs.health_status, inputs.high_risk_years);
    let mut coverage = CoverageRegime::start(inputs.insurance_type);

    // Uninsured cost is keyed by the starting status and never re-priced
    let uninsured_annual = benchmarks.uninsured_lifetime.for_status(inputs.health_status)
        / (horizon_age - inputs.starting_age).max(1) as f64;

    for i in 0..inputs.years {
        let age = inputs.starting_age + i as i32;
        coverage = coverage.at_age(age, medicare_age);
        let status = health.status();
        let inflation = (1.0 + inputs.healthcare_inflation).powi(i as i32);

        let (premium, employer_premium, oop, correction) = match coverage {
            CoverageRegime::Uninsured => {
                let oop = if age <= horizon_age { uninsured_annual } else { 0.0 };
                (0.0, 0.0, oop, 1.0)
            }
            CoverageRegime::Medicare => {
                let base = assumptions
                    .rates
                    .base_entry_or_default(inputs.insurance_type, inputs.family_status, status);
                (
                    medicare.premium,
                    medicare.employer_premium,
                    base.oop * inflation * medicare.oop_factor,
                    1.0,
                )
            }
            CoverageRegime::Employer | CoverageRegime::Marketplace => {
                let base = assumptions
                    .rates
                    .base_entry_or_default(inputs.insurance_type, inputs.family_status, status);
                let correction = assumptions
                    .rates
                    .correction(age.max(0) as u32, status, inputs.insurance_type);
                let employer_base = match coverage {
                    CoverageRegime::Employer => inputs.employer_premium_override.unwrap_or(base.employer_premium),
                    _ => 0.0,
                };
                (
                    base.premium * correction * inflation,
                    employer_base * correction * inflation,
                    base.oop * correction * inflation,
                    correction,
                )
            }
        };

        out.premium.push(premium);
        out.employer_premium.push(employer_premium);
        out.oop.push(oop);
        out.correction.push(correction);
        out.health.push(status);
        out.coverage.push(coverage);

        health = health.advance();
    }

    debug!(
        "insurance projection: {} years, {} from age {}",
        out.len(),
        inputs.insurance_type,
        inputs.starting_age
    );

    Ok(out)
}
