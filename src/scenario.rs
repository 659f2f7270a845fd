//! Scenario runner for batch projections
//!
//! Pre-loads assumptions once, then runs many households or configurations
//! without re-reading CSV files. Households run in parallel; each household's
//! projection stays sequential.

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::error::{LoadError, ProjectionError};
use crate::profile::Household;
use crate::projection::{CapitalStrategy, ProjectionConfig};
use crate::report::{simulate, SimulationReport, SimulationRequest};

/// Outcome for one household in a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub household_id: String,
    pub report: Result<SimulationReport, ProjectionError>,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for inflation in [0.03, 0.05, 0.07] {
///     let config = ProjectionConfig { healthcare_inflation: inflation, ..Default::default() };
///     let report = runner.run(&SimulationRequest { config, ..request.clone() })?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the built-in national averages
    pub fn new() -> Self {
        Self {
            assumptions: Assumptions::national_averages(),
        }
    }

    /// Create runner by loading rate tables from CSV files
    pub fn from_csv() -> Result<Self, LoadError> {
        Ok(Self {
            assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from a specific rate table directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, LoadError> {
        Ok(Self {
            assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    /// Run a single request
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationReport, ProjectionError> {
        simulate(&self.assumptions, request).map(|(_, report)| report)
    }

    /// Run the same household under several configurations
    pub fn run_scenarios(
        &self,
        request: &SimulationRequest,
        configs: &[ProjectionConfig],
    ) -> Vec<Result<SimulationReport, ProjectionError>> {
        configs
            .iter()
            .map(|config| {
                let scenario = SimulationRequest {
                    config: config.clone(),
                    ..request.clone()
                };
                self.run(&scenario)
            })
            .collect()
    }

    /// Run many households with one config. Failures are reported per household.
    pub fn run_batch(
        &self,
        households: &[Household],
        config: &ProjectionConfig,
        capital_strategy: Option<&CapitalStrategy>,
    ) -> Vec<BatchOutcome> {
        households
            .par_iter()
            .map(|household| {
                let request = SimulationRequest {
                    profile: household.profile.clone(),
                    finances: household.finances.clone(),
                    config: config.clone(),
                    capital_strategy: capital_strategy.cloned(),
                };
                BatchOutcome {
                    household_id: household.household_id.clone(),
                    report: self.run(&request),
                }
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Mutable access for sensitivity runs on the rate tables
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{load_households, FamilyStatus, Gender, HealthStatus, InsuranceType, Profile};

    #[test]
    fn test_scenarios_by_inflation() {
        let runner = ScenarioRunner::new();
        let request = SimulationRequest::new(Profile::new(
            40,
            Gender::Male,
            HealthStatus::Chronic,
            FamilyStatus::Single,
            InsuranceType::Marketplace,
        ));

        let configs: Vec<_> = [0.03, 0.05, 0.07]
            .iter()
            .map(|&rate| ProjectionConfig {
                healthcare_inflation: rate,
                ..ProjectionConfig::default()
            })
            .collect();

        let results: Vec<_> = runner
            .run_scenarios(&request, &configs)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(results.len(), 3);

        // Higher inflation should result in higher lifetime healthcare cost
        assert!(results[2].summary.total_healthcare_cost > results[0].summary.total_healthcare_cost);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ScenarioRunner::from_csv().expect("rate tables should load");
        let households = load_households("data/households/sample_households.csv").unwrap();
        let config = ProjectionConfig::default();

        let outcomes = runner.run_batch(&households, &config, None);
        assert_eq!(outcomes.len(), households.len());

        for (household, outcome) in households.iter().zip(&outcomes) {
            assert_eq!(outcome.household_id, household.household_id);
            let batch = outcome.report.as_ref().unwrap();
            let single = runner
                .run(&SimulationRequest {
                    profile: household.profile.clone(),
                    finances: household.finances.clone(),
                    config: config.clone(),
                    capital_strategy: None,
                })
                .unwrap();
            assert_eq!(batch.table, single.table);
        }
    }

    #[test]
    fn test_batch_reports_failures_per_household() {
        let runner = ScenarioRunner::new();
        let mut households = load_households("data/households/sample_households.csv").unwrap();
        households[1].profile.age = -5;

        let outcomes = runner.run_batch(&households, &ProjectionConfig::default(), None);
        assert!(outcomes[0].report.is_ok());
        assert!(matches!(outcomes[1].report, Err(ProjectionError::InvalidProfile(_))));
    }
}
