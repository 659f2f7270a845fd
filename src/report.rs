//! Simulation request and exported report
//!
//! The report carries the request next to every derived series.
//! Import keeps only the request and recomputes the rest, so a re-imported
//! report reproduces the same table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::assumptions::Assumptions;
use crate::error::{LoadError, ProjectionError};
use crate::profile::{HouseholdFinances, Profile};
use crate::projection::{
    CapitalResult, CapitalStrategy, CoverageNeed, DrawdownResult, ProjectionConfig, ProjectionEngine,
    ProjectionResult, ProjectionSummary, ProjectionTable,
};
use crate::recommendation::{recommend, Recommendation};
use crate::risk::{RiskAssessment, RiskTrajectory};

/// Everything needed to run one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub profile: Profile,

    #[serde(default)]
    pub finances: HouseholdFinances,

    #[serde(default)]
    pub config: ProjectionConfig,

    #[serde(default)]
    pub capital_strategy: Option<CapitalStrategy>,
}

impl SimulationRequest {
    /// Request with default finances and config
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            finances: HouseholdFinances::default(),
            config: ProjectionConfig::default(),
            capital_strategy: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Exported simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub request: SimulationRequest,
    pub recommendations: Vec<Recommendation>,
    pub risk_trajectory: RiskTrajectory,
    #[serde(default)]
    pub partner_risk_trajectory: Option<RiskTrajectory>,
    pub high_risk_score: f64,
    pub critical_age: Option<i32>,
    pub table: ProjectionTable,
    pub drawdown: DrawdownResult,
    pub coverage_need: Option<CoverageNeed>,
    pub capital: Option<CapitalResult>,
    pub summary: ProjectionSummary,
    pub generated_at: DateTime<Utc>,
}

impl SimulationReport {
    /// Assemble the report from a finished projection
    pub fn build(
        request: SimulationRequest,
        result: &ProjectionResult,
        risk: RiskAssessment,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            recommendations,
            risk_trajectory: risk.user,
            partner_risk_trajectory: risk.partner,
            high_risk_score: risk.high_risk_score,
            critical_age: risk.critical_age,
            table: result.table(),
            drawdown: result.drawdown.clone(),
            coverage_need: result.coverage_need.clone(),
            capital: result.capital.clone(),
            summary: result.summary(),
            generated_at: Utc::now(),
            request,
        }
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Recompute every derived series from the stored request
    pub fn rerun(&self, assumptions: &Assumptions) -> Result<SimulationReport, ProjectionError> {
        simulate(assumptions, &self.request).map(|(_, report)| report)
    }
}

/// Run one request end to end: projection, risk, recommendations, report
pub fn simulate(
    assumptions: &Assumptions,
    request: &SimulationRequest,
) -> Result<(ProjectionResult, SimulationReport), ProjectionError> {
    let engine = ProjectionEngine::new(assumptions.clone(), request.config.clone());
    let result = engine.project(&request.profile, &request.finances, request.capital_strategy.as_ref())?;

    let risk = RiskAssessment::for_profile(&request.profile, request.config.end_age);
    let recommendations = recommend(&request.profile, &result, &risk, &assumptions.benchmarks);
    let report = SimulationReport::build(request.clone(), &result, risk, recommendations);

    Ok((result, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FamilyStatus, Gender, HealthStatus, InsuranceType};

    fn request() -> SimulationRequest {
        let profile = Profile::new(42, Gender::Female, HealthStatus::HighRisk, FamilyStatus::Family, InsuranceType::Employer)
            .with_partner(44, HealthStatus::Healthy)
            .with_dependent(12, HealthStatus::Healthy);
        SimulationRequest {
            capital_strategy: Some(CapitalStrategy { savings_percent: 0.25, ..CapitalStrategy::default() }),
            ..SimulationRequest::new(profile)
        }
    }

    #[test]
    fn test_export_import_reproduces_table() {
        let assumptions = Assumptions::default();
        let (_, report) = simulate(&assumptions, &request()).unwrap();

        let json = report.to_json().unwrap();
        let imported = SimulationReport::from_json_str(&json).unwrap();
        assert_eq!(imported.request, report.request);

        let rerun = imported.rerun(&assumptions).unwrap();
        assert_eq!(rerun.table, report.table);
        assert_eq!(rerun.recommendations, report.recommendations);
        assert_eq!(rerun.drawdown, report.drawdown);
    }

    #[test]
    fn test_report_contents() {
        let (result, report) = simulate(&Assumptions::default(), &request()).unwrap();
        assert_eq!(report.table.len(), result.rows.len());
        assert_eq!(report.risk_trajectory.len(), 85 - 42 + 1);
        assert!(report.partner_risk_trajectory.is_some());
        assert!(report.capital.is_some());
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_minimal_request_json() {
        let json = r#"{
            "profile": {
                "age": 30,
                "gender": "male",
                "health_status": "healthy",
                "family_status": "single",
                "insurance_type": "marketplace"
            }
        }"#;
        let request = SimulationRequest::from_json_str(json).unwrap();
        assert_eq!(request.config, ProjectionConfig::default());
        assert_eq!(request.finances, HouseholdFinances::default());
        assert!(request.capital_strategy.is_none());
    }

    #[test]
    fn test_malformed_enum_rejected() {
        let json = r#"{"profile": {"age": 30, "gender": "male", "health_status": "fine",
            "family_status": "single", "insurance_type": "marketplace"}}"#;
        assert!(matches!(SimulationRequest::from_json_str(json), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_load_sample_request() {
        let request = SimulationRequest::load("data/households/sample_request.json").unwrap();
        assert_eq!(request.profile.age, 55);
        let (result, _) = simulate(&Assumptions::default(), &request).unwrap();
        assert_eq!(result.rows.len(), 31);
    }
}
