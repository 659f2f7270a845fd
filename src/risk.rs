//! Risk trajectory model and high-risk score
//!
//! A fixed linear model per health status: risk starts at an intercept at the
//! current age and rises by a constant slope per year, clamped to 1.0.

use serde::{Deserialize, Serialize};

use crate::profile::{HealthStatus, Profile};

/// Risk at or above this value counts as critical
pub const CRITICAL_THRESHOLD: f64 = 0.9;

/// (intercept, slope per year)
fn linear_model(status: HealthStatus) -> (f64, f64) {
    match status {
        HealthStatus::Healthy => (0.2, 0.01),
        HealthStatus::Chronic => (0.4, 0.015),
        HealthStatus::HighRisk => (0.6, 0.02),
    }
}

pub fn insight(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::HighRisk => "Your current health status suggests elevated long-term risk.",
        HealthStatus::Chronic => "You are managing a chronic condition. Monitor regularly and plan proactively.",
        HealthStatus::Healthy => "You are currently low-risk. Maintain preventive care.",
    }
}

/// Risk score per attained age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTrajectory {
    pub ages: Vec<i32>,
    pub scores: Vec<f64>,
}

impl RiskTrajectory {
    /// Trajectory for ages `age..=horizon_age`; empty when already past the horizon
    pub fn project(age: i32, status: HealthStatus, horizon_age: i32) -> Self {
        let (intercept, slope) = linear_model(status);
        let ages: Vec<i32> = (age..=horizon_age).collect();
        let scores = (0..ages.len())
            .map(|i| (intercept + slope * i as f64).min(1.0))
            .collect();

        Self { ages, scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Fraction of years at or above the critical threshold
    pub fn high_risk_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let critical = self.scores.iter().filter(|&&r| r >= CRITICAL_THRESHOLD).count();
        critical as f64 / self.scores.len() as f64
    }

    /// First age at which risk reaches the critical threshold
    pub fn critical_age(&self) -> Option<i32> {
        self.scores
            .iter()
            .position(|&r| r >= CRITICAL_THRESHOLD)
            .map(|i| self.ages[i])
    }
}

/// Risk outputs for a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub user: RiskTrajectory,
    pub partner: Option<RiskTrajectory>,
    pub high_risk_score: f64,
    pub critical_age: Option<i32>,
    pub insight: String,
}

impl RiskAssessment {
    pub fn for_profile(profile: &Profile, horizon_age: i32) -> Self {
        let user = RiskTrajectory::project(profile.age, profile.health_status, horizon_age);
        let partner = profile
            .partner
            .map(|p| RiskTrajectory::project(p.age, p.health_status, horizon_age));

        Self {
            high_risk_score: user.high_risk_score(),
            critical_age: user.critical_age(),
            insight: insight(profile.health_status).to_string(),
            user,
            partner,
        }
    }
}
