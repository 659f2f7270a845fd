//! Household profile data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectionError;

/// Oldest age accepted for any household member
pub const MAX_AGE: i32 = 120;

/// Health status of a household member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Chronic,
    HighRisk,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [HealthStatus::Healthy, HealthStatus::Chronic, HealthStatus::HighRisk];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Chronic => "chronic",
            HealthStatus::HighRisk => "high_risk",
        }
    }
}

impl FromStr for HealthStatus {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "healthy" => Ok(HealthStatus::Healthy),
            "chronic" => Ok(HealthStatus::Chronic),
            "high_risk" | "high" => Ok(HealthStatus::HighRisk),
            other => Err(ProjectionError::invalid_profile(format!("unknown health status `{}`", other))),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coverage tier of the household plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStatus {
    Single,
    Family,
}

impl FamilyStatus {
    pub const ALL: [FamilyStatus; 2] = [FamilyStatus::Single, FamilyStatus::Family];

    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyStatus::Single => "single",
            FamilyStatus::Family => "family",
        }
    }
}

impl FromStr for FamilyStatus {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "individual" => Ok(FamilyStatus::Single),
            "family" => Ok(FamilyStatus::Family),
            other => Err(ProjectionError::invalid_profile(format!("unknown family status `{}`", other))),
        }
    }
}

impl fmt::Display for FamilyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of health coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceType {
    /// Employer-sponsored insurance (ESI)
    Employer,
    /// Marketplace / self-insured (ACA)
    Marketplace,
    /// Uninsured
    None,
}

impl InsuranceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsuranceType::Employer => "employer",
            InsuranceType::Marketplace => "marketplace",
            InsuranceType::None => "none",
        }
    }

    pub fn is_insured(&self) -> bool {
        !matches!(self, InsuranceType::None)
    }
}

impl FromStr for InsuranceType {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employer" | "employer-based" | "esi" => Ok(InsuranceType::Employer),
            "marketplace" | "marketplace / self-insured" | "aca" | "self-insured" => Ok(InsuranceType::Marketplace),
            "none" | "uninsured" => Ok(InsuranceType::None),
            other => Err(ProjectionError::invalid_profile(format!("unknown insurance type `{}`", other))),
        }
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ProjectionError::invalid_profile(format!("unknown gender `{}`", other))),
        }
    }
}

/// Partner covered under the household plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub age: i32,
    pub health_status: HealthStatus,
}

/// Dependent covered under the household plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    pub age: i32,
    pub health_status: HealthStatus,
}

/// Care categories the household wants covered.
/// Carried through reports; the projection does not read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePreferences {
    pub primary: bool,
    pub preventive: bool,
    pub chronic: bool,
    pub mental_health: bool,
    pub surgical: bool,
    pub cancer: bool,
    pub end_of_life: bool,
    pub emergency: bool,
    pub maternity: bool,
    pub pediatric: bool,
}

impl Default for CarePreferences {
    fn default() -> Self {
        Self {
            primary: true,
            preventive: true,
            chronic: true,
            mental_health: true,
            surgical: true,
            cancer: true,
            end_of_life: true,
            emergency: true,
            maternity: true,
            pediatric: true,
        }
    }
}

/// Household profile supplied once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Age of the primary adult
    pub age: i32,

    pub gender: Gender,

    pub health_status: HealthStatus,

    pub family_status: FamilyStatus,

    pub insurance_type: InsuranceType,

    #[serde(default)]
    pub partner: Option<Partner>,

    #[serde(default)]
    pub dependents: Vec<Dependent>,

    #[serde(default)]
    pub care_preferences: CarePreferences,
}

impl Profile {
    /// Create a profile with no partner or dependents
    pub fn new(
        age: i32,
        gender: Gender,
        health_status: HealthStatus,
        family_status: FamilyStatus,
        insurance_type: InsuranceType,
    ) -> Self {
        Self {
            age,
            gender,
            health_status,
            family_status,
            insurance_type,
            partner: None,
            dependents: Vec::new(),
            care_preferences: CarePreferences::default(),
        }
    }

    pub fn with_partner(mut self, age: i32, health_status: HealthStatus) -> Self {
        self.partner = Some(Partner { age, health_status });
        self
    }

    pub fn with_dependent(mut self, age: i32, health_status: HealthStatus) -> Self {
        self.dependents.push(Dependent { age, health_status });
        self
    }

    /// Validate the profile before any projection runs
    pub fn validate(&self) -> Result<(), ProjectionError> {
        validate_adult_age("age", self.age)?;

        if let Some(partner) = &self.partner {
            validate_adult_age("partner age", partner.age)?;
            if self.family_status == FamilyStatus::Single {
                return Err(ProjectionError::invalid_profile(
                    "a partner requires family status `family`",
                ));
            }
        }

        for (i, dependent) in self.dependents.iter().enumerate() {
            if dependent.age < 0 || dependent.age > MAX_AGE {
                return Err(ProjectionError::invalid_profile(format!(
                    "dependent {} age {} is outside 0..={}",
                    i + 1,
                    dependent.age,
                    MAX_AGE
                )));
            }
        }

        Ok(())
    }
}

fn validate_adult_age(label: &str, age: i32) -> Result<(), ProjectionError> {
    if age <= 0 || age > MAX_AGE {
        Err(ProjectionError::invalid_profile(format!(
            "{} {} is outside 1..={}",
            label, age, MAX_AGE
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_profile(age: i32) -> Profile {
        Profile::new(age, Gender::Female, HealthStatus::Healthy, FamilyStatus::Single, InsuranceType::Employer)
    }

    #[test]
    fn test_enum_parsing_accepts_form_labels() {
        assert_eq!("Employer-based".parse::<InsuranceType>().unwrap(), InsuranceType::Employer);
        assert_eq!("Marketplace / Self-insured".parse::<InsuranceType>().unwrap(), InsuranceType::Marketplace);
        assert_eq!("uninsured".parse::<InsuranceType>().unwrap(), InsuranceType::None);
        assert_eq!("high-risk".parse::<HealthStatus>().unwrap(), HealthStatus::HighRisk);
        assert_eq!("Family".parse::<FamilyStatus>().unwrap(), FamilyStatus::Family);
    }

    #[test]
    fn test_malformed_enum_is_invalid_profile() {
        assert!(InsuranceType::Employer.is_insured());
        assert!(!InsuranceType::None.is_insured());

        let err = "platinum".parse::<InsuranceType>().unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidProfile(_)));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&HealthStatus::HighRisk).unwrap();
        assert_eq!(json, "\"high_risk\"");
        let parsed: InsuranceType = serde_json::from_str("\"marketplace\"").unwrap();
        assert_eq!(parsed, InsuranceType::Marketplace);
    }

    #[test]
    fn test_validate_rejects_bad_ages() {
        assert!(single_profile(30).validate().is_ok());
        assert!(matches!(single_profile(0).validate(), Err(ProjectionError::InvalidProfile(_))));
        assert!(matches!(single_profile(-4).validate(), Err(ProjectionError::InvalidProfile(_))));
        assert!(single_profile(121).validate().is_err());
    }

    #[test]
    fn test_partner_requires_family_status() {
        let profile = single_profile(40).with_partner(38, HealthStatus::Chronic);
        assert!(profile.validate().is_err());

        let mut family = profile.clone();
        family.family_status = FamilyStatus::Family;
        assert!(family.validate().is_ok());
    }

    #[test]
    fn test_dependent_age_bounds() {
        let mut profile = single_profile(40).with_dependent(8, HealthStatus::Healthy);
        profile.family_status = FamilyStatus::Family;
        assert!(profile.validate().is_ok());

        let bad = profile.with_dependent(-1, HealthStatus::Healthy);
        assert!(bad.validate().is_err());
    }
}
