//! Household profile, financial inputs, and batch loading

mod data;
mod finances;
pub mod loader;

pub use data::{
    CarePreferences, Dependent, FamilyStatus, Gender, HealthStatus, InsuranceType, Partner, Profile,
    MAX_AGE,
};
pub use finances::{AdultFinances, HouseholdFinances, LongTermCareElection, Pension};
pub use loader::{load_households, load_households_from_reader, Household};
