//! Health Strategy - household healthcare cost and retirement projections
//!
//! This library provides:
//! - Insurance premium and out-of-pocket projections with age corrections,
//!   high-risk downgrade, and the Medicare switch
//! - Household income, 401(k), savings, and expense projections
//! - Retirement drawdown and income coverage need
//! - Capital care fund simulation with bucket vesting
//! - Risk trajectories and rule-based recommendations
//! - JSON report export/import and batch runs

pub mod error;
pub mod profile;
pub mod assumptions;
pub mod risk;
pub mod projection;
pub mod recommendation;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoadError, ProjectionError};
pub use profile::{HouseholdFinances, Profile};
pub use assumptions::Assumptions;
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, YearlyRow};
pub use report::{simulate, SimulationReport, SimulationRequest};
pub use scenario::ScenarioRunner;
