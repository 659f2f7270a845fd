//! Year-by-year household projections

pub mod regime;
pub mod insurance;
pub mod long_term_care;
pub mod household;
pub mod drawdown;
pub mod capital;
mod engine;
mod cashflows;

pub use engine::{
    ProjectionConfig, ProjectionEngine, SavingsContributionPolicy, SocialSecurity, SpendingAdjustment,
};
pub use cashflows::{ProjectionResult, ProjectionSummary, ProjectionTable, YearlyRow};
pub use capital::{Allocation, BucketGrowth, CapitalResult, CapitalStrategy, FundingSource, LongTermLock};
pub use drawdown::{CoverageNeed, DrawdownResult};
pub use household::HouseholdProjection;
pub use insurance::InsuranceProjection;
