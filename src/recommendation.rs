//! Rule-based recommendations over a finished projection
//!
//! A fixed decision table. Rules fire in a fixed order, so the same inputs
//! always produce the same list.

use serde::{Deserialize, Serialize};

use crate::assumptions::Benchmarks;
use crate::profile::Profile;
use crate::projection::ProjectionResult;
use crate::risk::RiskAssessment;

/// Age at which dependents leave family coverage
pub const DEPENDENT_COVERAGE_AGE: i32 = 26;

/// Available share of the capital fund below which liquidity is flagged
const LIQUIDITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    CoverageGap,
    PremiumReallocation,
    CashFlowDeficit,
    CashFlowSurplus,
    RetirementShortfall,
    RetirementOnTrack,
    DrawdownDepletion,
    UnfundedGap,
    CapitalLiquidity,
    HealthRisk,
    DependentCoverage,
    RiskInsight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Build the ordered recommendation list
pub fn recommend(
    profile: &Profile,
    result: &ProjectionResult,
    risk: &RiskAssessment,
    benchmarks: &Benchmarks,
) -> Vec<Recommendation> {
    use RecommendationKind::*;

    let mut recs = Vec::new();
    let first = result.rows.first();

    if !profile.insurance_type.is_insured() {
        let oop = first.map(|r| r.oop_cost).unwrap_or(0.0);
        recs.push(Recommendation::new(
            CoverageGap,
            format!(
                "You have no health coverage. Expected out-of-pocket costs are about ${:.0} per year through age {}; compare marketplace plans.",
                oop, benchmarks.lifetime_horizon_age
            ),
        ));
    }

    if let Some(row) = first {
        let monthly_premium = (row.premium + row.employer_premium) / 12.0;
        if monthly_premium > benchmarks.digital_first_monthly {
            recs.push(Recommendation::new(
                PremiumReallocation,
                format!(
                    "You pay ${:.0}/mo in premiums against a digital-first benchmark of ${:.0}/mo. Consider reallocating ${:.0}/mo into a long-term health fund.",
                    monthly_premium,
                    benchmarks.digital_first_monthly,
                    monthly_premium - benchmarks.digital_first_monthly
                ),
            ));
        }
    }

    match result.first_deficit_age() {
        Some(age) => recs.push(Recommendation::new(
            CashFlowDeficit,
            format!("Projected spending exceeds income from age {}.", age),
        )),
        None if !result.rows.is_empty() => {
            let total: f64 = result.rows.iter().map(|r| r.surplus).sum();
            recs.push(Recommendation::new(
                CashFlowSurplus,
                format!(
                    "Income covers projected spending every year, with a cumulative surplus of ${:.0}.",
                    total
                ),
            ));
        }
        None => {}
    }

    if let Some(need) = &result.coverage_need {
        if need.is_covered() {
            recs.push(Recommendation::new(
                RetirementOnTrack,
                format!(
                    "Your 401(k) at retirement (${:.0}) covers the estimated income gap of ${:.0}.",
                    need.balance_401k_at_retirement, need.total_need
                ),
            ));
        } else {
            recs.push(Recommendation::new(
                RetirementShortfall,
                format!(
                    "Your 401(k) at retirement (${:.0}) falls ${:.0} short of the ${:.0} needed to replace income.",
                    need.balance_401k_at_retirement, need.shortfall, need.total_need
                ),
            ));
        }
    }

    if let Some(age) = result.drawdown.depletion_age() {
        recs.push(Recommendation::new(
            DrawdownDepletion,
            format!(
                "Savings and 401(k) are exhausted by age {}; the unfunded gap totals ${:.0}.",
                age,
                result.drawdown.total_unfunded_gap()
            ),
        ));
    } else if result.drawdown.total_unfunded_gap() > 0.0 {
        recs.push(Recommendation::new(
            UnfundedGap,
            format!(
                "Retirement shortfalls of ${:.0} are not covered by savings.",
                result.drawdown.total_unfunded_gap()
            ),
        ));
    }

    if let Some(capital) = &result.capital {
        let idx = result
            .retirement_index
            .unwrap_or_else(|| capital.len().saturating_sub(1));
        if let (Some(&fund), Some(&available)) = (capital.fund_value.get(idx), capital.available.get(idx)) {
            if fund > 0.0 && available / fund < LIQUIDITY_THRESHOLD {
                recs.push(Recommendation::new(
                    CapitalLiquidity,
                    format!(
                        "Only {:.0}% of your capital care fund is available at age {}; keep an emergency reserve outside the long-term bucket.",
                        100.0 * available / fund,
                        profile.age + idx as i32
                    ),
                ));
            }
        }
    }

    if risk.high_risk_score > 0.0 {
        let from = risk
            .critical_age
            .map(|age| format!(" from age {}", age))
            .unwrap_or_default();
        recs.push(Recommendation::new(
            HealthRisk,
            format!(
                "{:.0}% of your remaining years are at critical health risk{}; plan for higher care costs.",
                100.0 * risk.high_risk_score,
                from
            ),
        ));
    }

    let years = result.rows.len() as i32;
    for dependent in &profile.dependents {
        if dependent.age >= DEPENDENT_COVERAGE_AGE {
            recs.push(Recommendation::new(
                DependentCoverage,
                format!(
                    "A dependent aged {} is past the age-{} limit for family coverage and needs a separate plan.",
                    dependent.age, DEPENDENT_COVERAGE_AGE
                ),
            ));
        } else if DEPENDENT_COVERAGE_AGE - dependent.age < years {
            recs.push(Recommendation::new(
                DependentCoverage,
                format!(
                    "A dependent aged {} leaves family coverage in {} years.",
                    dependent.age,
                    DEPENDENT_COVERAGE_AGE - dependent.age
                ),
            ));
        }
    }

    recs.push(Recommendation::new(RiskInsight, risk.insight.clone()));

    recs
}
