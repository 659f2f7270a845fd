//! Yearly projection output structures

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{ensure_aligned, LoadError, ProjectionError};
use super::capital::CapitalResult;
use super::drawdown::{CoverageNeed, DrawdownResult};
use super::household::HouseholdProjection;
use super::insurance::InsuranceProjection;

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRow {
    // Timing
    pub year_index: u32,
    pub age: i32,

    // Healthcare
    pub premium: f64,
    pub employer_premium: f64,
    pub oop_cost: f64,
    pub long_term_care: f64,
    /// premium + OOP + long-term care
    pub healthcare_cost: f64,

    // Household outlays
    pub household_expense: f64,
    pub debt_payment: f64,

    // Income and balances (user + partner)
    pub income: f64,
    pub savings_balance: f64,
    pub balance_401k: f64,

    /// income - household - debt - healthcare
    pub surplus: f64,
}

impl YearlyRow {
    /// Create a new row with zero flows
    pub fn new(year_index: u32, age: i32) -> Self {
        Self {
            year_index,
            age,
            premium: 0.0,
            employer_premium: 0.0,
            oop_cost: 0.0,
            long_term_care: 0.0,
            healthcare_cost: 0.0,
            household_expense: 0.0,
            debt_payment: 0.0,
            income: 0.0,
            savings_balance: 0.0,
            balance_401k: 0.0,
            surplus: 0.0,
        }
    }

    /// Fill the derived healthcare total and surplus from the flows
    pub fn finalize(&mut self) {
        self.healthcare_cost = self.premium + self.oop_cost + self.long_term_care;
        self.surplus = self.income - self.household_expense - self.debt_payment - self.healthcare_cost;
    }
}

/// Column-oriented form of the yearly rows, as exported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTable {
    pub age: Vec<i32>,
    pub premium: Vec<f64>,
    pub employer_premium: Vec<f64>,
    pub oop_cost: Vec<f64>,
    pub long_term_care: Vec<f64>,
    pub healthcare_cost: Vec<f64>,
    pub household_expense: Vec<f64>,
    pub debt_payment: Vec<f64>,
    pub income: Vec<f64>,
    pub savings_balance: Vec<f64>,
    pub balance_401k: Vec<f64>,
    pub surplus: Vec<f64>,
}

impl ProjectionTable {
    pub fn from_rows(rows: &[YearlyRow]) -> Self {
        Self {
            age: rows.iter().map(|r| r.age).collect(),
            premium: rows.iter().map(|r| r.premium).collect(),
            employer_premium: rows.iter().map(|r| r.employer_premium).collect(),
            oop_cost: rows.iter().map(|r| r.oop_cost).collect(),
            long_term_care: rows.iter().map(|r| r.long_term_care).collect(),
            healthcare_cost: rows.iter().map(|r| r.healthcare_cost).collect(),
            household_expense: rows.iter().map(|r| r.household_expense).collect(),
            debt_payment: rows.iter().map(|r| r.debt_payment).collect(),
            income: rows.iter().map(|r| r.income).collect(),
            savings_balance: rows.iter().map(|r| r.savings_balance).collect(),
            balance_401k: rows.iter().map(|r| r.balance_401k).collect(),
            surplus: rows.iter().map(|r| r.surplus).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.age.len()
    }

    pub fn is_empty(&self) -> bool {
        self.age.is_empty()
    }

    /// Rebuild rows; fails if any column length differs from `age`
    pub fn to_rows(&self) -> Result<Vec<YearlyRow>, ProjectionError> {
        let n = self.len();
        let columns: [(&'static str, usize); 11] = [
            ("premium", self.premium.len()),
            ("employer_premium", self.employer_premium.len()),
            ("oop_cost", self.oop_cost.len()),
            ("long_term_care", self.long_term_care.len()),
            ("healthcare_cost", self.healthcare_cost.len()),
            ("household_expense", self.household_expense.len()),
            ("debt_payment", self.debt_payment.len()),
            ("income", self.income.len()),
            ("savings_balance", self.savings_balance.len()),
            ("balance_401k", self.balance_401k.len()),
            ("surplus", self.surplus.len()),
        ];
        for (column, len) in columns {
            ensure_aligned(column, n, len)?;
        }

        Ok((0..n)
            .map(|i| YearlyRow {
                year_index: i as u32,
                age: self.age[i],
                premium: self.premium[i],
                employer_premium: self.employer_premium[i],
                oop_cost: self.oop_cost[i],
                long_term_care: self.long_term_care[i],
                healthcare_cost: self.healthcare_cost[i],
                household_expense: self.household_expense[i],
                debt_payment: self.debt_payment[i],
                income: self.income[i],
                savings_balance: self.savings_balance[i],
                balance_401k: self.balance_401k[i],
                surplus: self.surplus[i],
            })
            .collect())
    }
}

/// Complete projection result for one household
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly rows, one per projected year
    pub rows: Vec<YearlyRow>,

    pub insurance: InsuranceProjection,

    pub household: HouseholdProjection,

    /// Year index of the first retirement year, if inside the horizon
    pub retirement_index: Option<usize>,

    pub drawdown: DrawdownResult,

    pub coverage_need: Option<CoverageNeed>,

    pub capital: Option<CapitalResult>,
}

impl ProjectionResult {
    pub fn table(&self) -> ProjectionTable {
        ProjectionTable::from_rows(&self.rows)
    }

    /// First age with a negative surplus
    pub fn first_deficit_age(&self) -> Option<i32> {
        self.rows.iter().find(|r| r.surplus < 0.0).map(|r| r.age)
    }

    /// Write the yearly rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), LoadError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_premium: f64 = self.rows.iter().map(|r| r.premium).sum();
        let total_oop: f64 = self.rows.iter().map(|r| r.oop_cost).sum();
        let total_long_term_care: f64 = self.rows.iter().map(|r| r.long_term_care).sum();
        let total_healthcare_cost: f64 = self.rows.iter().map(|r| r.healthcare_cost).sum();
        let total_surplus: f64 = self.rows.iter().map(|r| r.surplus).sum();
        let deficit_years = self.rows.iter().filter(|r| r.surplus < 0.0).count() as u32;

        let final_savings = self.rows.last().map(|r| r.savings_balance).unwrap_or(0.0);
        let final_401k = self.rows.last().map(|r| r.balance_401k).unwrap_or(0.0);
        let balance_401k_at_retirement = self
            .retirement_index
            .and_then(|i| self.rows.get(i))
            .map(|r| r.balance_401k);

        ProjectionSummary {
            total_years: self.rows.len() as u32,
            total_premium,
            total_oop,
            total_long_term_care,
            total_healthcare_cost,
            total_surplus,
            deficit_years,
            first_deficit_age: self.first_deficit_age(),
            final_savings,
            final_401k,
            balance_401k_at_retirement,
            drawdown_depletion_age: self.drawdown.depletion_age(),
            total_unfunded_gap: self.drawdown.total_unfunded_gap(),
            final_capital_available: self.capital.as_ref().and_then(|c| c.available.last().copied()),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub total_premium: f64,
    pub total_oop: f64,
    pub total_long_term_care: f64,
    pub total_healthcare_cost: f64,
    pub total_surplus: f64,
    pub deficit_years: u32,
    pub first_deficit_age: Option<i32>,
    pub final_savings: f64,
    pub final_401k: f64,
    pub balance_401k_at_retirement: Option<f64>,
    pub drawdown_depletion_age: Option<i32>,
    pub total_unfunded_gap: f64,
    pub final_capital_available: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(i: u32, income: f64) -> YearlyRow {
        let mut row = YearlyRow::new(i, 40 + i as i32);
        row.income = income;
        row.premium = 1_000.0;
        row.oop_cost = 500.0;
        row.household_expense = 20_000.0;
        row.finalize();
        row
    }

    #[test]
    fn test_finalize_computes_surplus() {
        let r = row(0, 30_000.0);
        assert_eq!(r.healthcare_cost, 1_500.0);
        assert_eq!(r.surplus, 8_500.0);
    }

    #[test]
    fn test_table_round_trip() {
        let rows = vec![row(0, 30_000.0), row(1, 10_000.0)];
        let table = ProjectionTable::from_rows(&rows);
        assert_eq!(table.len(), 2);
        assert_eq!(table.to_rows().unwrap(), rows);
    }

    #[test]
    fn test_misaligned_table_fails_loudly() {
        let mut table = ProjectionTable::from_rows(&[row(0, 30_000.0), row(1, 10_000.0)]);
        table.income.pop();
        let err = table.to_rows().unwrap_err();
        assert_eq!(
            err,
            ProjectionError::DataAlignment { column: "income", expected: 2, actual: 1 }
        );
    }

    #[test]
    fn test_summary_and_csv() {
        let result = ProjectionResult {
            rows: vec![row(0, 30_000.0), row(1, 10_000.0)],
            ..ProjectionResult::default()
        };
        let summary = result.summary();
        assert_eq!(summary.total_years, 2);
        assert_eq!(summary.deficit_years, 1);
        assert_eq!(summary.first_deficit_age, Some(41));
        assert_eq!(summary.total_premium, 2_000.0);

        let mut buf = Vec::new();
        result.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("year_index,age,premium"));
        assert_eq!(text.lines().count(), 3);
    }
}
