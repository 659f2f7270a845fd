//! Health Strategy CLI
//!
//! Command-line interface for running household projections

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use health_strategy::profile::load_households;
use health_strategy::{
    simulate, Assumptions, ProjectionConfig, ScenarioRunner, SimulationReport, SimulationRequest,
};

#[derive(Parser, Debug)]
#[command(name = "health_strategy")]
#[command(about = "Project household healthcare costs, income, and retirement adequacy")]
struct Cli {
    /// Directory with base_costs.csv, correction_ratios.csv, benchmarks.csv
    /// (built-in national averages when omitted)
    #[arg(short, long, global = true)]
    rates: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation request
    Run {
        /// Request JSON (profile, finances, config, capital strategy)
        request: PathBuf,

        /// Write the report JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the yearly table as CSV here
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Re-import an exported report and recompute it
    Import {
        report: PathBuf,
    },
    /// Run every household in a CSV file
    Batch {
        households: PathBuf,

        /// Directory for one report JSON per household
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn load_assumptions(rates: Option<&Path>) -> Result<Assumptions> {
    match rates {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading rate tables from {}", dir.display())),
        None => Ok(Assumptions::national_averages()),
    }
}

fn print_report(report: &SimulationReport) -> Result<()> {
    let table = &report.table;
    println!("Projection Results ({} years):", table.len());
    println!(
        "{:>4} {:>10} {:>10} {:>10} {:>10} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Age", "Premium", "EmpPrem", "OOP", "LTC", "Household", "Income", "Savings", "401k", "Surplus"
    );
    println!("{}", "-".repeat(112));

    let rows = report.table.to_rows().context("report table is misaligned")?;
    for row in &rows {
        println!(
            "{:>4} {:>10.0} {:>10.0} {:>10.0} {:>10.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0}",
            row.age,
            row.premium,
            row.employer_premium,
            row.oop_cost,
            row.long_term_care,
            row.household_expense,
            row.income,
            row.savings_balance,
            row.balance_401k,
            row.surplus,
        );
    }

    let summary = &report.summary;
    println!("\nSummary:");
    println!("  Total Healthcare Cost: ${:.2}", summary.total_healthcare_cost);
    println!("  Deficit Years: {}", summary.deficit_years);
    if let Some(age) = summary.first_deficit_age {
        println!("  First Deficit Age: {}", age);
    }
    if let Some(balance) = summary.balance_401k_at_retirement {
        println!("  401(k) at Retirement: ${:.2}", balance);
    }
    if let Some(age) = summary.drawdown_depletion_age {
        println!("  Savings Depleted at Age: {}", age);
    }
    println!("  High-Risk Score: {:.2}", report.high_risk_score);

    println!("\nRecommendations:");
    for rec in &report.recommendations {
        println!("  - {}", rec.message);
    }

    Ok(())
}

fn run(assumptions: &Assumptions, request: &Path, output: Option<&Path>, csv: Option<&Path>) -> Result<()> {
    let request = SimulationRequest::load(request)
        .with_context(|| format!("reading request {}", request.display()))?;
    let (result, report) = simulate(assumptions, &request).context("projection failed")?;

    print_report(&report)?;

    if let Some(path) = output {
        report
            .save(path)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("\nReport written to: {}", path.display());
    }
    if let Some(path) = csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        result.write_csv(file)?;
        println!("Yearly table written to: {}", path.display());
    }

    Ok(())
}

fn import(assumptions: &Assumptions, path: &Path) -> Result<()> {
    let report = SimulationReport::load(path)
        .with_context(|| format!("reading report {}", path.display()))?;
    let rerun = report.rerun(assumptions).context("projection failed")?;

    if rerun.table != report.table {
        bail!("recomputed table differs from the exported table (rate tables changed?)");
    }
    println!("Imported report from {} (generated {})", path.display(), report.generated_at);
    print_report(&rerun)?;

    Ok(())
}

fn batch(assumptions: Assumptions, households: &Path, output_dir: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let households = load_households(households)
        .with_context(|| format!("reading households {}", households.display()))?;
    println!("Loaded {} households in {:?}", households.len(), start.elapsed());

    let runner = ScenarioRunner::with_assumptions(assumptions);
    let outcomes = runner.run_batch(&households, &ProjectionConfig::default(), None);

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    println!(
        "{:>8} {:>14} {:>10} {:>14} {:>10}",
        "ID", "Healthcare", "Deficit@", "Unfunded", "Depleted@"
    );
    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.report {
            Ok(report) => {
                let s = &report.summary;
                println!(
                    "{:>8} {:>14.0} {:>10} {:>14.0} {:>10}",
                    outcome.household_id,
                    s.total_healthcare_cost,
                    s.first_deficit_age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
                    s.total_unfunded_gap,
                    s.drawdown_depletion_age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
                );
                if let Some(dir) = output_dir {
                    report.save(dir.join(format!("{}.json", outcome.household_id)))?;
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{:>8} failed: {}", outcome.household_id, e);
            }
        }
    }

    println!(
        "\n{} households projected, {} failed, in {:?}",
        outcomes.len() - failures,
        failures,
        start.elapsed()
    );

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let assumptions = load_assumptions(cli.rates.as_deref())?;

    match cli.command {
        Command::Run { request, output, csv } => run(&assumptions, &request, output.as_deref(), csv.as_deref()),
        Command::Import { report } => import(&assumptions, &report),
        Command::Batch { households, output_dir } => batch(assumptions, &households, output_dir.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_strategy::profile::{FamilyStatus, Gender, HealthStatus, InsuranceType, Profile};

    fn report() -> SimulationReport {
        let profile = Profile::new(50, Gender::Male, HealthStatus::Healthy, FamilyStatus::Single, InsuranceType::Employer);
        let (_, report) = simulate(&Assumptions::default(), &SimulationRequest::new(profile)).unwrap();
        report
    }

    #[test]
    fn test_print_report() {
        assert!(print_report(&report()).is_ok());
    }

    #[test]
    fn test_misaligned_table_is_an_error() {
        let mut report = report();
        report.table.income.pop();
        let err = print_report(&report).unwrap_err();
        assert!(err.to_string().contains("misaligned"));
    }
}
