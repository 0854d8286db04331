//! churn-insights: headless churn insight reports for bank customer data.
//!
//! Usage:
//!   churn-insights                              # summary and insights
//!   churn-insights --data-path data.csv         # use a local CSV
//!   churn-insights --output report.json         # save the full report
//!   churn-insights --format json                # full report on stdout
//!   churn-insights --synthetic 10000 --seed 7   # generated dataset

use anyhow::{Context, Result};
use churn_insights_core::{
    agent::InsightsAgent,
    config::InsightsConfig,
    error::InsightsError,
    presenter, synthetic,
};
use clap::{Parser, ValueEnum};
use std::{io::Write, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Churn insights for executives and product managers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the CSV data file. Without it the dataset is looked up in
    /// the local caches and downloaded when a URL is configured.
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Save the full report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print only the executive summary
    #[arg(long)]
    summary_only: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analyse a generated dataset of this many customers instead of a file
    #[arg(long, value_name = "ROWS")]
    synthetic: Option<usize>,

    /// Seed for --synthetic
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        let _ = report_error(&e, &mut std::io::stderr());
        std::process::exit(1);
    }
}

/// Human-readable failure message, with a hint when no dataset could be found.
fn report_error(e: &anyhow::Error, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "❌ Error: {e:#}")?;
    let missing_data = e.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<InsightsError>(),
            Some(InsightsError::FileNotFound { .. } | InsightsError::DataUnavailable { .. })
        )
    });
    if missing_data {
        writeln!(out, "\nPlease provide a valid data file path or configure a dataset URL.")?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => InsightsConfig::load(path)?,
        None => InsightsConfig::default(),
    }
    .with_env_overrides();
    if let Some(path) = &args.data_path {
        config.data_path = Some(path.clone());
    }

    println!("🚀 Initializing Bank Customer Churn Insights Agent...");
    let agent = match args.synthetic {
        Some(rows) => {
            let table = synthetic::generate(args.seed, rows)
                .with_context(|| format!("Cannot generate {rows} synthetic customers"))?;
            InsightsAgent::from_table(config, table)?
        }
        None => {
            let mut agent = InsightsAgent::new(config);
            agent.initialize()?;
            agent
        }
    };
    println!("✅ Data loaded successfully!\n");

    if let Some(path) = &args.output {
        println!("📝 Generating full report...");
        let report = agent.full_report()?;
        let json = presenter::render_json(&report)?;
        std::fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
        println!("✅ Report saved to {}", path.display());
    }

    match args.format {
        OutputFormat::Json => {
            let report = agent.full_report()?;
            println!("{}", presenter::render_json(&report)?);
        }
        OutputFormat::Text => {
            print!("{}", presenter::render_executive_summary(&agent.executive_summary()?));
            if !args.summary_only {
                let executive = agent.executive_insights()?;
                let product = agent.product_insights()?;
                print!("{}", presenter::render_insights(&executive, &product));
            }
        }
    }

    log::debug!("run complete");
    Ok(())
}
