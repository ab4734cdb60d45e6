//! Command-line interface for the experiment pipeline

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{self, DEFAULT_DATASET_URL};
use crate::evaluate;
use crate::paths::ProjectPaths;
use crate::train;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn step_run(msg: &str) {
    println!("  {} {}...", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("  {} {}", ok("✓"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ames")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Housing price regression experiments")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the housing dataset and write the cleaned copy
    Download {
        /// Dataset URL
        #[arg(long, default_value = DEFAULT_DATASET_URL)]
        url: String,
    },

    /// Train one experiment from a YAML configuration
    Train {
        /// Experiment config file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Compare accumulated experiment metrics
    Evaluate,

    /// Download, train both experiments, and evaluate
    Run,
}

// ─── Command implementations ───────────────────────────────────────────────────

pub fn cmd_download(url: &str) -> anyhow::Result<()> {
    section("Download");
    step_run("fetching dataset");
    let start = Instant::now();
    let (rows, cols) = data::download(url, &ProjectPaths::new())?;
    step_done(&format!(
        "clean dataset: {} rows x {} cols ({:.1}s)",
        rows,
        cols,
        start.elapsed().as_secs_f64()
    ));
    Ok(())
}

pub fn cmd_train(config: &Path) -> anyhow::Result<()> {
    section("Train");
    step_run(&format!("training from {}", config.display()));
    let start = Instant::now();
    let record = train::train(config)?;
    step_done(&format!(
        "{}: rmse={:.2} r2={:.4} ({:.1}s)",
        record.experiment,
        record.rmse,
        record.r2,
        start.elapsed().as_secs_f64()
    ));
    Ok(())
}

pub fn cmd_evaluate() -> anyhow::Result<()> {
    section("Evaluate");
    match evaluate::compare()? {
        Some(summary) => {
            step_done(&format!(
                "RMSE improvement: {:.2}% (baseline={:.2}, engineered={:.2})",
                summary.improvement_pct, summary.baseline_rmse, summary.engineered_rmse
            ));
        }
        None => {
            println!("  {}", dim("nothing to compare yet"));
        }
    }
    Ok(())
}

/// Full sequence; the first failing step aborts the run.
pub fn cmd_run() -> anyhow::Result<()> {
    cmd_download(DEFAULT_DATASET_URL)?;
    cmd_train(Path::new("configs/baseline.yaml"))?;
    cmd_train(Path::new("configs/engineered.yaml"))?;
    cmd_evaluate()?;
    Ok(())
}
