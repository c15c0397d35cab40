//! Driftwatch CLI
//!
//! Command-line interface for running the monitoring pipeline, individual
//! stages, and the read-only API server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;

use crate::alerts::AlertEngine;
use crate::baseline::BaselineTrainer;
use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::drift::{ConceptDriftDetector, DataDriftDetector};
use crate::evaluate::Evaluator;
use crate::monitor::PerformanceMonitor;
use crate::pipeline::{run_steps, standard_pipeline};
use crate::retrain::RetrainController;
use crate::server;

/// Rows and features of the built-in demo dataset
const DEMO_ROWS: usize = 600;
const DEMO_FEATURES: usize = 8;
const DEMO_SEED: u64 = 42;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn warn(s: &str) -> ColoredString {
    s.truecolor(230, 180, 80)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_fail(msg: &str) {
    println!("  {} {}", "✗".red(), msg);
}

fn kv(key: &str, val: &str) {
    println!("  {:<24} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ML model monitoring: drift detection, alerting, retraining decisions")]
pub struct Cli {
    /// Base directory for models and reports
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Optional CSV dataset (defaults to the built-in demo dataset)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Target column name when loading a CSV dataset
    #[arg(long, global = true, default_value = "target")]
    pub target: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full monitoring pipeline
    Run {
        /// Reuse the existing model instead of retraining
        #[arg(long)]
        skip_training: bool,
    },
    /// Train the baseline model and record reference metrics
    Train,
    /// Evaluate the model on simulated production data
    Evaluate,
    /// Detect feature distribution drift
    DataDrift,
    /// Detect prediction distribution drift
    ConceptDrift,
    /// Monitor per-batch model performance
    Monitor,
    /// Generate alerts from the latest monitoring reports
    Alert,
    /// Evaluate whether retraining is required
    Decide,
    /// Serve the read-only monitoring API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "8000")]
        port: u16,
    },
}

fn load_dataset(cli: &Cli) -> anyhow::Result<Dataset> {
    match &cli.data {
        Some(path) => {
            let data = Dataset::from_csv(path, &cli.target)?;
            step_ok(&format!(
                "loaded {} rows × {} features from {}",
                data.n_rows(),
                data.n_features(),
                path.display()
            ));
            Ok(data)
        }
        None => Ok(Dataset::synthetic(DEMO_ROWS, DEMO_FEATURES, DEMO_SEED)),
    }
}

fn config_for(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let config = MonitorConfig::new(&cli.dir);
    config.ensure_directories()?;
    Ok(config)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(cli: &Cli, skip_training: bool) -> anyhow::Result<()> {
    section("Monitoring pipeline");
    let config = config_for(cli)?;
    let data = load_dataset(cli)?;

    let report = run_steps(standard_pipeline(&config, &data, skip_training));

    println!();
    for outcome in &report.outcomes {
        if outcome.success {
            step_ok(&format!("{:<14} {}", outcome.name, dim(&outcome.detail)));
        } else {
            step_fail(&format!("{:<14} {}", outcome.name, outcome.detail.red()));
        }
    }

    println!();
    kv("Succeeded", &report.succeeded().len().to_string());
    kv("Failed", &report.failed().len().to_string());

    if !report.all_succeeded() {
        println!(
            "  {}",
            warn("Some stages failed; inspect the logs above and rerun the failed stages.")
        );
        anyhow::bail!("pipeline completed with failures: {:?}", report.failed());
    }
    Ok(())
}

pub fn cmd_train(cli: &Cli) -> anyhow::Result<()> {
    section("Train");
    let config = config_for(cli)?;
    let data = load_dataset(cli)?;

    let metrics = BaselineTrainer::run(&config, &data)?;

    step_ok("baseline model trained");
    kv("Accuracy", &format!("{:.4}", metrics.accuracy));
    kv("Precision", &format!("{:.4}", metrics.precision));
    kv("Recall", &format!("{:.4}", metrics.recall));
    kv("ROC-AUC", &format!("{:.4}", metrics.roc_auc));
    kv("Model", &config.model_path().display().to_string());
    Ok(())
}

pub fn cmd_evaluate(cli: &Cli) -> anyhow::Result<()> {
    section("Evaluate");
    let config = config_for(cli)?;
    let data = load_dataset(cli)?;

    let metrics = Evaluator::run(&config, &data)?;

    step_ok("production snapshot recorded");
    kv("Accuracy", &format!("{:.4}", metrics.accuracy));
    kv("ROC-AUC", &format!("{:.4}", metrics.roc_auc));
    kv("Report", &config.latest_performance_path().display().to_string());
    Ok(())
}

pub fn cmd_data_drift(cli: &Cli) -> anyhow::Result<()> {
    section("Data drift");
    let config = config_for(cli)?;
    let data = load_dataset(cli)?;

    let report = DataDriftDetector::run(&config, &data)?;

    if report.n_drifted() > 0 {
        println!(
            "  {} drift detected in {} features:",
            warn("!"),
            report.n_drifted()
        );
        for feature in report.drifted_features() {
            println!("    {} {}", dim("-"), feature);
        }
    } else {
        step_ok("no significant data drift detected");
    }
    kv("Report", &config.data_drift_path().display().to_string());
    Ok(())
}

pub fn cmd_concept_drift(cli: &Cli) -> anyhow::Result<()> {
    section("Concept drift");
    let config = config_for(cli)?;
    let data = load_dataset(cli)?;

    let report = ConceptDriftDetector::run(&config, &data)?;

    if report.concept_drift_detected {
        println!("  {} concept drift detected", warn("!"));
    } else {
        step_ok("no significant concept drift detected");
    }
    kv("KS statistic", &format!("{:.4}", report.ks_statistic));
    kv("p-value", &format!("{:.4}", report.p_value));
    Ok(())
}

pub fn cmd_monitor(cli: &Cli) -> anyhow::Result<()> {
    section("Performance monitor");
    let config = config_for(cli)?;
    let data = load_dataset(cli)?;

    let history = PerformanceMonitor::run(&config, &data)?;
    let degraded = history.iter().filter(|s| s.performance_degraded).count();

    step_ok("performance history recorded");
    kv("Batches monitored", &history.len().to_string());
    kv("Degraded batches", &degraded.to_string());
    kv("Report", &config.performance_history_path().display().to_string());
    Ok(())
}

pub fn cmd_alert(cli: &Cli) -> anyhow::Result<()> {
    section("Alerts");
    let config = config_for(cli)?;

    let alerts = AlertEngine::run(&config)?;

    if alerts.is_empty() {
        println!("  {}", muted("no monitoring reports available; nothing to alert on"));
    }
    for alert in &alerts {
        println!(
            "  [{}] {} {} {}",
            alert.level.to_string().bold(),
            alert.source.cyan(),
            dim("→"),
            alert.message
        );
    }
    kv("Alert log", &config.alerts_log_path().display().to_string());
    Ok(())
}

pub fn cmd_decide(cli: &Cli) -> anyhow::Result<()> {
    section("Retraining decision");
    let config = config_for(cli)?;

    let decision = RetrainController::run(&config)?;

    if decision.retrain_required {
        println!("  {} retraining required", warn("!"));
    } else {
        step_ok("no retraining required");
    }
    kv("Reason", &decision.reason);
    kv("Decision log", &config.retrain_decisions_path().display().to_string());
    Ok(())
}

pub async fn cmd_serve(cli: &Cli, host: &str, port: u16) -> anyhow::Result<()> {
    section("Serve");
    let config = config_for(cli)?;
    kv("Address", &format!("http://{}:{}", host, port));
    kv("Artifacts", &cli.dir.display().to_string());

    let server_config = server::ServerConfig {
        host: host.to_string(),
        port,
    };
    server::serve(server_config, config).await
}
