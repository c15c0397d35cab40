//! Pipeline orchestration
//!
//! An ordered list of named steps executed in-process. A failing step never
//! blocks later steps; the runner records every outcome and reports overall
//! failure if any step failed, after attempting all of them.

use tracing::{error, info};

use crate::alerts::AlertEngine;
use crate::baseline::BaselineTrainer;
use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::drift::{ConceptDriftDetector, DataDriftDetector};
use crate::error::Result;
use crate::evaluate::Evaluator;
use crate::monitor::PerformanceMonitor;
use crate::retrain::RetrainController;

/// A named unit of pipeline work. The run closure returns a short
/// human-readable summary of what the step computed.
pub struct PipelineStep<'a> {
    pub name: &'static str,
    pub description: &'static str,
    #[allow(clippy::type_complexity)]
    pub run: Box<dyn Fn() -> Result<String> + 'a>,
}

/// Outcome of one executed step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub name: &'static str,
    pub success: bool,
    /// Step summary on success, error text on failure
    pub detail: String,
}

/// Results of a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub outcomes: Vec<StepOutcome>,
}

impl PipelineReport {
    /// Names of steps that completed
    pub fn succeeded(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.name)
            .collect()
    }

    /// Names of steps that failed
    pub fn failed(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.name)
            .collect()
    }

    /// True when every attempted step completed
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }
}

/// Execute steps in order with a continue-on-failure policy
pub fn run_steps(steps: Vec<PipelineStep>) -> PipelineReport {
    let total = steps.len();
    let mut report = PipelineReport::default();

    for (i, step) in steps.into_iter().enumerate() {
        info!(step = step.name, "[{}/{}] {}", i + 1, total, step.description);
        match (step.run)() {
            Ok(detail) => {
                info!(step = step.name, "{}", detail);
                report.outcomes.push(StepOutcome {
                    name: step.name,
                    success: true,
                    detail,
                });
            }
            Err(e) => {
                error!(step = step.name, error = %e, "step failed");
                report.outcomes.push(StepOutcome {
                    name: step.name,
                    success: false,
                    detail: e.to_string(),
                });
            }
        }
    }

    report
}

/// The standard monitoring chain:
/// train -> evaluate -> data drift -> concept drift -> monitor -> alert -> decide.
pub fn standard_pipeline<'a>(
    config: &'a MonitorConfig,
    data: &'a Dataset,
    skip_training: bool,
) -> Vec<PipelineStep<'a>> {
    let mut steps: Vec<PipelineStep<'a>> = Vec::new();

    if !skip_training {
        steps.push(PipelineStep {
            name: "train",
            description: "Train baseline model and save metrics",
            run: Box::new(move || {
                let metrics = BaselineTrainer::run(config, data)?;
                Ok(format!("baseline accuracy {:.4}", metrics.accuracy))
            }),
        });
    }

    steps.push(PipelineStep {
        name: "evaluate",
        description: "Evaluate model on simulated production data",
        run: Box::new(move || {
            let metrics = Evaluator::run(config, data)?;
            Ok(format!("production accuracy {:.4}", metrics.accuracy))
        }),
    });

    steps.push(PipelineStep {
        name: "data-drift",
        description: "Detect feature distribution drift",
        run: Box::new(move || {
            let report = DataDriftDetector::run(config, data)?;
            Ok(format!(
                "{} of {} features drifted",
                report.n_drifted(),
                report.0.len()
            ))
        }),
    });

    steps.push(PipelineStep {
        name: "concept-drift",
        description: "Detect prediction distribution drift",
        run: Box::new(move || {
            let report = ConceptDriftDetector::run(config, data)?;
            Ok(if report.concept_drift_detected {
                format!("concept drift detected (p = {:.4})", report.p_value)
            } else {
                "no concept drift".to_string()
            })
        }),
    });

    steps.push(PipelineStep {
        name: "monitor",
        description: "Monitor model performance over batches",
        run: Box::new(move || {
            let history = PerformanceMonitor::run(config, data)?;
            let degraded = history.iter().filter(|s| s.performance_degraded).count();
            Ok(format!(
                "{} batches monitored, {} degraded",
                history.len(),
                degraded
            ))
        }),
    });

    steps.push(PipelineStep {
        name: "alert",
        description: "Generate alerts based on monitoring results",
        run: Box::new(move || {
            let alerts = AlertEngine::run(config)?;
            Ok(format!("{} alerts generated", alerts.len()))
        }),
    });

    steps.push(PipelineStep {
        name: "decide",
        description: "Evaluate whether retraining is needed",
        run: Box::new(move || {
            let decision = RetrainController::run(config)?;
            Ok(format!("retrain required: {}", decision.retrain_required))
        }),
    });

    steps
}
