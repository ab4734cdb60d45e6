//! Experiment comparison and reporting

use crate::error::Result;
use crate::metrics::{MetricsLog, MetricsRecord};
use crate::paths::ProjectPaths;
use tracing::info;

/// Reserved experiment names for the improvement comparison
pub const BASELINE_EXPERIMENT: &str = "baseline";
pub const ENGINEERED_EXPERIMENT: &str = "engineered";

/// Result of comparing the two reserved experiments
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSummary {
    pub baseline_rmse: f64,
    pub engineered_rmse: f64,
    pub improvement_pct: f64,
}

/// RMSE improvement of the engineered run over the baseline, in percent
pub fn improvement_pct(baseline_rmse: f64, engineered_rmse: f64) -> f64 {
    (baseline_rmse - engineered_rmse) / baseline_rmse * 100.0
}

/// Compare all recorded experiments against the default layout
pub fn compare() -> Result<Option<ComparisonSummary>> {
    compare_at(&ProjectPaths::new())
}

/// Render the metrics table and, when both reserved experiments exist,
/// write the one-line improvement summary. Returns `None` when there is
/// nothing to compare.
pub fn compare_at(paths: &ProjectPaths) -> Result<Option<ComparisonSummary>> {
    let records = MetricsLog::new(paths.metrics_log()).read()?;
    if records.is_empty() {
        info!("no metrics recorded yet; nothing to compare");
        return Ok(None);
    }

    let table = render_table(&records);
    std::fs::create_dir_all(paths.reports_dir())?;
    std::fs::write(paths.metrics_table(), &table)?;
    info!(path = %paths.metrics_table().display(), runs = records.len(), "wrote metrics table");

    // first matching record per reserved name
    let baseline = records.iter().find(|r| r.experiment == BASELINE_EXPERIMENT);
    let engineered = records.iter().find(|r| r.experiment == ENGINEERED_EXPERIMENT);

    let (baseline, engineered) = match (baseline, engineered) {
        (Some(b), Some(e)) => (b, e),
        _ => {
            info!("baseline and engineered runs not both present; skipping summary");
            return Ok(None);
        }
    };

    let summary = ComparisonSummary {
        baseline_rmse: baseline.rmse,
        engineered_rmse: engineered.rmse,
        improvement_pct: improvement_pct(baseline.rmse, engineered.rmse),
    };

    let line = format!(
        "RMSE improvement: {:.2}% (baseline={:.2}, engineered={:.2})\n",
        summary.improvement_pct, summary.baseline_rmse, summary.engineered_rmse
    );
    std::fs::write(paths.summary(), &line)?;
    info!(path = %paths.summary().display(), "wrote summary");

    Ok(Some(summary))
}

/// Markdown table over all recorded runs
pub fn render_table(records: &[MetricsRecord]) -> String {
    let mut out = String::from("| experiment | rmse | r2 | model_type |\n");
    out.push_str("|:-----------|-----:|---:|:-----------|\n");
    for record in records {
        out.push_str(&format!(
            "| {} | {:.2} | {:.4} | {} |\n",
            record.experiment, record.rmse, record.r2, record.model_type
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsLog;

    fn record(experiment: &str, rmse: f64) -> MetricsRecord {
        MetricsRecord {
            experiment: experiment.to_string(),
            rmse,
            r2: 0.85,
            model_type: "RandomForestRegressor".to_string(),
        }
    }

    #[test]
    fn test_improvement_pct() {
        assert!((improvement_pct(100.0, 80.0) - 20.0).abs() < 1e-12);
        assert!(improvement_pct(80.0, 100.0) < 0.0);
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[record("baseline", 100.0)]);
        assert!(table.contains("| experiment |"));
        assert!(table.contains("| baseline | 100.00 | 0.8500 | RandomForestRegressor |"));
    }

    #[test]
    fn test_compare_empty_log_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::at(dir.path());

        let result = compare_at(&paths).unwrap();
        assert!(result.is_none());
        assert!(!paths.metrics_table().exists());
    }

    #[test]
    fn test_compare_writes_table_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::at(dir.path());
        let log = MetricsLog::new(paths.metrics_log());
        log.append(record("baseline", 100.0)).unwrap();
        log.append(record("engineered", 80.0)).unwrap();

        let summary = compare_at(&paths).unwrap().unwrap();
        assert!((summary.improvement_pct - 20.0).abs() < 1e-9);

        let text = std::fs::read_to_string(paths.summary()).unwrap();
        assert_eq!(
            text,
            "RMSE improvement: 20.00% (baseline=100.00, engineered=80.00)\n"
        );
        assert!(paths.metrics_table().exists());
    }

    #[test]
    fn test_compare_uses_first_matching_records() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::at(dir.path());
        let log = MetricsLog::new(paths.metrics_log());
        log.append(record("baseline", 100.0)).unwrap();
        log.append(record("engineered", 80.0)).unwrap();
        log.append(record("baseline", 50.0)).unwrap();

        let summary = compare_at(&paths).unwrap().unwrap();
        assert_eq!(summary.baseline_rmse, 100.0);
    }

    #[test]
    fn test_compare_without_both_reserved_names() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::at(dir.path());
        let log = MetricsLog::new(paths.metrics_log());
        log.append(record("baseline", 100.0)).unwrap();
        log.append(record("other", 90.0)).unwrap();

        assert!(compare_at(&paths).unwrap().is_none());
        // table is still written for the runs that exist
        assert!(paths.metrics_table().exists());
        assert!(!paths.summary().exists());
    }
}
