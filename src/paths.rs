//! On-disk layout for datasets, model bundles, and reports

use std::path::PathBuf;

/// Fixed artifact layout rooted at a base directory.
///
/// Defaults to the current working directory; tests root it in a temp dir.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new() -> Self {
        Self::at(".")
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("data").join("raw")
    }

    pub fn raw_dataset(&self) -> PathBuf {
        self.raw_dir().join("ames_raw.csv")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("data").join("processed")
    }

    pub fn clean_dataset(&self) -> PathBuf {
        self.processed_dir().join("ames_clean.csv")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    pub fn model_bundle(&self, experiment: &str) -> PathBuf {
        self.models_dir().join(format!("{}.json", experiment))
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn metrics_log(&self) -> PathBuf {
        self.reports_dir().join("metrics.json")
    }

    pub fn metrics_table(&self) -> PathBuf {
        self.reports_dir().join("metrics_table.md")
    }

    pub fn summary(&self) -> PathBuf {
        self.reports_dir().join("summary.txt")
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = ProjectPaths::at("/tmp/exp");
        assert_eq!(paths.raw_dataset(), PathBuf::from("/tmp/exp/data/raw/ames_raw.csv"));
        assert_eq!(paths.clean_dataset(), PathBuf::from("/tmp/exp/data/processed/ames_clean.csv"));
        assert_eq!(paths.model_bundle("baseline"), PathBuf::from("/tmp/exp/models/baseline.json"));
        assert_eq!(paths.metrics_log(), PathBuf::from("/tmp/exp/reports/metrics.json"));
    }
}
