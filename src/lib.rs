//! Housing price regression experiment pipeline
//!
//! End-to-end tabular ML experiments over the Ames housing dataset:
//!
//! - [`data`] - dataset download, cleaning, and deterministic splitting
//! - [`features`] - baseline and engineered feature pipelines
//! - [`model`] - regression tree, random forest, and gradient boosting
//! - [`config`] - YAML experiment configuration
//! - [`train`] - the training orchestrator
//! - [`metrics`] - validation metrics and the append-only metrics log
//! - [`evaluate`] - experiment comparison and reports
//! - [`cli`] - command-line interface

pub mod error;

pub mod cli;
pub mod config;
pub mod data;
pub mod evaluate;
pub mod features;
pub mod metrics;
pub mod model;
pub mod paths;
pub mod train;

pub use error::{PipelineError, Result};
