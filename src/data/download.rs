//! Dataset acquisition over HTTP

use crate::error::{PipelineError, Result};
use crate::paths::ProjectPaths;
use std::time::Duration;
use tracing::info;

/// Ames housing dataset, CSV export
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/melindaleung/Ames-Iowa-Housing-Dataset/master/data/ames%20iowa%20housing.csv";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Fetch the dataset body; non-2xx responses and transport failures are
/// download errors naming the URL.
pub fn fetch_dataset(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| PipelineError::DownloadError(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| PipelineError::DownloadError(format!("request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(PipelineError::DownloadError(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    response
        .text()
        .map_err(|e| PipelineError::DownloadError(format!("reading body from {} failed: {}", url, e)))
}

/// Download the raw dataset, persist it, and write the cleaned copy with
/// missing-target rows dropped. Returns the clean shape (rows, cols).
pub fn download(url: &str, paths: &ProjectPaths) -> Result<(usize, usize)> {
    info!(url, "downloading dataset");
    let body = fetch_dataset(url)?;

    let raw_path = paths.raw_dataset();
    std::fs::create_dir_all(paths.raw_dir())?;
    std::fs::write(&raw_path, &body)?;
    info!(path = %raw_path.display(), bytes = body.len(), "saved raw dataset");

    let raw = super::load_csv(&raw_path)?;
    let mut clean = super::drop_missing_target(&raw)?;
    super::write_csv(&mut clean, &paths.clean_dataset())?;
    info!(
        rows = clean.height(),
        cols = clean.width(),
        dropped = raw.height() - clean.height(),
        "saved clean dataset"
    );

    Ok((clean.height(), clean.width()))
}
