use std::path::Path;

use eyre::{Context, ContextCompat, Result};
use serde::de::DeserializeOwned;
use tokio::fs::read_to_string;

use crate::{KIB, config::CacheLevels, record::ResultsRecord};

pub async fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = read_to_string(path)
        .await
        .wrap_err_with(|| format!("Read {}", path.display()))?;
    serde_json::from_str(&data).wrap_err_with(|| format!("Parse {}", path.display()))
}

/// Reads a results file, `None` if its `type` has no plot. Only the `type`
/// field is required in that case.
pub async fn read_results_file(path: impl AsRef<Path>) -> Result<Option<ResultsRecord>> {
    let path = path.as_ref();
    let value = read_json_file::<serde_json::Value>(path).await?;
    ResultsRecord::from_value(value).wrap_err_with(|| format!("Parse {}", path.display()))
}

/// Pulls noise spikes in timing curves down towards a later, lower point.
///
/// Every point at or above `threshold` is compared against each of the next
/// `window` points in turn, and takes the later y-value whenever that one is
/// lower than its current value. This is a single pass and is not iterated to
/// a fixed point. The last `window` points are dropped afterwards, as their
/// lookahead runs past the end of the series.
pub fn smooth_series(points: &mut Vec<(f64, f64)>, window: usize, threshold: f64) {
    if window == 0 {
        return;
    }
    if points.len() <= window {
        points.clear();
        return;
    }

    for j in 0..points.len() - window {
        if points[j].0 < threshold {
            continue;
        }
        for k in 1..=window {
            if points[j].1 > points[j + k].1 {
                points[j].1 = points[j + k].1;
            }
        }
    }
    points.truncate(points.len() - window);
}

/// Number of `elem_size` byte elements that fit in each cache level
pub fn cache_thresholds(levels: &CacheLevels, elem_size: u64) -> Result<Vec<(String, u64)>> {
    levels
        .iter()
        .map(|(name, size_kib)| -> Result<(String, u64)> {
            let bytes = size_kib
                .checked_mul(KIB)
                .with_context(|| format!("Cache level {name} of {size_kib} KiB is too large"))?;
            Ok((name.to_owned(), bytes / elem_size))
        })
        .collect()
}
