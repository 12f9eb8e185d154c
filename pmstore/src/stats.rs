//! Aggregate statistics over PM2.5 levels.

use serde::{Deserialize, Serialize};

/// Summary of the `PM2.5_Level` column.
///
/// Missing levels are skipped. With no levels at all, `count` is 0 and the
/// three aggregates are `None` (serialized as `null`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PmStats {
    /// Number of non-missing levels.
    pub count: u64,
    /// Arithmetic mean.
    #[serde(rename = "average_PM2.5")]
    pub average: Option<f64>,
    /// Largest level.
    #[serde(rename = "max_PM2.5")]
    pub max: Option<f64>,
    /// Smallest level.
    #[serde(rename = "min_PM2.5")]
    pub min: Option<f64>,
}

impl PmStats {
    /// Compute statistics in a single pass. NaN levels count as missing.
    pub fn from_levels<I: IntoIterator<Item = f64>>(levels: I) -> Self {
        let mut count = 0u64;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        for level in levels.into_iter().filter(|v| !v.is_nan()) {
            count += 1;
            sum += level;
            max = max.max(level);
            min = min.min(level);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            count,
            average: Some(sum / count as f64),
            max: Some(max),
            min: Some(min),
        }
    }

    /// Whether there was any data to aggregate.
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}
