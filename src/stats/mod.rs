//! Per-cell statistics over the repeated measurements of one
//! (series, x value) combination: count, mean, sample standard
//! deviation and the 95% confidence half-width.

use serde::{Deserialize, Serialize};

/// z value for a two-sided 95% interval under a normal approximation.
pub const Z_95: f64 = 1.96;

/// Selects a field of `PointStats`, e.g. for error bars.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsField {
    N,
    Mean,
    #[serde(rename = "sd")]
    SD,
    Ci95,
}

#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    #[error("no inputs given")]
    NoInputs,
    #[error("non-finite input value {0}")]
    NonFinite(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStats {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator), None for a
    /// single value.
    pub sd: Option<f64>,
}

impl PointStats {
    /// Values are summed in the given order, so equal inputs give
    /// bit-identical results.
    pub fn from_values(vals: &[f64]) -> Result<Self, StatsError> {
        if vals.is_empty() {
            return Err(StatsError::NoInputs);
        }
        if let Some(x) = vals.iter().find(|x| !x.is_finite()) {
            return Err(StatsError::NonFinite(*x));
        }
        let n = vals.len();
        let mean = vals.iter().sum::<f64>() / n as f64;
        let sd = if n >= 2 {
            let sum_squared_error: f64 = vals.iter().map(|x| (x - mean).powi(2)).sum();
            Some((sum_squared_error / (n - 1) as f64).sqrt())
        } else {
            None
        };
        Ok(PointStats { n, mean, sd })
    }

    /// Half-width of the 95% confidence interval of the mean,
    /// `1.96 * sd / sqrt(n)`.
    pub fn ci95(&self) -> Option<f64> {
        Some(Z_95 * self.sd? / (self.n as f64).sqrt())
    }

    pub fn get(&self, field: StatsField) -> Option<f64> {
        match field {
            StatsField::N => Some(self.n as f64),
            StatsField::Mean => Some(self.mean),
            StatsField::SD => self.sd,
            StatsField::Ci95 => self.ci95(),
        }
    }
}
