use serde::{Deserialize, Serialize};

use crate::detectors::crossing::count_rising_crossings;
use crate::error::{EkgError, EkgResult};

/// Parameters for the crossing-count heart-rate estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Amplitude a sample must rise strictly above to count as a beat.
    pub threshold: f64,
    /// Time span the sequence is assumed to cover, in seconds.
    pub window_s: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            window_s: 10.0,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> EkgResult<()> {
        if !self.window_s.is_finite() || self.window_s <= 0.0 {
            return Err(EkgError::invalid(format!(
                "window_s must be a positive number of seconds, got {}",
                self.window_s
            )));
        }
        Ok(())
    }
}

/// Crossing count plus the beats-per-minute figure derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    pub crossings: usize,
    pub bpm: f64,
}

/// Estimator with a validated configuration; `estimate` itself is total.
#[derive(Debug, Clone, Copy)]
pub struct RateEstimator {
    config: EstimatorConfig,
}

impl RateEstimator {
    pub fn new(config: EstimatorConfig) -> EkgResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// One pass over adjacent pairs. Empty and single-element input yield
    /// zero crossings and 0.0 bpm.
    pub fn estimate(&self, samples: &[f64]) -> RateEstimate {
        let crossings = count_rising_crossings(samples, self.config.threshold);
        RateEstimate {
            crossings,
            bpm: crossings as f64 * 60.0 / self.config.window_s,
        }
    }
}

/// Validate parameters and estimate in one call.
pub fn estimate_heart_rate(
    samples: &[f64],
    threshold: f64,
    window_s: f64,
) -> EkgResult<RateEstimate> {
    RateEstimator::new(EstimatorConfig { threshold, window_s }).map(|est| est.estimate(samples))
}
