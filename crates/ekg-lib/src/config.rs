use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::EkgResult;
use crate::metrics::rate::EstimatorConfig;
use crate::synth::WaveformConfig;

/// Whole-simulation configuration, loadable from TOML.
///
/// Every field has a default, so a partial file (or none at all) is fine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub waveform: WaveformConfig,
    pub estimator: EstimatorConfig,
}

impl SimConfig {
    pub fn validate(&self) -> EkgResult<()> {
        self.waveform.validate()?;
        self.estimator.validate()
    }
}

/// Read, parse, and validate a TOML simulation config.
pub fn read_config(path: &Path) -> Result<SimConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SimConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
