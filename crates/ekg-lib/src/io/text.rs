use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Parse newline-delimited samples, skipping blank and `#`-comment lines.
///
/// An empty series is valid input: the estimator treats it as zero
/// crossings.
pub fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not a sample value: {}", idx + 1, trimmed))?;
        samples.push(value);
    }
    Ok(samples)
}

/// Read newline-delimited samples from disk.
pub fn read_samples(path: &Path) -> Result<Vec<f64>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_samples(&text)
}

/// Write samples as one value per line.
pub fn write_samples(path: &Path, samples: &[f64]) -> Result<()> {
    let text: String = samples.iter().map(|value| format!("{value}\n")).collect();
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
