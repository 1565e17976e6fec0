use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct SampleRow {
    index: usize,
    value: f64,
}

/// Write samples as `index,value` rows under a header.
pub fn write_samples_csv(path: &Path, samples: &[f64]) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);
    for (index, &value) in samples.iter().enumerate() {
        writer.serialize(SampleRow { index, value })?;
    }
    writer.flush()?;
    Ok(())
}

/// Read samples back from an `index,value` file, in row order.
pub fn read_samples_csv(path: &Path) -> Result<Vec<f64>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening samples {}", path.display()))?;
    let mut samples = Vec::new();
    for (idx, row) in reader.deserialize::<SampleRow>().enumerate() {
        let row = row.with_context(|| format!("parsing sample row {}", idx + 1))?;
        samples.push(row.value);
    }
    Ok(samples)
}
