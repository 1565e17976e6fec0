use serde::{Deserialize, Serialize};

/// An ordered run of waveform samples, treated as one unit of observation
/// and replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSequence {
    /// Samples in generation order.
    pub data: Vec<f64>,
}

impl SampleSequence {
    pub fn from_data(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index-addressable read access for presentation layers.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }
}
