use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{EkgError, EkgResult};
use crate::signal::SampleSequence;

/// Source of unit-interval uniform draws feeding the generator.
///
/// The single capability keeps the generator testable with scripted values.
pub trait UniformSource {
    /// Next uniform value in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

/// Default source backed by `StdRng`.
pub struct StdUniformSource {
    rng: StdRng,
}

impl StdUniformSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, entropy-backed otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl UniformSource for StdUniformSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Parameters for synthetic waveform generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    /// Number of samples per generated sequence.
    pub count: usize,
    /// Lower bound of the sample range (inclusive).
    pub low: f64,
    /// Upper bound of the sample range (exclusive).
    pub high: f64,
    /// Seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            low: 0.0,
            high: 1.0,
            seed: None,
        }
    }
}

impl WaveformConfig {
    pub fn validate(&self) -> EkgResult<()> {
        if self.count == 0 {
            return Err(EkgError::invalid("sample count must be positive"));
        }
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(EkgError::invalid(format!(
                "bounds must be finite, got [{}, {})",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(EkgError::invalid(format!(
                "lower bound {} exceeds upper bound {}",
                self.low, self.high
            )));
        }
        if !(self.high - self.low).is_finite() {
            return Err(EkgError::invalid(format!(
                "bound span from {} to {} is not finite",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Largest representable value strictly below `bound`.
fn largest_below(bound: f64) -> f64 {
    if bound > 0.0 {
        f64::from_bits(bound.to_bits() - 1)
    } else if bound < 0.0 {
        f64::from_bits(bound.to_bits() + 1)
    } else {
        -f64::from_bits(1)
    }
}

fn draw_sequence<S: UniformSource>(config: &WaveformConfig, source: &mut S) -> SampleSequence {
    let span = config.high - config.low;
    let mut data = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let mut value = config.low + source.next_uniform() * span;
        // the affine map can round up onto the open bound
        if config.low < config.high && value >= config.high {
            value = largest_below(config.high);
        }
        data.push(value);
    }
    SampleSequence::from_data(data)
}

/// Synthetic waveform generator over an injected uniform source.
pub struct SignalGenerator<S: UniformSource> {
    config: WaveformConfig,
    source: S,
}

impl SignalGenerator<StdUniformSource> {
    /// Generator backed by the config's seed, or entropy when none is set.
    pub fn from_config(config: WaveformConfig) -> EkgResult<Self> {
        let source = StdUniformSource::from_seed_option(config.seed);
        Self::new(config, source)
    }
}

impl<S: UniformSource> SignalGenerator<S> {
    /// Fails fast on an invalid config so `generate` itself cannot.
    pub fn new(config: WaveformConfig, source: S) -> EkgResult<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Produce a freshly allocated sequence of exactly `count` samples in
    /// `[low, high)`. Equal bounds degenerate to a constant sequence.
    pub fn generate(&mut self) -> SampleSequence {
        draw_sequence(&self.config, &mut self.source)
    }
}

/// Validate parameters and generate one sequence from an injected source.
pub fn generate_sequence<S: UniformSource>(
    count: usize,
    low: f64,
    high: f64,
    source: &mut S,
) -> EkgResult<SampleSequence> {
    let config = WaveformConfig {
        count,
        low,
        high,
        seed: None,
    };
    config.validate()?;
    Ok(draw_sequence(&config, source))
}
