/// Count rising-edge crossings of `threshold`: adjacent pairs where the
/// first sample sits at or below the threshold and the second rises
/// strictly above it.
///
/// Single left-to-right pass. Empty and single-element input have no
/// adjacent pairs and count zero.
pub fn count_rising_crossings(samples: &[f64], threshold: f64) -> usize {
    samples
        .windows(2)
        .filter(|pair| pair[0] <= threshold && pair[1] > threshold)
        .count()
}

/// Indices of the samples that complete a rising-edge crossing, for event
/// overlays on rendered waveforms.
pub fn rising_crossing_indices(samples: &[f64], threshold: f64) -> Vec<usize> {
    samples
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] <= threshold && pair[1] > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}
