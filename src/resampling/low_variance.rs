//! Low-variance (systematic) resampling.

use rand::rngs::StdRng;
use rand::Rng;

use super::traits::{effective_weight, Resampling};
use crate::Sample;

/// Systematic resampling with a single random offset.
///
/// One uniform draw in `[0, total / count)` places `count` equally spaced
/// pointers over the cumulative weight; each pointer selects the sample whose
/// weight interval it falls into. O(N) and with lower variance than
/// independent draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowVarianceResampling;

impl LowVarianceResampling {
    pub fn new() -> Self {
        Self
    }
}

impl Resampling for LowVarianceResampling {
    fn resample(&self, samples: &[Sample], count: usize, rng: &mut StdRng) -> Vec<Sample> {
        let total: f64 = samples.iter().map(effective_weight).sum();
        if count == 0 || samples.is_empty() || total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }

        // pointers never move past the last sample that can be drawn
        let last = samples
            .iter()
            .rposition(|s| effective_weight(s) > 0.0)
            .unwrap_or(0);
        let step = total / count as f64;
        let mut pointer = rng.gen::<f64>() * step;
        let mut index = 0;
        let mut cumulative = effective_weight(&samples[0]);
        let mut resampled = Vec::with_capacity(count);

        for _ in 0..count {
            while index < last
                && (pointer >= cumulative || effective_weight(&samples[index]) == 0.0)
            {
                index += 1;
                cumulative += effective_weight(&samples[index]);
            }
            resampled.push(samples[index].clone());
            pointer += step;
        }
        resampled
    }
}
