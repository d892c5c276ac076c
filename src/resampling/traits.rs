//! Resampling trait.

use rand::rngs::StdRng;

use crate::Sample;

/// Draws a new particle set from a weighted one, with replacement.
///
/// The probability of copying a sample is proportional to its weight.
/// Negative or non-finite weights count as zero.
pub trait Resampling {
    /// Draw `count` copies from `samples`.
    ///
    /// # Returns
    /// Exactly `count` samples, or an empty vector when `samples` is empty or
    /// carries no positive weight.
    fn resample(&self, samples: &[Sample], count: usize, rng: &mut StdRng) -> Vec<Sample>;
}

/// Weight of a sample as seen by the resamplers.
#[inline]
pub(crate) fn effective_weight(sample: &Sample) -> f64 {
    if sample.weight.is_finite() && sample.weight > 0.0 {
        sample.weight
    } else {
        0.0
    }
}
