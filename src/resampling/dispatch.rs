//! Enum-based resampling dispatch.

use rand::rngs::StdRng;

use super::low_variance::LowVarianceResampling;
use super::multinomial::MultinomialResampling;
use super::traits::Resampling;
use crate::Sample;

/// Closed set of resampling algorithms with static dispatch.
#[derive(Debug, Clone, Copy)]
pub enum ResamplingAlgorithm {
    LowVariance(LowVarianceResampling),
    Multinomial(MultinomialResampling),
}

impl Default for ResamplingAlgorithm {
    fn default() -> Self {
        ResamplingAlgorithm::LowVariance(LowVarianceResampling)
    }
}

impl Resampling for ResamplingAlgorithm {
    #[inline(always)]
    fn resample(&self, samples: &[Sample], count: usize, rng: &mut StdRng) -> Vec<Sample> {
        match self {
            ResamplingAlgorithm::LowVariance(r) => r.resample(samples, count, rng),
            ResamplingAlgorithm::Multinomial(r) => r.resample(samples, count, rng),
        }
    }
}
