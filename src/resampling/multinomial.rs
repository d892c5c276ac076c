//! Multinomial (independent draw) resampling.

use rand::rngs::StdRng;
use rand::Rng;

use super::traits::{effective_weight, Resampling};
use crate::Sample;

/// Classic bootstrap resampling: `count` independent draws from the
/// cumulative weight distribution, each located by binary search.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultinomialResampling;

impl MultinomialResampling {
    pub fn new() -> Self {
        Self
    }
}

impl Resampling for MultinomialResampling {
    fn resample(&self, samples: &[Sample], count: usize, rng: &mut StdRng) -> Vec<Sample> {
        let mut cumulative = Vec::with_capacity(samples.len());
        let mut total = 0.0;
        for sample in samples {
            total += effective_weight(sample);
            cumulative.push(total);
        }
        if count == 0 || samples.is_empty() || total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }

        let last = samples
            .iter()
            .rposition(|s| effective_weight(s) > 0.0)
            .unwrap_or(0);
        (0..count)
            .map(|_| {
                let u = rng.gen::<f64>() * total;
                // first interval whose upper bound exceeds u; zero-weight samples have empty intervals
                let index = cumulative
                    .partition_point(|&c| c <= u)
                    .min(last);
                samples[index].clone()
            })
            .collect()
    }
}
