//! Resampling algorithms for the particle filter.
//!
//! - `LowVarianceResampling` - systematic resampling with one random offset
//! - `MultinomialResampling` - independent draws by binary search

mod traits;
mod low_variance;
mod multinomial;
mod dispatch;

pub use traits::Resampling;
pub use low_variance::LowVarianceResampling;
pub use multinomial::MultinomialResampling;
pub use dispatch::ResamplingAlgorithm;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn weighted(weights: &[f64]) -> Vec<Sample> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let mut s = Sample::new(i as i32, 0, 10);
                s.weight = w;
                s
            })
            .collect()
    }

    fn frequencies(algorithm: &ResamplingAlgorithm, weights: &[f64], trials: usize) -> Vec<f64> {
        let samples = weighted(weights);
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = vec![0usize; weights.len()];
        let per_trial = 50;
        for _ in 0..trials {
            for s in algorithm.resample(&samples, per_trial, &mut rng) {
                counts[s.x as usize] += 1;
            }
        }
        let total = (trials * per_trial) as f64;
        counts.iter().map(|&c| c as f64 / total).collect()
    }

    // ===== Proportionality =====

    #[test]
    fn test_low_variance_proportional() {
        let weights = [0.1, 0.2, 0.3, 0.4];
        let freq = frequencies(&ResamplingAlgorithm::LowVariance(LowVarianceResampling), &weights, 400);
        for (f, w) in freq.iter().zip(weights.iter()) {
            assert!((f - w).abs() < 0.02, "frequency {} too far from weight {}", f, w);
        }
    }

    #[test]
    fn test_multinomial_proportional() {
        let weights = [0.5, 0.25, 0.125, 0.125];
        let freq = frequencies(&ResamplingAlgorithm::Multinomial(MultinomialResampling), &weights, 400);
        for (f, w) in freq.iter().zip(weights.iter()) {
            assert!((f - w).abs() < 0.02, "frequency {} too far from weight {}", f, w);
        }
    }

    #[test]
    fn test_unnormalised_weights_are_fine() {
        let weights = [2.0, 6.0];
        let freq = frequencies(&ResamplingAlgorithm::default(), &weights, 200);
        assert!((freq[0] - 0.25).abs() < 0.02);
        assert!((freq[1] - 0.75).abs() < 0.02);
    }

    // ===== Degenerate inputs =====

    #[test]
    fn test_zero_weight_never_drawn() {
        let samples = weighted(&[0.0, 1.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(1);
        for algorithm in [
            ResamplingAlgorithm::LowVariance(LowVarianceResampling),
            ResamplingAlgorithm::Multinomial(MultinomialResampling),
        ] {
            let drawn = algorithm.resample(&samples, 100, &mut rng);
            assert_eq!(drawn.len(), 100);
            assert!(drawn.iter().all(|s| s.x == 1));
        }
    }

    #[test]
    fn test_empty_or_weightless_input_gives_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let algorithm = ResamplingAlgorithm::default();
        assert!(algorithm.resample(&[], 10, &mut rng).is_empty());
        assert!(algorithm.resample(&weighted(&[0.0, 0.0]), 10, &mut rng).is_empty());
        assert!(algorithm.resample(&weighted(&[f64::NAN, -1.0]), 10, &mut rng).is_empty());
    }

    #[test]
    fn test_exact_count() {
        let samples = weighted(&[0.3, 0.3, 0.4]);
        let mut rng = StdRng::seed_from_u64(3);
        for count in [1, 2, 3, 17, 1000] {
            assert_eq!(ResamplingAlgorithm::default().resample(&samples, count, &mut rng).len(), count);
        }
    }
}
