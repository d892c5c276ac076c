//! Constant-velocity transition with Gaussian diffusion.

use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use super::traits::TransitionModel;
use crate::utils::round_to_i32;
use crate::{Error, Image, Result, Sample};

/// Constant-velocity model with noisy velocity.
///
/// For every sample the velocity is perturbed first
/// (`vx += N(0, position_deviation)`, `v_size *= 2^N(0, size_deviation)`)
/// and the position and size are then advanced by it. With both deviations
/// at zero this is an exact integer integrator.
#[derive(Debug, Clone)]
pub struct SimpleTransitionModel {
    position_deviation: f64,
    size_deviation: f64,
}

impl SimpleTransitionModel {
    /// Create a new model.
    ///
    /// # Arguments
    /// * `position_deviation` - Standard deviation of the velocity noise in pixels
    /// * `size_deviation` - Standard deviation of the size-velocity noise in log2 scale
    pub fn new(position_deviation: f64, size_deviation: f64) -> Result<Self> {
        check_deviation("position_deviation", position_deviation)?;
        check_deviation("size_deviation", size_deviation)?;
        Ok(Self {
            position_deviation,
            size_deviation,
        })
    }

    pub fn position_deviation(&self) -> f64 {
        self.position_deviation
    }

    pub fn size_deviation(&self) -> f64 {
        self.size_deviation
    }
}

impl Default for SimpleTransitionModel {
    fn default() -> Self {
        Self {
            position_deviation: 1.5,
            size_deviation: 0.1,
        }
    }
}

/// Standard deviations must be finite and non-negative.
pub(crate) fn check_deviation(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}

/// Draw from `N(0, deviation)`.
#[inline]
pub(crate) fn gaussian(rng: &mut StdRng, deviation: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    deviation * z
}

impl TransitionModel for SimpleTransitionModel {
    fn init(&mut self, _image: &Image) {}

    fn predict(
        &mut self,
        samples: &mut [Sample],
        _image: &Image,
        _target: Option<&Sample>,
        rng: &mut StdRng,
    ) {
        for sample in samples.iter_mut() {
            if self.position_deviation > 0.0 {
                sample.vx += round_to_i32(gaussian(rng, self.position_deviation));
                sample.vy += round_to_i32(gaussian(rng, self.position_deviation));
            }
            if self.size_deviation > 0.0 {
                sample.v_size *= 2f64.powf(gaussian(rng, self.size_deviation));
            }
            sample.x += sample.vx;
            sample.y += sample.vy;
            sample.size = round_to_i32(f64::from(sample.size) * sample.v_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_zero_noise_is_exact_integrator() {
        let mut model = SimpleTransitionModel::new(0.0, 0.0).unwrap();
        let image = Image::filled(10, 10, 0);
        let mut rng = StdRng::seed_from_u64(0);

        let mut sample = Sample::new(10, 20, 30);
        sample.vx = 3;
        sample.vy = -2;
        sample.v_size = 1.1;
        let mut samples = vec![sample];

        model.predict(&mut samples, &image, None, &mut rng);
        assert_eq!(samples[0].x, 13);
        assert_eq!(samples[0].y, 18);
        assert_eq!(samples[0].size, 33);
        assert_eq!(samples[0].vx, 3);
        assert_eq!(samples[0].v_size, 1.1);

        model.predict(&mut samples, &image, None, &mut rng);
        assert_eq!(samples[0].x, 16);
        assert_eq!(samples[0].size, (33.0f64 * 1.1).round() as i32);
    }

    #[test]
    fn test_noise_spreads_particles() {
        let mut model = SimpleTransitionModel::new(2.0, 0.0).unwrap();
        let image = Image::filled(10, 10, 0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut samples = vec![Sample::new(100, 100, 20); 2000];

        model.predict(&mut samples, &image, None, &mut rng);

        let n = samples.len() as f64;
        let mean = samples.iter().map(|s| f64::from(s.x)).sum::<f64>() / n;
        let var = samples.iter().map(|s| (f64::from(s.x) - mean).powi(2)).sum::<f64>() / n;
        assert!((mean - 100.0).abs() < 0.3, "mean {}", mean);
        // rounding adds roughly 1/12 to the variance
        assert!((var.sqrt() - 2.0).abs() < 0.3, "std {}", var.sqrt());
        assert!(samples.iter().all(|s| s.size == 20));
    }

    #[test]
    fn test_negative_deviation_rejected() {
        assert!(SimpleTransitionModel::new(-1.0, 0.0).is_err());
        assert!(SimpleTransitionModel::new(1.0, f64::NAN).is_err());
    }
}
