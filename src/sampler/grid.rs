//! Exhaustive sliding-window sampler.

use rand::rngs::StdRng;

use super::traits::Sampler;
use crate::utils::round_to_i32;
use crate::{Error, Image, Result, Sample};

/// Deterministic sliding-window grid over all positions and scales.
///
/// Sizes grow geometrically from `min_size` by `size_scale` while they do not
/// exceed `max_size`; at each size the window moves with a stride of
/// `max(1, round(step_size * size))` pixels. The previous generation is ignored.
#[derive(Debug, Clone)]
pub struct GridSampler {
    min_size: i32,
    max_size: i32,
    size_scale: f64,
    step_size: f64,
}

impl GridSampler {
    /// Create a new grid sampler.
    ///
    /// # Arguments
    /// * `min_size` - Smallest window side (at least 1)
    /// * `max_size` - Largest window side (at least `min_size`)
    /// * `size_scale` - Factor between consecutive sizes (greater than 1)
    /// * `step_size` - Stride relative to the window size (greater than 0)
    pub fn new(min_size: i32, max_size: i32, size_scale: f64, step_size: f64) -> Result<Self> {
        if min_size < 1 {
            return Err(Error::InvalidArgument(format!(
                "min_size must be at least 1, got {}",
                min_size
            )));
        }
        if max_size < min_size {
            return Err(Error::InvalidArgument(format!(
                "max_size ({}) must not be smaller than min_size ({})",
                max_size, min_size
            )));
        }
        if !(size_scale > 1.0) || !size_scale.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "size_scale must be greater than 1, got {}",
                size_scale
            )));
        }
        if !(step_size > 0.0) || !step_size.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "step_size must be greater than 0, got {}",
                step_size
            )));
        }
        Ok(Self {
            min_size,
            max_size,
            size_scale,
            step_size,
        })
    }

    /// Window sides visited by the grid, smallest first.
    pub fn sizes(&self) -> Vec<i32> {
        let mut sizes = Vec::new();
        let mut real_size = f64::from(self.min_size);
        while real_size.round() <= f64::from(self.max_size) {
            let size = round_to_i32(real_size);
            if sizes.last() != Some(&size) {
                sizes.push(size);
            }
            real_size *= self.size_scale;
        }
        sizes
    }
}

impl Sampler for GridSampler {
    fn init(&mut self, _image: &Image) {}

    fn sample(
        &mut self,
        _samples: &[Sample],
        new_samples: &mut Vec<Sample>,
        image: &Image,
        _target: Option<&Sample>,
        _rng: &mut StdRng,
    ) {
        new_samples.clear();
        let width = image.width() as i32;
        let height = image.height() as i32;
        for size in self.sizes() {
            if size > width || size > height {
                break;
            }
            let step = round_to_i32(self.step_size * f64::from(size)).max(1) as usize;
            let half = size / 2;
            for y in (half..=height - size + half).step_by(step) {
                for x in (half..=width - size + half).step_by(step) {
                    new_samples.push(Sample::new(x, y, size));
                }
            }
        }
    }
}
