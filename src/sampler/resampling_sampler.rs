//! Importance resampling with random exploration.

use rand::rngs::StdRng;
use rand::Rng;

use super::traits::Sampler;
use crate::resampling::{Resampling, ResamplingAlgorithm};
use crate::transition::{TransitionModel, TransitionModelEnum};
use crate::utils::{round_to_i32, warn_once};
use crate::{Error, Image, Result, Sample};

/// Sampler that resamples the previous generation, moves it with a transition
/// model and tops it up with uniformly drawn random samples.
///
/// Always returns exactly `count` samples, each with a size in
/// `[min_size, max_size]` and a box inside the image (as long as the image can
/// hold a `min_size` box at all).
#[derive(Debug)]
pub struct ResamplingSampler {
    count: usize,
    random_rate: f64,
    resampling: ResamplingAlgorithm,
    transition: TransitionModelEnum,
    min_size: i32,
    max_size: i32,
}

impl ResamplingSampler {
    /// Create a new resampling sampler.
    ///
    /// # Arguments
    /// * `count` - Number of samples per generation
    /// * `random_rate` - Fraction of samples drawn at random, in `[0, 1]`
    /// * `resampling` - Algorithm drawing from the weighted previous generation
    /// * `transition` - Model advancing resampled particles
    /// * `min_size` - Minimum box side (at least 1)
    /// * `max_size` - Maximum box side (at least `min_size`)
    pub fn new(
        count: usize,
        random_rate: f64,
        resampling: ResamplingAlgorithm,
        transition: TransitionModelEnum,
        min_size: i32,
        max_size: i32,
    ) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidArgument("count must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&random_rate) {
            return Err(Error::InvalidArgument(format!(
                "random_rate must be in [0, 1], got {}",
                random_rate
            )));
        }
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
        Ok(Self {
            count,
            random_rate,
            resampling,
            transition,
            min_size,
            max_size,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn random_rate(&self) -> f64 {
        self.random_rate
    }

    pub fn min_size(&self) -> i32 {
        self.min_size
    }

    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    /// Whether a sample has an allowed size and lies inside the image.
    pub fn is_valid(&self, sample: &Sample, image: &Image) -> bool {
        sample.size >= self.min_size
            && sample.size <= self.max_size
            && sample.bounds().is_inside(image.width(), image.height())
    }

    /// Draw a sample uniformly over valid sizes and positions.
    pub fn random_sample(&self, image: &Image, rng: &mut StdRng) -> Sample {
        let width = image.width() as i32;
        let height = image.height() as i32;
        let max_size = self.max_size.min(width).min(height);
        if max_size < self.min_size {
            warn_once(&format!(
                "image {}x{} cannot hold a sample of min_size {}",
                width, height, self.min_size
            ));
            return Sample::new(width / 2, height / 2, self.min_size);
        }

        let size = rng.gen_range(self.min_size..=max_size);
        let half = size / 2;
        let x = rng.gen_range(half..=width - size + half);
        let y = rng.gen_range(half..=height - size + half);
        Sample::new(x, y, size)
    }
}

impl Sampler for ResamplingSampler {
    fn init(&mut self, image: &Image) {
        self.transition.init(image);
    }

    fn sample(
        &mut self,
        samples: &[Sample],
        new_samples: &mut Vec<Sample>,
        image: &Image,
        target: Option<&Sample>,
        rng: &mut StdRng,
    ) {
        new_samples.clear();

        let resample_count = round_to_i32((1.0 - self.random_rate) * self.count as f64)
            .clamp(0, self.count as i32) as usize;
        let mut moved = self.resampling.resample(samples, resample_count, rng);
        self.transition.predict(&mut moved, image, target, rng);

        for sample in moved {
            if self.is_valid(&sample, image) {
                new_samples.push(sample);
            } else {
                new_samples.push(self.random_sample(image, rng));
            }
        }
        while new_samples.len() < self.count {
            new_samples.push(self.random_sample(image, rng));
        }
    }
}
