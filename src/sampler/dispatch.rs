//! Enum-based sampler dispatch.

use rand::rngs::StdRng;

use super::grid::GridSampler;
use super::resampling_sampler::ResamplingSampler;
use super::traits::Sampler;
use crate::{Image, Sample};

/// Closed set of samplers with static dispatch.
#[derive(Debug)]
pub enum SamplerEnum {
    Grid(GridSampler),
    Resampling(ResamplingSampler),
}

impl Sampler for SamplerEnum {
    #[inline(always)]
    fn init(&mut self, image: &Image) {
        match self {
            SamplerEnum::Grid(s) => s.init(image),
            SamplerEnum::Resampling(s) => s.init(image),
        }
    }

    #[inline(always)]
    fn sample(
        &mut self,
        samples: &[Sample],
        new_samples: &mut Vec<Sample>,
        image: &Image,
        target: Option<&Sample>,
        rng: &mut StdRng,
    ) {
        match self {
            SamplerEnum::Grid(s) => s.sample(samples, new_samples, image, target, rng),
            SamplerEnum::Resampling(s) => s.sample(samples, new_samples, image, target, rng),
        }
    }
}

impl From<GridSampler> for SamplerEnum {
    fn from(sampler: GridSampler) -> Self {
        SamplerEnum::Grid(sampler)
    }
}

impl From<ResamplingSampler> for SamplerEnum {
    fn from(sampler: ResamplingSampler) -> Self {
        SamplerEnum::Resampling(sampler)
    }
}
