//! Tracker configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::position::{MaxWeightPositionExtractor, PositionExtractorEnum, WeightedMeanPositionExtractor};
use crate::resampling::{LowVarianceResampling, MultinomialResampling, ResamplingAlgorithm};
use crate::sampler::{ResamplingSampler, SamplerEnum};
use crate::transition::{SimpleTransitionModel, TransitionModelEnum};
use crate::Result;

/// Resampling algorithm selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplingKind {
    #[default]
    LowVariance,
    Multinomial,
}

/// Position extractor selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionExtractorKind {
    #[default]
    WeightedMean,
    MaxWeight,
}

/// Configuration of the particle filter shared by all trackers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Seed of the random number generator.
    pub seed: u64,

    /// Number of samples per frame.
    pub sample_count: usize,

    /// Fraction of samples drawn at random instead of resampled.
    pub random_rate: f64,

    /// Smallest box side considered.
    pub min_size: i32,

    /// Largest box side considered.
    pub max_size: i32,

    /// Velocity noise in pixels.
    pub position_deviation: f64,

    /// Size-velocity noise in log2 scale.
    pub size_deviation: f64,

    pub resampling: ResamplingKind,

    pub position_extractor: PositionExtractorKind,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(20, 200)
    }
}

impl TrackerConfig {
    /// Create a configuration for the given box size range.
    ///
    /// # Arguments
    /// * `min_size` - Smallest box side
    /// * `max_size` - Largest box side
    pub fn new(min_size: i32, max_size: i32) -> Self {
        Self {
            seed: 0,
            sample_count: 800,
            random_rate: 0.2,
            min_size,
            max_size,
            position_deviation: 1.5,
            size_deviation: 0.1,
            resampling: ResamplingKind::default(),
            position_extractor: PositionExtractorKind::default(),
        }
    }

    /// Build the resampling sampler described by this configuration.
    pub fn build_sampler(&self) -> Result<SamplerEnum> {
        let resampling = match self.resampling {
            ResamplingKind::LowVariance => ResamplingAlgorithm::LowVariance(LowVarianceResampling),
            ResamplingKind::Multinomial => ResamplingAlgorithm::Multinomial(MultinomialResampling),
        };
        let transition = TransitionModelEnum::Simple(SimpleTransitionModel::new(
            self.position_deviation,
            self.size_deviation,
        )?);
        let sampler = ResamplingSampler::new(
            self.sample_count,
            self.random_rate,
            resampling,
            transition,
            self.min_size,
            self.max_size,
        )?;
        Ok(sampler.into())
    }

    pub fn build_position_extractor(&self) -> PositionExtractorEnum {
        match self.position_extractor {
            PositionExtractorKind::WeightedMean => {
                PositionExtractorEnum::WeightedMean(WeightedMeanPositionExtractor)
            }
            PositionExtractorKind::MaxWeight => PositionExtractorEnum::MaxWeight(MaxWeightPositionExtractor),
        }
    }

    pub fn build_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
