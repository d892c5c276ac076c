//! Particle filter tracker with a fixed appearance model.

use super::config::TrackerConfig;
use super::core::Particles;
use crate::measurement::{MeasurementModel, MeasurementModelEnum};
use crate::position::PositionExtractorEnum;
use crate::sampler::SamplerEnum;
use crate::{Image, Rect, Result, Sample};
use rand::rngs::StdRng;

/// Condensation tracker with a static measurement model.
#[derive(Debug)]
pub struct CondensationTracker {
    particles: Particles,
    measurement_model: MeasurementModelEnum,
}

impl CondensationTracker {
    /// Create a tracker from a configuration and a measurement model.
    pub fn new(config: &TrackerConfig, measurement_model: MeasurementModelEnum) -> Result<Self> {
        Ok(Self::from_parts(
            config.build_sampler()?,
            config.build_position_extractor(),
            measurement_model,
            config.build_rng(),
        ))
    }

    /// Create a tracker from explicit components.
    pub fn from_parts(
        sampler: SamplerEnum,
        position_extractor: PositionExtractorEnum,
        measurement_model: MeasurementModelEnum,
        rng: StdRng,
    ) -> Self {
        Self {
            particles: Particles::new(sampler, position_extractor, rng),
            measurement_model,
        }
    }

    /// Process the next frame.
    ///
    /// # Returns
    /// Bounding box of the target, `None` if it was not found.
    pub fn process(&mut self, image: Image) -> Option<Rect> {
        self.particles.set_frame(image);
        self.particles.sample();
        self.measurement_model
            .evaluate(&self.particles.image, &mut self.particles.samples);
        self.particles.extract()
    }

    /// Current state estimate.
    pub fn state(&self) -> Option<&Sample> {
        self.particles.state.as_ref()
    }

    /// Samples of the last frame.
    pub fn samples(&self) -> &[Sample] {
        &self.particles.samples
    }

    pub fn measurement_model(&self) -> &MeasurementModelEnum {
        &self.measurement_model
    }

    /// Forget the samples and state.
    pub fn reset(&mut self) {
        self.particles.reset();
    }
}
