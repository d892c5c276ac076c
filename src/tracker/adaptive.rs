//! Particle filter tracker with an online-learned appearance model.

use super::config::TrackerConfig;
use super::core::Particles;
use crate::measurement::{AdaptiveMeasurementModel, AdaptiveMeasurementModelEnum, MeasurementModel};
use crate::position::PositionExtractorEnum;
use crate::sampler::SamplerEnum;
use crate::{Image, Rect, Result, Sample};
use rand::rngs::StdRng;

/// Condensation tracker whose measurement model is trained from its own output.
///
/// The model must first be seeded with [`initialize`](Self::initialize),
/// possibly over several frames, until it becomes usable.
#[derive(Debug)]
pub struct AdaptiveCondensationTracker {
    particles: Particles,
    measurement_model: AdaptiveMeasurementModelEnum,
}

impl AdaptiveCondensationTracker {
    pub fn new(config: &TrackerConfig, measurement_model: AdaptiveMeasurementModelEnum) -> Result<Self> {
        Ok(Self::from_parts(
            config.build_sampler()?,
            config.build_position_extractor(),
            measurement_model,
            config.build_rng(),
        ))
    }

    pub fn from_parts(
        sampler: SamplerEnum,
        position_extractor: PositionExtractorEnum,
        measurement_model: AdaptiveMeasurementModelEnum,
        rng: StdRng,
    ) -> Self {
        Self {
            particles: Particles::new(sampler, position_extractor, rng),
            measurement_model,
        }
    }

    /// Train the measurement model with a known target position.
    ///
    /// # Arguments
    /// * `image` - Frame containing the target
    /// * `rect` - Bounding box of the target
    ///
    /// # Returns
    /// Whether the measurement model is usable afterwards.
    pub fn initialize(&mut self, image: Image, rect: &Rect) -> Result<bool> {
        self.particles.set_frame(image);
        self.particles.sample_fresh();

        let target = Sample::from_rect(rect);
        self.measurement_model
            .adapt(&self.particles.image, &self.particles.samples, &target)?;

        let usable = self.measurement_model.is_usable();
        if usable {
            self.measurement_model
                .evaluate(&self.particles.image, &mut self.particles.samples);
        }
        tracing::info!(x = rect.x, y = rect.y, width = rect.width, height = rect.height, usable, "initialized target");
        self.particles.state = Some(target);
        Ok(usable)
    }

    /// Process the next frame.
    ///
    /// # Returns
    /// Bounding box of the target, `None` if it was not found or the model is
    /// not usable yet. Errors only come from a broken classifier configuration.
    pub fn process(&mut self, image: Image) -> Result<Option<Rect>> {
        self.particles.set_frame(image);
        if !self.measurement_model.is_usable() {
            self.particles.state = None;
            return Ok(None);
        }

        self.particles.sample();
        self.measurement_model
            .evaluate(&self.particles.image, &mut self.particles.samples);
        let bounds = self.particles.extract();

        match &self.particles.state {
            Some(target) => self.measurement_model.adapt(
                &self.particles.image,
                &self.particles.samples,
                target,
            )?,
            None => self
                .measurement_model
                .adapt_no_target(&self.particles.image, &self.particles.samples)?,
        }
        Ok(bounds)
    }

    pub fn is_usable(&self) -> bool {
        self.measurement_model.is_usable()
    }

    pub fn state(&self) -> Option<&Sample> {
        self.particles.state.as_ref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.particles.samples
    }

    pub fn measurement_model(&self) -> &AdaptiveMeasurementModelEnum {
        &self.measurement_model
    }

    /// Forget the samples, the state and everything the model learned.
    pub fn reset(&mut self) {
        self.particles.reset();
        self.measurement_model.reset();
    }
}
