//! Tracker switching between a static and an adaptive measurement model.

use super::config::TrackerConfig;
use super::core::Particles;
use crate::measurement::{
    AdaptiveMeasurementModel, AdaptiveMeasurementModelEnum, MeasurementModel, MeasurementModelEnum,
};
use crate::position::PositionExtractorEnum;
use crate::sampler::SamplerEnum;
use crate::{Image, Rect, Result, Sample};
use rand::rngs::StdRng;

/// Condensation tracker that evaluates with the adaptive model once it is
/// usable and with the static model otherwise.
///
/// The adaptive model learns from every frame while adaptation is enabled,
/// no matter which model evaluated the frame.
#[derive(Debug)]
pub struct PartiallyAdaptiveCondensationTracker {
    particles: Particles,
    static_model: MeasurementModelEnum,
    adaptive_model: AdaptiveMeasurementModelEnum,
    use_adaptive_model: bool,
    used_adaptive_model: bool,
}

impl PartiallyAdaptiveCondensationTracker {
    pub fn new(
        config: &TrackerConfig,
        static_model: MeasurementModelEnum,
        adaptive_model: AdaptiveMeasurementModelEnum,
    ) -> Result<Self> {
        Ok(Self::from_parts(
            config.build_sampler()?,
            config.build_position_extractor(),
            static_model,
            adaptive_model,
            config.build_rng(),
        ))
    }

    pub fn from_parts(
        sampler: SamplerEnum,
        position_extractor: PositionExtractorEnum,
        static_model: MeasurementModelEnum,
        adaptive_model: AdaptiveMeasurementModelEnum,
        rng: StdRng,
    ) -> Self {
        Self {
            particles: Particles::new(sampler, position_extractor, rng),
            static_model,
            adaptive_model,
            use_adaptive_model: true,
            used_adaptive_model: false,
        }
    }

    /// Process the next frame.
    ///
    /// # Returns
    /// Bounding box of the target, `None` if it was not found.
    pub fn process(&mut self, image: Image) -> Result<Option<Rect>> {
        self.particles.set_frame(image);
        self.particles.sample();

        self.used_adaptive_model = self.use_adaptive_model && self.adaptive_model.is_usable();
        if self.used_adaptive_model {
            self.adaptive_model
                .evaluate(&self.particles.image, &mut self.particles.samples);
        } else {
            self.static_model
                .evaluate(&self.particles.image, &mut self.particles.samples);
        }
        let bounds = self.particles.extract();

        if self.use_adaptive_model {
            match &self.particles.state {
                Some(target) => self.adaptive_model.adapt(
                    &self.particles.image,
                    &self.particles.samples,
                    target,
                )?,
                None => self
                    .adaptive_model
                    .adapt_no_target(&self.particles.image, &self.particles.samples)?,
            }
        }
        Ok(bounds)
    }

    /// Enable or disable the adaptive model. Disabling forgets what it learned.
    pub fn set_use_adaptive_model(&mut self, use_adaptive_model: bool) {
        if !use_adaptive_model {
            self.adaptive_model.reset();
        }
        self.use_adaptive_model = use_adaptive_model;
    }

    pub fn use_adaptive_model(&self) -> bool {
        self.use_adaptive_model
    }

    /// Whether the last frame was evaluated by the adaptive model.
    pub fn used_adaptive_model(&self) -> bool {
        self.used_adaptive_model
    }

    /// Stop tracking: forget what the adaptive model learned.
    pub fn stop(&mut self) {
        tracing::info!("stopping, resetting adaptive measurement model");
        self.adaptive_model.reset();
        self.used_adaptive_model = false;
    }

    pub fn state(&self) -> Option<&Sample> {
        self.particles.state.as_ref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.particles.samples
    }

    pub fn adaptive_model(&self) -> &AdaptiveMeasurementModelEnum {
        &self.adaptive_model
    }

    /// Forget the samples, the state and the adaptive model.
    pub fn reset(&mut self) {
        self.particles.reset();
        self.adaptive_model.reset();
        self.used_adaptive_model = false;
    }
}
