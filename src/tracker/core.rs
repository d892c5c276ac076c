//! Particle bookkeeping shared by the trackers.

use rand::rngs::StdRng;

use crate::position::{PositionExtractor, PositionExtractorEnum};
use crate::sampler::{Sampler, SamplerEnum};
use crate::{Image, Rect, Sample, VersionedImage};

/// Sampler, double-buffered samples, current frame and state estimate.
#[derive(Debug)]
pub(crate) struct Particles {
    pub sampler: SamplerEnum,
    pub position_extractor: PositionExtractorEnum,
    pub image: VersionedImage,
    pub samples: Vec<Sample>,
    pub old_samples: Vec<Sample>,
    pub state: Option<Sample>,
    pub rng: StdRng,
    sampler_ready: bool,
}

impl Particles {
    pub fn new(sampler: SamplerEnum, position_extractor: PositionExtractorEnum, rng: StdRng) -> Self {
        Self {
            sampler,
            position_extractor,
            image: VersionedImage::new(),
            samples: Vec::new(),
            old_samples: Vec::new(),
            state: None,
            rng,
            sampler_ready: false,
        }
    }

    /// Make `image` the current frame (bumps the version).
    pub fn set_frame(&mut self, image: Image) {
        self.image.set_data(image);
    }

    /// Replace the samples with a new generation drawn from the previous one.
    pub fn sample(&mut self) {
        let Some(frame) = self.image.data() else {
            return;
        };
        if !self.sampler_ready {
            self.sampler.init(frame);
            self.sampler_ready = true;
        }
        std::mem::swap(&mut self.samples, &mut self.old_samples);
        self.sampler.sample(
            &self.old_samples,
            &mut self.samples,
            frame,
            self.state.as_ref(),
            &mut self.rng,
        );
    }

    /// Draw samples for the current frame without a previous generation.
    pub fn sample_fresh(&mut self) {
        let Some(frame) = self.image.data() else {
            return;
        };
        self.sampler.init(frame);
        self.sampler_ready = true;
        self.old_samples.clear();
        self.sampler.sample(&[], &mut self.samples, frame, None, &mut self.rng);
    }

    /// Update the state from the evaluated samples.
    pub fn extract(&mut self) -> Option<Rect> {
        self.state = self.position_extractor.extract(&self.samples);
        match &self.state {
            Some(state) => tracing::debug!(
                x = state.x,
                y = state.y,
                size = state.size,
                weight = state.weight,
                "target found"
            ),
            None => tracing::debug!("no target"),
        }
        self.state.as_ref().map(Sample::bounds)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.old_samples.clear();
        self.state = None;
        self.sampler_ready = false;
    }
}
