//! Measurement model contracts.

use crate::{Result, Sample, VersionedImage};

/// Assigns weights to samples from image evidence.
pub trait MeasurementModel {
    /// Hand the current frame to the model. Cached data of older frames is dropped.
    fn update(&mut self, image: &VersionedImage);

    /// Set `weight` and `is_target` of every sample.
    ///
    /// Samples whose box cannot be extracted get weight 0 and are not targets.
    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]);
}

/// Measurement model that learns the target appearance while tracking.
pub trait AdaptiveMeasurementModel: MeasurementModel {
    /// Whether the model can be used for evaluation. Unusable models evaluate
    /// every sample to weight 0.
    fn is_usable(&self) -> bool;

    /// Learn from a frame in which the target was found.
    ///
    /// # Arguments
    /// * `image` - The frame that was evaluated
    /// * `samples` - The evaluated samples of that frame
    /// * `target` - The estimated target state
    fn adapt(&mut self, image: &VersionedImage, samples: &[Sample], target: &Sample) -> Result<()>;

    /// Learn from a frame in which no target was found.
    fn adapt_no_target(&mut self, image: &VersionedImage, samples: &[Sample]) -> Result<()>;

    /// Forget everything learned so far.
    fn reset(&mut self);
}
