//! Measurement model with a binary pre/post filter.

use std::fmt;

use super::cache::PatchCache;
use super::dispatch::MeasurementModelEnum;
use super::traits::MeasurementModel;
use crate::classifier::Classifier;
use crate::features::FeatureExtractor;
use crate::{Sample, VersionedImage};

/// What happens to samples rejected by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Rejected samples get weight 0 and never reach the wrapped model.
    #[default]
    ResetWeight,
    /// Every sample is evaluated by the wrapped model; rejected samples lose
    /// their target flag but keep their weight.
    KeepWeight,
}

/// Wraps a measurement model with a cheap binary classifier.
pub struct FilteringClassifierModel {
    model: Box<MeasurementModelEnum>,
    extractor: Box<dyn FeatureExtractor>,
    filter: Box<dyn Classifier>,
    mode: FilterMode,
    cache: PatchCache,
}

impl FilteringClassifierModel {
    /// Create a new filtering model.
    ///
    /// # Arguments
    /// * `model` - Model evaluating the samples that pass the filter
    /// * `extractor` - Feature extractor of the filter
    /// * `filter` - Binary classifier; only its decision is used
    /// * `mode` - Treatment of rejected samples
    pub fn new(
        model: MeasurementModelEnum,
        extractor: Box<dyn FeatureExtractor>,
        filter: Box<dyn Classifier>,
        mode: FilterMode,
    ) -> Self {
        Self {
            model: Box::new(model),
            extractor,
            filter,
            mode,
            cache: PatchCache::new(),
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    fn passes(&mut self, sample: &Sample) -> bool {
        let key = self
            .cache
            .lookup(self.extractor.as_mut(), sample.x, sample.y, sample.size, sample.size);
        self.cache
            .classify(key, self.filter.as_ref())
            .map_or(false, |(positive, _)| positive)
    }
}

impl fmt::Debug for FilteringClassifierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringClassifierModel")
            .field("model", &self.model)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl MeasurementModel for FilteringClassifierModel {
    fn update(&mut self, image: &VersionedImage) {
        self.model.update(image);
        self.extractor.update(image);
        self.cache.sync(image.version());
    }

    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]) {
        self.update(image);
        match self.mode {
            FilterMode::ResetWeight => {
                let mut indices = Vec::new();
                let mut accepted = Vec::new();
                for (i, sample) in samples.iter_mut().enumerate() {
                    if self.passes(sample) {
                        indices.push(i);
                        accepted.push(sample.clone());
                    } else {
                        sample.weight = 0.0;
                        sample.is_target = false;
                    }
                }
                self.model.evaluate(image, &mut accepted);
                for (i, sample) in indices.into_iter().zip(accepted) {
                    samples[i] = sample;
                }
            }
            FilterMode::KeepWeight => {
                self.model.evaluate(image, samples);
                for sample in samples.iter_mut() {
                    if sample.is_target && !self.passes(sample) {
                        sample.is_target = false;
                    }
                }
            }
        }
    }
}
