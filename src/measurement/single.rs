//! Measurement model backed by one fixed classifier.

use std::fmt;

use super::cache::PatchCache;
use super::traits::MeasurementModel;
use crate::classifier::Classifier;
use crate::features::FeatureExtractor;
use crate::{Sample, VersionedImage};

/// Scores every sample with a classifier applied to the patch of its box.
///
/// The classifier confidence becomes the sample weight.
pub struct SingleClassifierModel {
    extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn Classifier>,
    cache: PatchCache,
}

impl SingleClassifierModel {
    pub fn new(extractor: Box<dyn FeatureExtractor>, classifier: Box<dyn Classifier>) -> Self {
        Self {
            extractor,
            classifier,
            cache: PatchCache::new(),
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

impl fmt::Debug for SingleClassifierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleClassifierModel")
            .field("cached_patches", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl MeasurementModel for SingleClassifierModel {
    fn update(&mut self, image: &VersionedImage) {
        self.extractor.update(image);
        self.cache.sync(image.version());
    }

    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]) {
        self.update(image);
        for sample in samples.iter_mut() {
            let key = self
                .cache
                .lookup(self.extractor.as_mut(), sample.x, sample.y, sample.size, sample.size);
            let (is_target, probability) = self
                .cache
                .classify(key, self.classifier.as_ref())
                .unwrap_or((false, 0.0));
            sample.is_target = is_target;
            sample.weight = probability;
        }
    }
}
