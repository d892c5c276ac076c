//! Adaptive measurement model that labels its own evaluations.

use nalgebra::DVector;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

use super::cache::PatchCache;
use super::ranking::highest;
use super::traits::{AdaptiveMeasurementModel, MeasurementModel};
use crate::classifier::TrainableClassifier;
use crate::features::FeatureExtractor;
use crate::{Error, Rect, Result, Sample, VersionedImage};

/// Tuning of [`SelfLearningMeasurementModel`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelfLearningParameters {
    /// Samples at least this probable become positives.
    pub positive_threshold: f64,
    /// Samples at most this probable become negatives.
    pub negative_threshold: f64,
    /// Maximum number of positives and of negatives taken per frame.
    pub max_examples: usize,
}

impl Default for SelfLearningParameters {
    fn default() -> Self {
        Self {
            positive_threshold: 0.9,
            negative_threshold: 0.1,
            max_examples: 10,
        }
    }
}

impl SelfLearningParameters {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.positive_threshold)
            || !(0.0..=1.0).contains(&self.negative_threshold)
            || self.negative_threshold >= self.positive_threshold
        {
            return Err(Error::InvalidConfig(format!(
                "thresholds must satisfy 0 <= negative < positive <= 1, got {} / {}",
                self.negative_threshold, self.positive_threshold
            )));
        }
        Ok(())
    }
}

/// Adaptive model trained with the target patch as positive and the samples
/// it is confident about as further examples.
///
/// Before the first training, all samples not overlapping the target are
/// used as negatives. The model is usable as soon as its classifier is.
pub struct SelfLearningMeasurementModel {
    extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn TrainableClassifier>,
    parameters: SelfLearningParameters,
    cache: PatchCache,
}

impl SelfLearningMeasurementModel {
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        classifier: Box<dyn TrainableClassifier>,
        parameters: SelfLearningParameters,
    ) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            extractor,
            classifier,
            parameters,
            cache: PatchCache::new(),
        })
    }

    pub fn classifier(&self) -> &dyn TrainableClassifier {
        self.classifier.as_ref()
    }

    /// Probability of a sample box, 0 while unusable, `None` outside the image.
    fn score(&mut self, sample: &Sample) -> Option<f64> {
        let key = self
            .cache
            .lookup(self.extractor.as_mut(), sample.x, sample.y, sample.size, sample.size);
        self.cache.patch(key)?;
        if self.classifier.is_usable() {
            self.cache
                .classify(key, self.classifier.as_ref())
                .map(|(_, probability)| probability)
        } else {
            Some(0.0)
        }
    }

    fn harvest(&mut self, samples: &[Sample], target: &Sample) -> (Vec<DVector<f64>>, Vec<DVector<f64>>) {
        let target_bounds = target.bounds();
        let mut seen: HashSet<Rect> = HashSet::new();
        seen.insert(target_bounds);

        // distinct boxes inside the image, weighted by the current probability
        let mut scored: Vec<Sample> = Vec::new();
        for sample in samples {
            if !seen.insert(sample.bounds()) {
                continue;
            }
            if let Some(probability) = self.score(sample) {
                let mut scored_sample = sample.clone();
                scored_sample.weight = probability;
                scored.push(scored_sample);
            }
        }

        let SelfLearningParameters {
            positive_threshold,
            negative_threshold,
            max_examples,
        } = self.parameters;
        let outside = |s: &&Sample| !s.bounds().intersects(&target_bounds);

        let (chosen_positives, chosen_negatives): (Vec<&Sample>, Vec<&Sample>) =
            if self.classifier.is_usable() {
                let confident = scored.iter().filter(|s| s.weight >= positive_threshold);
                let rejected = scored
                    .iter()
                    .filter(|s| s.weight <= negative_threshold)
                    .filter(outside);
                (
                    highest(confident, max_examples, |s| s.weight),
                    highest(rejected, max_examples, |s| -s.weight),
                )
            } else {
                (Vec::new(), scored.iter().filter(outside).take(max_examples).collect())
            };

        let positives = chosen_positives
            .into_iter()
            .filter_map(|s| self.cache_features(s))
            .collect();
        let negatives = chosen_negatives
            .into_iter()
            .filter_map(|s| self.cache_features(s))
            .collect();
        (positives, negatives)
    }

    /// Features of a box that is already in the cache.
    fn cache_features(&self, sample: &Sample) -> Option<DVector<f64>> {
        self.cache
            .find(&sample.bounds())
            .and_then(|key| self.cache.patch(key))
            .map(|p| p.data.clone())
    }
}

impl fmt::Debug for SelfLearningMeasurementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfLearningMeasurementModel")
            .field("parameters", &self.parameters)
            .field("usable", &self.classifier.is_usable())
            .finish_non_exhaustive()
    }
}

impl MeasurementModel for SelfLearningMeasurementModel {
    fn update(&mut self, image: &VersionedImage) {
        self.extractor.update(image);
        self.cache.sync(image.version());
    }

    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]) {
        self.update(image);
        let usable = self.classifier.is_usable();
        for sample in samples.iter_mut() {
            if !usable {
                sample.weight = 0.0;
                sample.is_target = false;
                continue;
            }
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

impl AdaptiveMeasurementModel for SelfLearningMeasurementModel {
    fn is_usable(&self) -> bool {
        self.classifier.is_usable()
    }

    fn adapt(&mut self, image: &VersionedImage, samples: &[Sample], target: &Sample) -> Result<()> {
        self.update(image);
        let scored = self.score(target).is_some();
        let Some(target_features) = scored.then(|| self.cache_features(target)).flatten() else {
            tracing::debug!("target outside the image, skipping adaptation");
            return Ok(());
        };
        let (mut positives, negatives) = self.harvest(samples, target);
        positives.insert(0, target_features);
        self.classifier.retrain(positives, negatives)?;
        self.cache.forget_classifications();
        Ok(())
    }

    fn adapt_no_target(&mut self, image: &VersionedImage, _samples: &[Sample]) -> Result<()> {
        self.update(image);
        Ok(())
    }

    fn reset(&mut self) {
        self.classifier.reset();
        self.cache.forget_classifications();
    }
}
