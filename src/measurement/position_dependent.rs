//! Adaptive measurement model learning from the neighbourhood of the target.

use nalgebra::DVector;
use serde::Deserialize;
use std::fmt;

use super::cache::PatchCache;
use super::ranking::highest;
use super::traits::{AdaptiveMeasurementModel, MeasurementModel};
use crate::classifier::TrainableClassifier;
use crate::features::FeatureExtractor;
use crate::utils::round_to_i32;
use crate::{Error, Result, Sample, VersionedImage};

/// Tuning of [`PositionDependentMeasurementModel`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionDependentParameters {
    /// Consecutive frames with a target before the first training.
    pub start_frame_count: u32,

    /// Consecutive frames without a target after which everything is forgotten.
    pub stop_frame_count: u32,

    /// Offset of the jittered positives, relative to the target size.
    pub positive_offset_factor: f64,

    /// Offset of the negatives around the target, relative to the target size.
    pub negative_offset_factor: f64,

    /// Negatives around the target: 0 none, 1 edges, 2 edges and corners,
    /// 3 edges, corners and scales.
    pub sample_negative_density: u32,

    /// Maximum number of negatives taken from the sample set.
    pub random_negatives: usize,

    /// Minimum target probability for a frame to be learned from.
    pub target_threshold: f64,

    /// Examples the classifier is already this sure about are not learned.
    pub confidence_threshold: f64,
}

impl Default for PositionDependentParameters {
    fn default() -> Self {
        Self {
            start_frame_count: 3,
            stop_frame_count: 5,
            positive_offset_factor: 0.05,
            negative_offset_factor: 0.5,
            sample_negative_density: 2,
            random_negatives: 10,
            target_threshold: 0.5,
            confidence_threshold: 0.95,
        }
    }
}

impl PositionDependentParameters {
    pub fn validate(&self) -> Result<()> {
        if self.start_frame_count == 0 || self.stop_frame_count == 0 {
            return Err(Error::InvalidConfig(format!(
                "start and stop frame counts must be positive, got {} / {}",
                self.start_frame_count, self.stop_frame_count
            )));
        }
        if !(self.positive_offset_factor >= 0.0) || !self.positive_offset_factor.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "positive_offset_factor must be non-negative, got {}",
                self.positive_offset_factor
            )));
        }
        if !(self.negative_offset_factor > 0.0) || !self.negative_offset_factor.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "negative_offset_factor must be positive, got {}",
                self.negative_offset_factor
            )));
        }
        if self.sample_negative_density > 3 {
            return Err(Error::InvalidConfig(format!(
                "sample_negative_density must be in 0..=3, got {}",
                self.sample_negative_density
            )));
        }
        for (name, value) in [
            ("target_threshold", self.target_threshold),
            ("confidence_threshold", self.confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Learning state of an adaptive model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveState {
    /// Collecting consecutive detections before the first training.
    WarmingUp,
    /// Trained and used for evaluation.
    Usable,
}

/// Adaptive model that harvests positives at the estimated target position
/// and negatives around it.
///
/// While warming up, `frame_count` counts consecutive frames with a target and
/// training starts once it reaches `start_frame_count`. Once usable it counts
/// consecutive frames without a target, and reaching `stop_frame_count`
/// resets the model.
pub struct PositionDependentMeasurementModel {
    extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn TrainableClassifier>,
    parameters: PositionDependentParameters,
    state: AdaptiveState,
    frame_count: u32,
    cache: PatchCache,
}

impl PositionDependentMeasurementModel {
    /// Create a new model.
    ///
    /// # Arguments
    /// * `extractor` - Feature extractor for sample boxes
    /// * `classifier` - Classifier that is retrained from the harvested examples
    /// * `parameters` - Harvesting and state-machine tuning
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        classifier: Box<dyn TrainableClassifier>,
        parameters: PositionDependentParameters,
    ) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            extractor,
            classifier,
            parameters,
            state: AdaptiveState::WarmingUp,
            frame_count: 0,
            cache: PatchCache::new(),
        })
    }

    pub fn parameters(&self) -> &PositionDependentParameters {
        &self.parameters
    }

    pub fn state(&self) -> AdaptiveState {
        self.state
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn classifier(&self) -> &dyn TrainableClassifier {
        self.classifier.as_ref()
    }

    fn probability(&mut self, x: i32, y: i32, size: i32) -> Option<f64> {
        let key = self.cache.lookup(self.extractor.as_mut(), x, y, size, size);
        self.cache
            .classify(key, self.classifier.as_ref())
            .map(|(_, probability)| probability)
    }

    /// Feature vectors of the given boxes that fit the image and pass `keep`.
    fn collect<F>(&mut self, boxes: &[(i32, i32, i32)], confident: bool, keep: F) -> Vec<DVector<f64>>
    where
        F: Fn(f64) -> bool,
    {
        let mut examples = Vec::with_capacity(boxes.len());
        for &(x, y, size) in boxes {
            if size < 1 {
                continue;
            }
            let key = self.cache.lookup(self.extractor.as_mut(), x, y, size, size);
            if confident {
                match self.cache.classify(key, self.classifier.as_ref()) {
                    Some((_, probability)) if keep(probability) => {}
                    _ => continue,
                }
            }
            if let Some(patch) = self.cache.patch(key) {
                examples.push(patch.data.clone());
            }
        }
        examples
    }

    fn harvest_positives(&mut self, target: &Sample, confident: bool) -> Vec<DVector<f64>> {
        let (x, y, size) = (target.x, target.y, target.size);
        let mut boxes = vec![(x, y, size)];
        let offset = round_to_i32(self.parameters.positive_offset_factor * f64::from(size));
        if offset > 0 {
            boxes.extend([(x - offset, y, size), (x + offset, y, size), (x, y - offset, size), (x, y + offset, size)]);
        }
        let threshold = self.parameters.confidence_threshold;
        self.collect(&boxes, confident, |p| p < threshold)
    }

    fn harvest_negatives(
        &mut self,
        samples: &[Sample],
        target: &Sample,
        confident: bool,
    ) -> Vec<DVector<f64>> {
        let (x, y, size) = (target.x, target.y, target.size);
        let factor = self.parameters.negative_offset_factor;
        let offset = round_to_i32(factor * f64::from(size));
        let density = self.parameters.sample_negative_density;

        let mut boxes = Vec::new();
        if density >= 1 && offset > 0 {
            boxes.extend([(x - offset, y, size), (x + offset, y, size), (x, y - offset, size), (x, y + offset, size)]);
        }
        if density >= 2 && offset > 0 {
            boxes.extend([
                (x - offset, y - offset, size),
                (x + offset, y - offset, size),
                (x - offset, y + offset, size),
                (x + offset, y + offset, size),
            ]);
        }
        if density >= 3 {
            let larger = round_to_i32(f64::from(size) * (1.0 + factor));
            let smaller = round_to_i32(f64::from(size) / (1.0 + factor));
            for scaled in [larger, smaller] {
                if scaled != size {
                    boxes.push((x, y, scaled));
                }
            }
        }

        let min_distance = factor * f64::from(size);
        let distant = samples.iter().filter(|s| {
            f64::from((s.x - x).abs()) >= min_distance || f64::from((s.y - y).abs()) >= min_distance
        });
        for sample in highest(distant, self.parameters.random_negatives, |s| s.weight) {
            boxes.push((sample.x, sample.y, sample.size));
        }

        let threshold = 1.0 - self.parameters.confidence_threshold;
        self.collect(&boxes, confident, |p| p > threshold)
    }
}

impl fmt::Debug for PositionDependentMeasurementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionDependentMeasurementModel")
            .field("parameters", &self.parameters)
            .field("state", &self.state)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl MeasurementModel for PositionDependentMeasurementModel {
    fn update(&mut self, image: &VersionedImage) {
        self.extractor.update(image);
        self.cache.sync(image.version());
    }

    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]) {
        self.update(image);
        if self.state != AdaptiveState::Usable {
            for sample in samples.iter_mut() {
                sample.weight = 0.0;
                sample.is_target = false;
            }
            return;
        }
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

impl AdaptiveMeasurementModel for PositionDependentMeasurementModel {
    fn is_usable(&self) -> bool {
        self.state == AdaptiveState::Usable
    }

    fn adapt(&mut self, image: &VersionedImage, samples: &[Sample], target: &Sample) -> Result<()> {
        self.update(image);
        let usable = self.is_usable();

        if usable {
            match self.probability(target.x, target.y, target.size) {
                Some(probability) if probability >= self.parameters.target_threshold => {}
                probability => {
                    tracing::debug!(?probability, "target not reliable, skipping adaptation");
                    return Ok(());
                }
            }
            self.frame_count = 0;
        } else {
            let key = self
                .cache
                .lookup(self.extractor.as_mut(), target.x, target.y, target.size, target.size);
            if self.cache.patch(key).is_none() {
                tracing::debug!("target outside the image, skipping adaptation");
                return Ok(());
            }
            self.frame_count += 1;
            if self.frame_count < self.parameters.start_frame_count {
                return Ok(());
            }
        }

        let positives = self.harvest_positives(target, usable);
        let negatives = self.harvest_negatives(samples, target, usable);
        tracing::debug!(
            positives = positives.len(),
            negatives = negatives.len(),
            "harvested training examples"
        );
        let trained = self.classifier.retrain(positives, negatives)?;
        self.cache.forget_classifications();

        if !usable && trained {
            self.state = AdaptiveState::Usable;
            self.frame_count = 0;
            tracing::info!("adaptive measurement model is usable");
        }
        Ok(())
    }

    fn adapt_no_target(&mut self, image: &VersionedImage, _samples: &[Sample]) -> Result<()> {
        self.update(image);
        match self.state {
            AdaptiveState::WarmingUp => self.frame_count = 0,
            AdaptiveState::Usable => {
                self.frame_count += 1;
                if self.frame_count >= self.parameters.stop_frame_count {
                    tracing::info!(
                        frames = self.frame_count,
                        "target lost, resetting adaptive measurement model"
                    );
                    self.reset();
                }
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.classifier.reset();
        self.state = AdaptiveState::WarmingUp;
        self.frame_count = 0;
        self.cache.forget_classifications();
    }
}
