//! Enum wrappers for static dispatch over the measurement models.

use super::filtering::FilteringClassifierModel;
use super::position_dependent::PositionDependentMeasurementModel;
use super::self_learning::SelfLearningMeasurementModel;
use super::single::SingleClassifierModel;
use super::traits::{AdaptiveMeasurementModel, MeasurementModel};
use crate::{Result, Sample, VersionedImage};

/// Measurement models with a fixed appearance model.
#[derive(Debug)]
pub enum MeasurementModelEnum {
    Single(SingleClassifierModel),
    Filtering(FilteringClassifierModel),
}

impl From<SingleClassifierModel> for MeasurementModelEnum {
    fn from(model: SingleClassifierModel) -> Self {
        MeasurementModelEnum::Single(model)
    }
}

impl From<FilteringClassifierModel> for MeasurementModelEnum {
    fn from(model: FilteringClassifierModel) -> Self {
        MeasurementModelEnum::Filtering(model)
    }
}

impl MeasurementModel for MeasurementModelEnum {
    #[inline(always)]
    fn update(&mut self, image: &VersionedImage) {
        match self {
            MeasurementModelEnum::Single(m) => m.update(image),
            MeasurementModelEnum::Filtering(m) => m.update(image),
        }
    }

    #[inline(always)]
    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]) {
        match self {
            MeasurementModelEnum::Single(m) => m.evaluate(image, samples),
            MeasurementModelEnum::Filtering(m) => m.evaluate(image, samples),
        }
    }
}

/// Measurement models that learn while tracking.
#[derive(Debug)]
pub enum AdaptiveMeasurementModelEnum {
    PositionDependent(PositionDependentMeasurementModel),
    SelfLearning(SelfLearningMeasurementModel),
}

impl From<PositionDependentMeasurementModel> for AdaptiveMeasurementModelEnum {
    fn from(model: PositionDependentMeasurementModel) -> Self {
        AdaptiveMeasurementModelEnum::PositionDependent(model)
    }
}

impl From<SelfLearningMeasurementModel> for AdaptiveMeasurementModelEnum {
    fn from(model: SelfLearningMeasurementModel) -> Self {
        AdaptiveMeasurementModelEnum::SelfLearning(model)
    }
}

impl MeasurementModel for AdaptiveMeasurementModelEnum {
    #[inline(always)]
    fn update(&mut self, image: &VersionedImage) {
        match self {
            AdaptiveMeasurementModelEnum::PositionDependent(m) => m.update(image),
            AdaptiveMeasurementModelEnum::SelfLearning(m) => m.update(image),
        }
    }

    #[inline(always)]
    fn evaluate(&mut self, image: &VersionedImage, samples: &mut [Sample]) {
        match self {
            AdaptiveMeasurementModelEnum::PositionDependent(m) => m.evaluate(image, samples),
            AdaptiveMeasurementModelEnum::SelfLearning(m) => m.evaluate(image, samples),
        }
    }
}

impl AdaptiveMeasurementModel for AdaptiveMeasurementModelEnum {
    #[inline(always)]
    fn is_usable(&self) -> bool {
        match self {
            AdaptiveMeasurementModelEnum::PositionDependent(m) => m.is_usable(),
            AdaptiveMeasurementModelEnum::SelfLearning(m) => m.is_usable(),
        }
    }

    #[inline(always)]
    fn adapt(&mut self, image: &VersionedImage, samples: &[Sample], target: &Sample) -> Result<()> {
        match self {
            AdaptiveMeasurementModelEnum::PositionDependent(m) => m.adapt(image, samples, target),
            AdaptiveMeasurementModelEnum::SelfLearning(m) => m.adapt(image, samples, target),
        }
    }

    #[inline(always)]
    fn adapt_no_target(&mut self, image: &VersionedImage, samples: &[Sample]) -> Result<()> {
        match self {
            AdaptiveMeasurementModelEnum::PositionDependent(m) => m.adapt_no_target(image, samples),
            AdaptiveMeasurementModelEnum::SelfLearning(m) => m.adapt_no_target(image, samples),
        }
    }

    #[inline(always)]
    fn reset(&mut self) {
        match self {
            AdaptiveMeasurementModelEnum::PositionDependent(m) => m.reset(),
            AdaptiveMeasurementModelEnum::SelfLearning(m) => m.reset(),
        }
    }
}
