//! Static dispatch over position extractors.

use super::extractors::{MaxWeightPositionExtractor, WeightedMeanPositionExtractor};
use super::traits::PositionExtractor;
use crate::Sample;

/// Enum wrapper for static dispatch over the position extractors.
#[derive(Debug, Clone, Copy)]
pub enum PositionExtractorEnum {
    WeightedMean(WeightedMeanPositionExtractor),
    MaxWeight(MaxWeightPositionExtractor),
}

impl Default for PositionExtractorEnum {
    fn default() -> Self {
        PositionExtractorEnum::WeightedMean(WeightedMeanPositionExtractor)
    }
}

impl PositionExtractor for PositionExtractorEnum {
    #[inline(always)]
    fn extract(&self, samples: &[Sample]) -> Option<Sample> {
        match self {
            PositionExtractorEnum::WeightedMean(e) => e.extract(samples),
            PositionExtractorEnum::MaxWeight(e) => e.extract(samples),
        }
    }
}
