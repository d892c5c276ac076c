//! Position extraction contract.

use crate::Sample;

/// Reduces a weighted sample set to a single state estimate.
pub trait PositionExtractor {
    /// Estimate the target state from samples flagged as target.
    ///
    /// # Returns
    /// `None` when no sample is a target or their total weight is zero.
    fn extract(&self, samples: &[Sample]) -> Option<Sample>;
}
