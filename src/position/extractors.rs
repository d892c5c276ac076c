//! Weighted-mean and maximum-weight position extractors.

use super::traits::PositionExtractor;
use crate::utils::round_to_i32;
use crate::Sample;

/// Weighted mean of all target samples, velocities included.
///
/// The estimate carries the mean weight of the contributing samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedMeanPositionExtractor;

impl PositionExtractor for WeightedMeanPositionExtractor {
    fn extract(&self, samples: &[Sample]) -> Option<Sample> {
        let (mut x, mut y, mut size) = (0.0, 0.0, 0.0);
        let (mut vx, mut vy, mut v_size) = (0.0, 0.0, 0.0);
        let mut total = 0.0;
        let mut count = 0usize;

        for sample in samples.iter().filter(|s| s.is_target && s.weight > 0.0) {
            let w = sample.weight;
            x += w * f64::from(sample.x);
            y += w * f64::from(sample.y);
            size += w * f64::from(sample.size);
            vx += w * f64::from(sample.vx);
            vy += w * f64::from(sample.vy);
            v_size += w * sample.v_size;
            total += w;
            count += 1;
        }
        if count == 0 || !(total > 0.0) || !total.is_finite() {
            return None;
        }

        let mut estimate = Sample::new(
            round_to_i32(x / total),
            round_to_i32(y / total),
            round_to_i32(size / total).max(1),
        );
        estimate.vx = round_to_i32(vx / total);
        estimate.vy = round_to_i32(vy / total);
        estimate.v_size = v_size / total;
        estimate.weight = total / count as f64;
        estimate.is_target = true;
        Some(estimate)
    }
}

/// The heaviest target sample (the first one on ties).
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxWeightPositionExtractor;

impl PositionExtractor for MaxWeightPositionExtractor {
    fn extract(&self, samples: &[Sample]) -> Option<Sample> {
        let mut best: Option<&Sample> = None;
        for sample in samples.iter().filter(|s| s.is_target && s.weight > 0.0) {
            if best.map_or(true, |b| sample.weight > b.weight) {
                best = Some(sample);
            }
        }
        best.cloned()
    }
}
