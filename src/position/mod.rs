//! Position extraction from weighted samples.

mod traits;
mod extractors;
mod dispatch;

pub use traits::PositionExtractor;
pub use extractors::{MaxWeightPositionExtractor, WeightedMeanPositionExtractor};
pub use dispatch::PositionExtractorEnum;
