//! Trackers orchestrating sampling, evaluation, position extraction and adaptation.
//!
//! - `CondensationTracker` - static measurement model
//! - `AdaptiveCondensationTracker` - adaptive measurement model seeded with a box
//! - `PartiallyAdaptiveCondensationTracker` - static model until the adaptive one is usable

mod config;
mod core;
mod condensation;
mod adaptive;
mod partially_adaptive;

pub use config::{PositionExtractorKind, ResamplingKind, TrackerConfig};
pub use condensation::CondensationTracker;
pub use adaptive::AdaptiveCondensationTracker;
pub use partially_adaptive::PartiallyAdaptiveCondensationTracker;
