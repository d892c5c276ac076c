//! Feature extraction.
//!
//! Real feature pipelines (HOG, LBP, Haar) live outside this crate behind the
//! `FeatureExtractor` trait; `DirectPixelExtractor` is a raw-pixel baseline.

mod traits;
mod pixel;

pub use traits::{FeatureExtractor, Patch};
pub use pixel::DirectPixelExtractor;
