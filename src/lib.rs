//! # condensation-rs - Online-adaptive particle filter tracking
//!
//! Single-object visual tracker built on the Condensation particle filter,
//! whose appearance model is an SVM classifier retrained frame by frame from
//! the tracker's own output.
//!
//! ## Features
//!
//! - Resampling samplers with constant-velocity or optical-flow transition models
//! - Sliding-window grid sampler for exhaustive search
//! - Static, filtering and adaptive classifier-based measurement models
//! - Bounded training sets (fixed-size or frame window) with probability calibration
//! - Seeded, reproducible random number generation
//!
//! ## Example
//!
//! ```rust,ignore
//! use condensation_rs::{PartiallyAdaptiveCondensationTracker, TrackerConfig};
//!
//! let config = TrackerConfig::new(20, 120);
//! let mut tracker =
//!     PartiallyAdaptiveCondensationTracker::new(&config, static_model, adaptive_model)?;
//! for frame in frames {
//!     if let Some(rect) = tracker.process(frame)? {
//!         println!("target at {:?}", rect);
//!     }
//! }
//! ```

// Public modules
pub mod sample;
pub mod image;
pub mod resampling;
pub mod transition;
pub mod sampler;
pub mod features;
pub mod svm;
pub mod classifier;
pub mod measurement;
pub mod position;
pub mod tracker;
pub mod utils;

// Re-exports for convenience
pub use sample::{Rect, Sample};
pub use image::{Image, VersionedImage};
pub use tracker::{
    AdaptiveCondensationTracker, CondensationTracker, PartiallyAdaptiveCondensationTracker,
    TrackerConfig,
};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the tracker
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid argument: {0}")]
        InvalidArgument(String),

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Training error: {0}")]
        TrainingError(String),

        #[error("Parse error: {0}")]
        ParseError(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for tracker operations
    pub type Result<T> = std::result::Result<T, Error>;
}
