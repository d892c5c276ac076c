//! Classifiers and their online training.
//!
//! - `SvmClassifier` / `ProbabilisticSvmClassifier` - fixed models
//! - `TrainableSvmClassifier` - retrained from managed examples
//! - `TrainableProbabilisticSvmClassifier` - same, with calibrated probabilities

mod traits;
mod svm;
mod example_management;
mod trainable;

pub use traits::{Classifier, TrainableClassifier};
pub use svm::{LogisticParameters, ProbabilisticSvmClassifier, SvmClassifier};
pub use example_management::{
    ExampleManagement, ExampleManagementEnum, FixedSizeExampleManagement,
    FrameBasedExampleManagement,
};
pub use trainable::{TrainableProbabilisticSvmClassifier, TrainableSvmClassifier};
