//! Measurement models scoring samples against the current frame.
//!
//! - `SingleClassifierModel` - one fixed classifier
//! - `FilteringClassifierModel` - wrapped model behind a binary filter
//! - `PositionDependentMeasurementModel` - adaptive, learns around the target
//! - `SelfLearningMeasurementModel` - adaptive, learns from its own output

mod traits;
mod cache;
mod ranking;
mod single;
mod filtering;
mod position_dependent;
mod self_learning;
mod dispatch;

pub use traits::{AdaptiveMeasurementModel, MeasurementModel};
pub use single::SingleClassifierModel;
pub use filtering::{FilterMode, FilteringClassifierModel};
pub use position_dependent::{AdaptiveState, PositionDependentMeasurementModel, PositionDependentParameters};
pub use self_learning::{SelfLearningMeasurementModel, SelfLearningParameters};
pub use dispatch::{AdaptiveMeasurementModelEnum, MeasurementModelEnum};
