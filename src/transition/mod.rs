//! Transition models that move particles between frames.
//!
//! - `SimpleTransitionModel` - constant velocity with Gaussian diffusion
//! - `OpticalFlowTransitionModel` - median flow of tracked grid points, with a fallback

mod traits;
mod simple;
mod optical_flow;
mod dispatch;

pub use traits::{OpticalFlow, TransitionModel};
pub use simple::SimpleTransitionModel;
pub use optical_flow::{MedianFlow, OpticalFlowTransitionModel};
pub use dispatch::TransitionModelEnum;
