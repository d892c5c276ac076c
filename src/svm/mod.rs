//! Support vector machine contract.
//!
//! The crate does not ship a quadratic-program optimiser. Models are produced by
//! an `SvmSolver`; `MeanDifferenceSolver` is a closed-form baseline.

mod kernel;
mod model;
mod solver;
mod static_negatives;

pub use kernel::Kernel;
pub use model::{SvmModel, SvmParameters, SvmProblem};
pub use solver::{MeanDifferenceSolver, SvmSolver};
pub use static_negatives::load_static_negatives;
