//! Kernel functions.

use nalgebra::DVector;
use serde::Deserialize;

use crate::{Error, Result};

/// Kernel of a support vector machine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    /// `a . b`
    Linear,
    /// `(gamma * a . b + constant)^degree`
    Polynomial { gamma: f64, constant: f64, degree: i32 },
    /// `exp(-gamma * |a - b|^2)`
    Rbf { gamma: f64 },
    /// `sum(min(a_i, b_i))`, for histogram features
    HistogramIntersection,
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::Rbf { gamma: 0.05 }
    }
}

impl Kernel {
    /// Evaluate the kernel on two vectors of equal length.
    #[inline]
    pub fn compute(&self, a: &DVector<f64>, b: &DVector<f64>) -> f64 {
        match *self {
            Kernel::Linear => a.dot(b),
            Kernel::Polynomial { gamma, constant, degree } => {
                (gamma * a.dot(b) + constant).powi(degree)
            }
            Kernel::Rbf { gamma } => (-gamma * (a - b).norm_squared()).exp(),
            Kernel::HistogramIntersection => a.iter().zip(b.iter()).map(|(x, y)| x.min(*y)).sum(),
        }
    }

    /// Reject parameter values the optimiser cannot work with.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Kernel::Linear | Kernel::HistogramIntersection => Ok(()),
            Kernel::Polynomial { gamma, constant, degree } => {
                if !(gamma > 0.0) || !gamma.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "polynomial kernel gamma must be positive, got {}",
                        gamma
                    )));
                }
                if !constant.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "polynomial kernel constant must be finite, got {}",
                        constant
                    )));
                }
                if degree < 1 {
                    return Err(Error::InvalidConfig(format!(
                        "polynomial kernel degree must be at least 1, got {}",
                        degree
                    )));
                }
                Ok(())
            }
            Kernel::Rbf { gamma } => {
                if !(gamma > 0.0) || !gamma.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "rbf kernel gamma must be positive, got {}",
                        gamma
                    )));
                }
                Ok(())
            }
        }
    }
}
