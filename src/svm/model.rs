//! Trained SVM models, training problems and optimiser parameters.

use nalgebra::DVector;
use serde::Deserialize;

use super::kernel::Kernel;
use crate::{Error, Result};

/// Parameters handed to the optimiser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvmParameters {
    /// Kernel function.
    pub kernel: Kernel,
    /// Misclassification penalty.
    pub c: f64,
    /// Penalty multiplier of the positive class.
    pub positive_weight: f64,
    /// Penalty multiplier of the negative class.
    pub negative_weight: f64,
    /// Optimiser stopping tolerance.
    pub tolerance: f64,
}

impl Default for SvmParameters {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            c: 1.0,
            positive_weight: 1.0,
            negative_weight: 1.0,
            tolerance: 1e-3,
        }
    }
}

impl SvmParameters {
    pub fn new(kernel: Kernel, c: f64) -> Self {
        Self {
            kernel,
            c,
            ..Self::default()
        }
    }

    /// Check that the parameter set is usable by an optimiser.
    pub fn validate(&self) -> Result<()> {
        self.kernel.validate()?;
        if !(self.c > 0.0) || !self.c.is_finite() {
            return Err(Error::InvalidConfig(format!("C must be positive, got {}", self.c)));
        }
        if !(self.positive_weight > 0.0) || !(self.negative_weight > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "class weights must be positive, got {} / {}",
                self.positive_weight, self.negative_weight
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Labelled training set (`+1` positive, `-1` negative).
#[derive(Debug, Clone, Default)]
pub struct SvmProblem {
    examples: Vec<DVector<f64>>,
    labels: Vec<f64>,
}

impl SvmProblem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_positive(&mut self, features: DVector<f64>) {
        self.examples.push(features);
        self.labels.push(1.0);
    }

    pub fn push_negative(&mut self, features: DVector<f64>) {
        self.examples.push(features);
        self.labels.push(-1.0);
    }

    pub fn examples(&self) -> &[DVector<f64>] {
        &self.examples
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l > 0.0).count()
    }

    pub fn negative_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l < 0.0).count()
    }

    /// Iterate over `(features, is_positive)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&DVector<f64>, bool)> {
        self.examples.iter().zip(self.labels.iter()).map(|(e, &l)| (e, l > 0.0))
    }

    /// Check that the problem has both classes and a consistent dimensionality.
    pub fn validate(&self) -> Result<()> {
        if self.positive_count() == 0 || self.negative_count() == 0 {
            return Err(Error::TrainingError(format!(
                "problem needs both classes, got {} positive and {} negative examples",
                self.positive_count(),
                self.negative_count()
            )));
        }
        let dims = self.examples[0].len();
        if let Some(bad) = self.examples.iter().find(|e| e.len() != dims) {
            return Err(Error::InvalidConfig(format!(
                "inconsistent feature dimensions: {} vs {}",
                dims,
                bad.len()
            )));
        }
        Ok(())
    }
}

/// Decision function `f(x) = sum_i coef_i * K(sv_i, x) + bias`.
#[derive(Debug, Clone, PartialEq)]
pub struct SvmModel {
    kernel: Kernel,
    support_vectors: Vec<DVector<f64>>,
    coefficients: Vec<f64>,
    bias: f64,
    /// Collapsed weight vector for the linear kernel.
    linear_weights: Option<DVector<f64>>,
}

impl SvmModel {
    /// Create a model from support vectors and their (label-signed) coefficients.
    pub fn new(
        kernel: Kernel,
        support_vectors: Vec<DVector<f64>>,
        coefficients: Vec<f64>,
        bias: f64,
    ) -> Result<Self> {
        if support_vectors.len() != coefficients.len() {
            return Err(Error::InvalidArgument(format!(
                "{} support vectors but {} coefficients",
                support_vectors.len(),
                coefficients.len()
            )));
        }
        let linear_weights = match (kernel, support_vectors.first()) {
            (Kernel::Linear, Some(first)) => {
                let mut w = DVector::zeros(first.len());
                for (sv, coef) in support_vectors.iter().zip(coefficients.iter()) {
                    w.axpy(*coef, sv, 1.0);
                }
                Some(w)
            }
            _ => None,
        };
        Ok(Self {
            kernel,
            support_vectors,
            coefficients,
            bias,
            linear_weights,
        })
    }

    /// Signed distance to the decision boundary (before probability calibration).
    pub fn hyperplane_distance(&self, features: &DVector<f64>) -> f64 {
        if let Some(w) = &self.linear_weights {
            if w.len() == features.len() {
                return w.dot(features) + self.bias;
            }
        }
        self.support_vectors
            .iter()
            .zip(self.coefficients.iter())
            .map(|(sv, coef)| coef * self.kernel.compute(sv, features))
            .sum::<f64>()
            + self.bias
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn support_vectors(&self) -> &[DVector<f64>] {
        &self.support_vectors
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub(crate) fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }
}
