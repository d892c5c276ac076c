//! Classifiers backed by a fixed SVM model.

use nalgebra::DVector;

use super::traits::Classifier;
use crate::svm::SvmModel;

/// Logistic mapping `p = 1 / (1 + exp(a + b * d))` from decision value to probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParameters {
    pub a: f64,
    pub b: f64,
}

impl Default for LogisticParameters {
    /// The plain sigmoid of the decision value.
    fn default() -> Self {
        Self { a: 0.0, b: -1.0 }
    }
}

impl LogisticParameters {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Fit the parameters so that `high_output` maps to `high_probability` and
    /// `low_output` to `low_probability`.
    ///
    /// # Returns
    /// `None` when the outputs coincide or the fit is not finite.
    pub fn fit(
        high_output: f64,
        low_output: f64,
        high_probability: f64,
        low_probability: f64,
    ) -> Option<Self> {
        let high_logit = ((1.0 - high_probability) / high_probability).ln();
        let low_logit = ((1.0 - low_probability) / low_probability).ln();
        let spread = high_output - low_output;
        if spread.abs() < f64::EPSILON {
            return None;
        }
        let b = (high_logit - low_logit) / spread;
        let a = high_logit - b * high_output;
        if a.is_finite() && b.is_finite() {
            Some(Self { a, b })
        } else {
            None
        }
    }

    #[inline]
    pub fn probability(&self, decision_value: f64) -> f64 {
        1.0 / (1.0 + (self.a + self.b * decision_value).exp())
    }
}

/// Classifies by the sign of the SVM decision value relative to a threshold.
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    model: Option<SvmModel>,
    threshold: f64,
}

impl SvmClassifier {
    pub fn new(model: Option<SvmModel>, threshold: f64) -> Self {
        Self { model, threshold }
    }

    pub fn model(&self) -> Option<&SvmModel> {
        self.model.as_ref()
    }

    pub fn set_model(&mut self, model: Option<SvmModel>) {
        self.model = model;
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decision value, `-inf` without a model.
    pub fn hyperplane_distance(&self, features: &DVector<f64>) -> f64 {
        self.model
            .as_ref()
            .map_or(f64::NEG_INFINITY, |m| m.hyperplane_distance(features))
    }
}

impl Classifier for SvmClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        let distance = self.hyperplane_distance(features);
        (distance > self.threshold, distance)
    }
}

/// SVM classifier whose confidence is a calibrated probability.
#[derive(Debug, Clone)]
pub struct ProbabilisticSvmClassifier {
    svm: SvmClassifier,
    logistic: LogisticParameters,
}

impl ProbabilisticSvmClassifier {
    pub fn new(model: SvmModel, threshold: f64, logistic: LogisticParameters) -> Self {
        Self {
            svm: SvmClassifier::new(Some(model), threshold),
            logistic,
        }
    }

    pub fn logistic(&self) -> LogisticParameters {
        self.logistic
    }
}

impl Classifier for ProbabilisticSvmClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        let distance = self.svm.hyperplane_distance(features);
        (distance > self.svm.threshold(), self.logistic.probability(distance))
    }
}
