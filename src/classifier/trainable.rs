//! Incrementally retrained SVM classifiers.

use nalgebra::DVector;
use std::fmt;
use std::path::Path;

use super::example_management::{ExampleManagement, ExampleManagementEnum};
use super::svm::{LogisticParameters, SvmClassifier};
use super::traits::{Classifier, TrainableClassifier};
use crate::svm::{load_static_negatives, SvmParameters, SvmProblem, SvmSolver};
use crate::{Error, Result};

/// SVM that is retrained from a bounded, evolving set of examples.
pub struct TrainableSvmClassifier {
    parameters: SvmParameters,
    solver: Box<dyn SvmSolver>,
    examples: ExampleManagementEnum,
    static_negatives: Vec<DVector<f64>>,
    svm: SvmClassifier,
    usable: bool,
    /// Mean decision values of the positive and negative training examples.
    mean_outputs: Option<(f64, f64)>,
}

impl TrainableSvmClassifier {
    /// Create a new trainable classifier.
    ///
    /// # Arguments
    /// * `parameters` - Kernel and penalty; class weights are scaled by the opposite class count
    /// * `solver` - Training backend
    /// * `examples` - Example storage policy
    /// * `threshold` - Decision value above which a feature vector is positive
    pub fn new(
        parameters: SvmParameters,
        solver: Box<dyn SvmSolver>,
        examples: ExampleManagementEnum,
        threshold: f64,
    ) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            parameters,
            solver,
            examples,
            static_negatives: Vec::new(),
            svm: SvmClassifier::new(None, threshold),
            usable: false,
            mean_outputs: None,
        })
    }

    /// Negatives that are part of every training problem and never evicted.
    pub fn set_static_negatives(&mut self, negatives: Vec<DVector<f64>>) {
        self.static_negatives = negatives;
    }

    /// Load the static negatives from a text file.
    pub fn load_static_negatives<P: AsRef<Path>>(
        &mut self,
        file_path: P,
        max_count: Option<usize>,
        scale: f64,
    ) -> Result<()> {
        self.static_negatives = load_static_negatives(file_path, max_count, scale)?;
        Ok(())
    }

    pub fn static_negatives(&self) -> &[DVector<f64>] {
        &self.static_negatives
    }

    pub fn parameters(&self) -> &SvmParameters {
        &self.parameters
    }

    pub fn examples(&self) -> &ExampleManagementEnum {
        &self.examples
    }

    pub fn svm(&self) -> &SvmClassifier {
        &self.svm
    }

    /// Mean decision values `(positive, negative)` over the last training set.
    pub fn mean_outputs(&self) -> Option<(f64, f64)> {
        self.mean_outputs
    }

    pub fn hyperplane_distance(&self, features: &DVector<f64>) -> f64 {
        self.svm.hyperplane_distance(features)
    }

    fn train(&mut self) -> Result<()> {
        let mut problem = SvmProblem::new();
        self.examples.fill_problem(&mut problem);
        for negative in &self.static_negatives {
            problem.push_negative(negative.clone());
        }

        let positive_count = problem.positive_count();
        let negative_count = problem.negative_count();
        let mut parameters = self.parameters.clone();
        parameters.positive_weight = self.parameters.positive_weight * negative_count as f64;
        parameters.negative_weight = self.parameters.negative_weight * positive_count as f64;
        parameters.validate()?;

        let model = self.solver.solve(&problem, &parameters)?;

        let (mut positive_sum, mut negative_sum) = (0.0, 0.0);
        for (features, positive) in problem.iter() {
            let output = model.hyperplane_distance(features);
            if positive {
                positive_sum += output;
            } else {
                negative_sum += output;
            }
        }
        self.mean_outputs = Some((
            positive_sum / positive_count as f64,
            negative_sum / negative_count as f64,
        ));

        tracing::info!(
            positives = positive_count,
            negatives = negative_count,
            support_vectors = model.support_vectors().len(),
            "retrained classifier"
        );
        self.svm.set_model(Some(model));
        self.usable = true;
        Ok(())
    }
}

impl fmt::Debug for TrainableSvmClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainableSvmClassifier")
            .field("parameters", &self.parameters)
            .field("examples", &self.examples)
            .field("static_negatives", &self.static_negatives.len())
            .field("usable", &self.usable)
            .finish()
    }
}

impl Classifier for TrainableSvmClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        self.svm.classify(features)
    }
}

impl TrainableClassifier for TrainableSvmClassifier {
    fn retrain(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
    ) -> Result<bool> {
        if positives.is_empty() && negatives.is_empty() {
            return Ok(self.usable);
        }
        self.examples.add(positives, negatives, self.svm.model());

        let has_negatives = self.examples.negative_count() + self.static_negatives.len() > 0;
        if self.examples.is_retraining_reasonable() && has_negatives {
            self.train()?;
        } else {
            tracing::debug!(
                positives = self.examples.positive_count(),
                negatives = self.examples.negative_count(),
                "not enough examples to retrain"
            );
        }
        Ok(self.usable)
    }

    fn is_usable(&self) -> bool {
        self.usable
    }

    fn reset(&mut self) {
        self.examples.clear();
        self.svm.set_model(None);
        self.usable = false;
        self.mean_outputs = None;
    }

    fn positive_count(&self) -> usize {
        self.examples.positive_count()
    }

    fn negative_count(&self) -> usize {
        self.examples.negative_count()
    }
}

/// Trainable SVM whose output is recalibrated to a probability after each training.
///
/// The logistic mapping is fitted so that the mean decision value of the
/// positive training examples maps to `high_probability` and that of the
/// negatives to `low_probability`.
#[derive(Debug)]
pub struct TrainableProbabilisticSvmClassifier {
    trainable: TrainableSvmClassifier,
    logistic: LogisticParameters,
    high_probability: f64,
    low_probability: f64,
}

impl TrainableProbabilisticSvmClassifier {
    /// Wrap a trainable SVM, calibrating to 0.99 / 0.01.
    pub fn new(trainable: TrainableSvmClassifier) -> Self {
        Self {
            trainable,
            logistic: LogisticParameters::default(),
            high_probability: 0.99,
            low_probability: 0.01,
        }
    }

    /// Change the calibration targets. Requires `0 < low < high < 1`.
    pub fn with_probabilities(mut self, high_probability: f64, low_probability: f64) -> Result<Self> {
        if !(0.0 < low_probability && low_probability < high_probability && high_probability < 1.0) {
            return Err(Error::InvalidArgument(format!(
                "calibration probabilities must satisfy 0 < low < high < 1, got {} / {}",
                low_probability, high_probability
            )));
        }
        self.high_probability = high_probability;
        self.low_probability = low_probability;
        Ok(self)
    }

    pub fn trainable(&self) -> &TrainableSvmClassifier {
        &self.trainable
    }

    pub fn trainable_mut(&mut self) -> &mut TrainableSvmClassifier {
        &mut self.trainable
    }

    pub fn logistic(&self) -> LogisticParameters {
        self.logistic
    }
}

impl Classifier for TrainableProbabilisticSvmClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        let distance = self.trainable.hyperplane_distance(features);
        (
            distance > self.trainable.svm().threshold(),
            self.logistic.probability(distance),
        )
    }
}

impl TrainableClassifier for TrainableProbabilisticSvmClassifier {
    fn retrain(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
    ) -> Result<bool> {
        let usable = self.trainable.retrain(positives, negatives)?;
        if let Some((positive_mean, negative_mean)) = self.trainable.mean_outputs() {
            match LogisticParameters::fit(
                positive_mean,
                negative_mean,
                self.high_probability,
                self.low_probability,
            ) {
                Some(logistic) => self.logistic = logistic,
                None => tracing::debug!("class means coincide, keeping logistic parameters"),
            }
        }
        Ok(usable)
    }

    fn is_usable(&self) -> bool {
        self.trainable.is_usable()
    }

    fn reset(&mut self) {
        self.trainable.reset();
        self.logistic = LogisticParameters::default();
    }

    fn positive_count(&self) -> usize {
        self.trainable.positive_count()
    }

    fn negative_count(&self) -> usize {
        self.trainable.negative_count()
    }
}
