//! Classifier contracts.

use nalgebra::DVector;

/// Binary classifier with a confidence score.
pub trait Classifier: Send {
    /// Classify a feature vector.
    ///
    /// # Returns
    /// `(is_positive, confidence)`. Probabilistic classifiers return the
    /// probability of the positive class, others the raw decision value.
    fn classify(&self, features: &DVector<f64>) -> (bool, f64);
}

/// Classifier that learns from examples handed to it over time.
pub trait TrainableClassifier: Classifier {
    /// Add new examples and retrain if there is enough data.
    ///
    /// # Returns
    /// Whether the classifier is usable afterwards. Errors indicate a broken
    /// configuration, never a lack of data.
    fn retrain(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
    ) -> crate::Result<bool>;

    /// Whether a trained model exists.
    fn is_usable(&self) -> bool;

    /// Forget all examples and the model.
    fn reset(&mut self);

    /// Number of stored positive examples.
    fn positive_count(&self) -> usize;

    /// Number of stored negative examples (without static negatives).
    fn negative_count(&self) -> usize;
}
