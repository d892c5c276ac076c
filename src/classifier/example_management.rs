//! Bounded storage of training examples.

use nalgebra::DVector;

use crate::svm::{SvmModel, SvmProblem};
use crate::{Error, Result};

/// Decides which training examples are kept between retrainings.
pub trait ExampleManagement {
    /// Remove all examples.
    fn clear(&mut self);

    /// Store new examples, evicting old ones if necessary.
    ///
    /// # Arguments
    /// * `positives` - New positive examples
    /// * `negatives` - New negative examples
    /// * `model` - Current model, used to rank positives for eviction
    fn add(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
        model: Option<&SvmModel>,
    );

    fn positive_count(&self) -> usize;

    fn negative_count(&self) -> usize;

    /// Whether there are enough positive examples to train a model.
    fn is_retraining_reasonable(&self) -> bool;

    /// Append all stored examples to a training problem.
    fn fill_problem(&self, problem: &mut SvmProblem);
}

/// Fixed-capacity pools for positive and negative examples.
///
/// Empty slots are filled first. Once a pool is full, positives replace the
/// stored examples with the highest model output first (those carry the least
/// information), or in insertion order when there is no model. Negatives are
/// always replaced in insertion order.
#[derive(Debug, Clone)]
pub struct FixedSizeExampleManagement {
    positives: Vec<DVector<f64>>,
    negatives: Vec<DVector<f64>>,
    positive_capacity: usize,
    negative_capacity: usize,
    positive_insert: usize,
    negative_insert: usize,
    min_positive_examples: usize,
}

impl FixedSizeExampleManagement {
    /// Create a new fixed-size storage.
    ///
    /// # Arguments
    /// * `positive_capacity` - Maximum number of positive examples
    /// * `negative_capacity` - Maximum number of negative examples
    /// * `min_positive_examples` - Positives required before training
    pub fn new(
        positive_capacity: usize,
        negative_capacity: usize,
        min_positive_examples: usize,
    ) -> Result<Self> {
        if positive_capacity == 0 || negative_capacity == 0 {
            return Err(Error::InvalidArgument(format!(
                "capacities must be positive, got {} / {}",
                positive_capacity, negative_capacity
            )));
        }
        if min_positive_examples > positive_capacity {
            return Err(Error::InvalidArgument(format!(
                "min_positive_examples ({}) exceeds positive capacity ({})",
                min_positive_examples, positive_capacity
            )));
        }
        Ok(Self {
            positives: Vec::with_capacity(positive_capacity),
            negatives: Vec::with_capacity(negative_capacity),
            positive_capacity,
            negative_capacity,
            positive_insert: 0,
            negative_insert: 0,
            min_positive_examples,
        })
    }

    pub fn positives(&self) -> &[DVector<f64>] {
        &self.positives
    }

    pub fn negatives(&self) -> &[DVector<f64>] {
        &self.negatives
    }

    fn add_positives(&mut self, new_examples: Vec<DVector<f64>>, model: Option<&SvmModel>) {
        let mut new_examples = new_examples.into_iter();
        while self.positives.len() < self.positive_capacity {
            match new_examples.next() {
                Some(example) => self.positives.push(example),
                None => return,
            }
        }
        let remaining: Vec<DVector<f64>> = new_examples.collect();
        if remaining.is_empty() {
            return;
        }

        match model {
            Some(model) => {
                let mut ranking: Vec<(usize, f64)> = self
                    .positives
                    .iter()
                    .enumerate()
                    .map(|(i, example)| (i, model.hyperplane_distance(example)))
                    .collect();
                // stable, so ties keep the older slot first
                ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
                for (k, example) in remaining.into_iter().enumerate() {
                    let slot = ranking[k % ranking.len()].0;
                    self.positives[slot] = example;
                }
            }
            None => {
                for example in remaining {
                    self.positives[self.positive_insert] = example;
                    self.positive_insert = (self.positive_insert + 1) % self.positive_capacity;
                }
            }
        }
    }

    fn add_negatives(&mut self, new_examples: Vec<DVector<f64>>) {
        for example in new_examples {
            if self.negatives.len() < self.negative_capacity {
                self.negatives.push(example);
            } else {
                self.negatives[self.negative_insert] = example;
                self.negative_insert = (self.negative_insert + 1) % self.negative_capacity;
            }
        }
    }
}

impl ExampleManagement for FixedSizeExampleManagement {
    fn clear(&mut self) {
        self.positives.clear();
        self.negatives.clear();
        self.positive_insert = 0;
        self.negative_insert = 0;
    }

    fn add(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
        model: Option<&SvmModel>,
    ) {
        self.add_positives(positives, model);
        self.add_negatives(negatives);
    }

    fn positive_count(&self) -> usize {
        self.positives.len()
    }

    fn negative_count(&self) -> usize {
        self.negatives.len()
    }

    fn is_retraining_reasonable(&self) -> bool {
        self.positives.len() >= self.min_positive_examples.max(1)
    }

    fn fill_problem(&self, problem: &mut SvmProblem) {
        for example in &self.positives {
            problem.push_positive(example.clone());
        }
        for example in &self.negatives {
            problem.push_negative(example.clone());
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FrameExamples {
    positives: Vec<DVector<f64>>,
    negatives: Vec<DVector<f64>>,
}

/// Keeps the examples of the last `frame_length` calls to `add`.
///
/// Each call occupies one slot of a ring and replaces the oldest slot entirely,
/// for positives and negatives alike.
///
/// Training needs `ceil(min_avg_samples * frame_length)` positives in the
/// window, but never fewer than one, so `min_avg_samples = 0` still requires a
/// single positive.
#[derive(Debug, Clone)]
pub struct FrameBasedExampleManagement {
    frames: Vec<FrameExamples>,
    insert: usize,
    min_avg_samples: f64,
}

impl FrameBasedExampleManagement {
    /// Create a new frame window.
    ///
    /// # Arguments
    /// * `frame_length` - Number of frames kept
    /// * `min_avg_samples` - Average positives per frame required before training
    pub fn new(frame_length: usize, min_avg_samples: f64) -> Result<Self> {
        if frame_length == 0 {
            return Err(Error::InvalidArgument("frame_length must be positive".to_string()));
        }
        if !(min_avg_samples >= 0.0) || !min_avg_samples.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "min_avg_samples must be non-negative, got {}",
                min_avg_samples
            )));
        }
        Ok(Self {
            frames: vec![FrameExamples::default(); frame_length],
            insert: 0,
            min_avg_samples,
        })
    }

    pub fn frame_length(&self) -> usize {
        self.frames.len()
    }

    fn required_positives(&self) -> usize {
        ((self.min_avg_samples * self.frames.len() as f64).ceil() as usize).max(1)
    }
}

impl ExampleManagement for FrameBasedExampleManagement {
    fn clear(&mut self) {
        for frame in self.frames.iter_mut() {
            frame.positives.clear();
            frame.negatives.clear();
        }
        self.insert = 0;
    }

    fn add(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
        _model: Option<&SvmModel>,
    ) {
        self.frames[self.insert] = FrameExamples { positives, negatives };
        self.insert = (self.insert + 1) % self.frames.len();
    }

    fn positive_count(&self) -> usize {
        self.frames.iter().map(|f| f.positives.len()).sum()
    }

    fn negative_count(&self) -> usize {
        self.frames.iter().map(|f| f.negatives.len()).sum()
    }

    fn is_retraining_reasonable(&self) -> bool {
        self.positive_count() >= self.required_positives()
    }

    fn fill_problem(&self, problem: &mut SvmProblem) {
        for frame in &self.frames {
            for example in &frame.positives {
                problem.push_positive(example.clone());
            }
        }
        for frame in &self.frames {
            for example in &frame.negatives {
                problem.push_negative(example.clone());
            }
        }
    }
}

/// Enum wrapper for static dispatch over the storage policies.
#[derive(Debug, Clone)]
pub enum ExampleManagementEnum {
    FixedSize(FixedSizeExampleManagement),
    FrameBased(FrameBasedExampleManagement),
}

impl From<FixedSizeExampleManagement> for ExampleManagementEnum {
    fn from(management: FixedSizeExampleManagement) -> Self {
        ExampleManagementEnum::FixedSize(management)
    }
}

impl From<FrameBasedExampleManagement> for ExampleManagementEnum {
    fn from(management: FrameBasedExampleManagement) -> Self {
        ExampleManagementEnum::FrameBased(management)
    }
}

impl ExampleManagement for ExampleManagementEnum {
    #[inline(always)]
    fn clear(&mut self) {
        match self {
            ExampleManagementEnum::FixedSize(m) => m.clear(),
            ExampleManagementEnum::FrameBased(m) => m.clear(),
        }
    }

    #[inline(always)]
    fn add(
        &mut self,
        positives: Vec<DVector<f64>>,
        negatives: Vec<DVector<f64>>,
        model: Option<&SvmModel>,
    ) {
        match self {
            ExampleManagementEnum::FixedSize(m) => m.add(positives, negatives, model),
            ExampleManagementEnum::FrameBased(m) => m.add(positives, negatives, model),
        }
    }

    #[inline(always)]
    fn positive_count(&self) -> usize {
        match self {
            ExampleManagementEnum::FixedSize(m) => m.positive_count(),
            ExampleManagementEnum::FrameBased(m) => m.positive_count(),
        }
    }

    #[inline(always)]
    fn negative_count(&self) -> usize {
        match self {
            ExampleManagementEnum::FixedSize(m) => m.negative_count(),
            ExampleManagementEnum::FrameBased(m) => m.negative_count(),
        }
    }

    #[inline(always)]
    fn is_retraining_reasonable(&self) -> bool {
        match self {
            ExampleManagementEnum::FixedSize(m) => m.is_retraining_reasonable(),
            ExampleManagementEnum::FrameBased(m) => m.is_retraining_reasonable(),
        }
    }

    #[inline(always)]
    fn fill_problem(&self, problem: &mut SvmProblem) {
        match self {
            ExampleManagementEnum::FixedSize(m) => m.fill_problem(problem),
            ExampleManagementEnum::FrameBased(m) => m.fill_problem(problem),
        }
    }
}
