//! Integration tests for condensation-rs.
//!
//! These tests run complete tracking workflows on synthetic frames.

use nalgebra::{DVector, Point2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tempfile::NamedTempFile;

use condensation_rs::classifier::{
    Classifier, FixedSizeExampleManagement, FrameBasedExampleManagement, TrainableClassifier,
    TrainableProbabilisticSvmClassifier, TrainableSvmClassifier,
};
use condensation_rs::features::DirectPixelExtractor;
use condensation_rs::measurement::{
    AdaptiveMeasurementModelEnum, MeasurementModelEnum, PositionDependentMeasurementModel,
    PositionDependentParameters, SelfLearningMeasurementModel, SelfLearningParameters,
    SingleClassifierModel,
};
use condensation_rs::position::{PositionExtractorEnum, WeightedMeanPositionExtractor};
use condensation_rs::resampling::ResamplingAlgorithm;
use condensation_rs::sampler::{GridSampler, ResamplingSampler, Sampler, SamplerEnum};
use condensation_rs::svm::{Kernel, MeanDifferenceSolver, SvmParameters};
use condensation_rs::transition::{
    OpticalFlow, OpticalFlowTransitionModel, SimpleTransitionModel, TransitionModelEnum,
};
use condensation_rs::{
    AdaptiveCondensationTracker, CondensationTracker, Image, PartiallyAdaptiveCondensationTracker,
    Rect, TrackerConfig,
};

const WIDTH: usize = 160;
const HEIGHT: usize = 120;
const SQUARE: i32 = 20;

// =============================================================================
// Helpers
// =============================================================================

fn frame_with_square(x: i32, y: i32) -> Image {
    let mut image = Image::filled(WIDTH, HEIGHT, 20);
    image.fill_rect(x, y, SQUARE, SQUARE, 230);
    image
}

/// Top-left corner of the moving square in frame `i`.
fn square_position(i: i32) -> (i32, i32) {
    (20 + 3 * i, 40 + i)
}

struct BrightnessClassifier;

impl Classifier for BrightnessClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        let mean = features.mean();
        (mean > 0.5, mean)
    }
}

fn extractor() -> Box<DirectPixelExtractor> {
    Box::new(DirectPixelExtractor::new(5, 5).unwrap())
}

fn probabilistic_svm(min_positives: usize) -> Box<TrainableProbabilisticSvmClassifier> {
    let svm = TrainableSvmClassifier::new(
        SvmParameters::new(Kernel::Rbf { gamma: 0.1 }, 1.0),
        Box::new(MeanDifferenceSolver),
        FixedSizeExampleManagement::new(60, 200, min_positives).unwrap().into(),
        0.0,
    )
    .unwrap();
    Box::new(TrainableProbabilisticSvmClassifier::new(svm))
}

fn static_model() -> MeasurementModelEnum {
    SingleClassifierModel::new(extractor(), Box::new(BrightnessClassifier)).into()
}

fn position_dependent(start_frame_count: u32) -> AdaptiveMeasurementModelEnum {
    let parameters = PositionDependentParameters {
        start_frame_count,
        stop_frame_count: 5,
        ..PositionDependentParameters::default()
    };
    PositionDependentMeasurementModel::new(extractor(), probabilistic_svm(1), parameters)
        .unwrap()
        .into()
}

fn config(seed: u64) -> TrackerConfig {
    let mut config = TrackerConfig::new(16, 26);
    config.sample_count = 600;
    config.position_deviation = 2.0;
    config.seed = seed;
    config
}

/// Moves the points by the displacement of the bright square's centroid.
struct CentroidFlow;

fn centroid(image: &Image) -> Option<(f64, f64)> {
    let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
    for y in 0..image.height() {
        for x in 0..image.width() {
            if image.get(x, y) > 128 {
                sx += x as f64;
                sy += y as f64;
                n += 1.0;
            }
        }
    }
    (n > 0.0).then(|| (sx / n, sy / n))
}

impl OpticalFlow for CentroidFlow {
    fn track(&mut self, from: &Image, to: &Image, points: &[Point2<f64>]) -> Vec<Option<Point2<f64>>> {
        match (centroid(from), centroid(to)) {
            (Some(a), Some(b)) => points
                .iter()
                .map(|p| Some(Point2::new(p.x + b.0 - a.0, p.y + b.1 - a.1)))
                .collect(),
            _ => vec![None; points.len()],
        }
    }
}

// =============================================================================
// Test 1: Static tracker follows a moving square
// =============================================================================

#[test]
fn test_integration_static_tracker_follows_square() {
    let mut tracker = CondensationTracker::new(&config(1), static_model()).unwrap();

    let mut hits = 0;
    for i in 0..30 {
        let (x, y) = square_position(i);
        let found = tracker.process(frame_with_square(x, y));
        assert_eq!(tracker.samples().len(), 600, "frame {}", i);
        if i >= 10 {
            if let Some(rect) = found {
                if rect.intersects(&Rect::new(x, y, SQUARE, SQUARE)) {
                    hits += 1;
                }
            }
        }
    }
    assert!(hits >= 16, "only {} of 20 frames tracked", hits);
}

// =============================================================================
// Test 2: Partially adaptive tracker hands over to the learned model
// =============================================================================

#[test]
fn test_integration_partially_adaptive_tracking() {
    let mut tracker =
        PartiallyAdaptiveCondensationTracker::new(&config(2), static_model(), position_dependent(3))
            .unwrap();

    let mut adaptive_hits = 0;
    let mut adaptive_frames = 0;
    for i in 0..30 {
        let (x, y) = square_position(i);
        let found = tracker.process(frame_with_square(x, y)).unwrap();
        assert_eq!(tracker.samples().len(), 600);
        if tracker.used_adaptive_model() {
            adaptive_frames += 1;
            if found.map_or(false, |r| r.intersects(&Rect::new(x, y, SQUARE, SQUARE))) {
                adaptive_hits += 1;
            }
        }
    }
    assert!(adaptive_frames >= 15, "adaptive model used in {} frames", adaptive_frames);
    assert!(adaptive_hits * 10 >= adaptive_frames * 8);

    tracker.stop();
    tracker.process(frame_with_square(20, 40)).unwrap();
    assert!(!tracker.used_adaptive_model());
}

// =============================================================================
// Test 3: Adaptive tracker seeded over several frames
// =============================================================================

#[test]
fn test_integration_adaptive_initialization_and_loss() {
    let mut tracker = AdaptiveCondensationTracker::new(&config(3), position_dependent(3)).unwrap();

    let (x, y) = square_position(0);
    let rect = Rect::new(x, y, SQUARE, SQUARE);
    let usable: Vec<bool> = (0..3)
        .map(|_| tracker.initialize(frame_with_square(x, y), &rect).unwrap())
        .collect();
    assert_eq!(usable, vec![false, false, true]);

    for i in 1..10 {
        let (x, y) = square_position(i);
        let found = tracker.process(frame_with_square(x, y)).unwrap();
        assert!(found.is_some(), "frame {}", i);
    }

    // the target disappears: the model forgets it after stop_frame_count frames
    for _ in 0..5 {
        tracker.process(Image::filled(WIDTH, HEIGHT, 20)).unwrap();
    }
    assert!(!tracker.is_usable());
    assert_eq!(tracker.process(frame_with_square(x, y)).unwrap(), None);
}

// =============================================================================
// Test 4: Self-learning model
// =============================================================================

#[test]
fn test_integration_self_learning_tracker() {
    let model = SelfLearningMeasurementModel::new(
        extractor(),
        probabilistic_svm(1),
        SelfLearningParameters::default(),
    )
    .unwrap();
    let mut tracker = AdaptiveCondensationTracker::new(&config(4), model.into()).unwrap();

    let (x, y) = square_position(0);
    assert!(tracker
        .initialize(frame_with_square(x, y), &Rect::new(x, y, SQUARE, SQUARE))
        .unwrap());

    let mut hits = 0;
    for i in 1..15 {
        let (x, y) = square_position(i);
        if let Some(rect) = tracker.process(frame_with_square(x, y)).unwrap() {
            if rect.intersects(&Rect::new(x, y, SQUARE, SQUARE)) {
                hits += 1;
            }
        }
    }
    assert!(hits >= 10, "only {} of 14 frames tracked", hits);
}

// =============================================================================
// Test 5: Optical-flow transition keeps up with fast motion
// =============================================================================

#[test]
fn test_integration_optical_flow_transition() {
    let fallback = TransitionModelEnum::Simple(SimpleTransitionModel::new(1.0, 0.05).unwrap());
    let transition = TransitionModelEnum::OpticalFlow(
        OpticalFlowTransitionModel::new(fallback, Box::new(CentroidFlow), 0.02, 5, 1.0).unwrap(),
    );
    let sampler = ResamplingSampler::new(300, 0.1, ResamplingAlgorithm::default(), transition, 16, 26)
        .unwrap();
    let mut tracker = CondensationTracker::from_parts(
        sampler.into(),
        PositionExtractorEnum::WeightedMean(WeightedMeanPositionExtractor),
        static_model(),
        StdRng::seed_from_u64(5),
    );

    // lock on while the square stands still, then move 8 pixels per frame
    for _ in 0..8 {
        tracker.process(frame_with_square(10, 50));
    }
    assert!(tracker.state().is_some());
    for i in 1..12 {
        let x = 10 + 8 * i;
        let rect = tracker.process(frame_with_square(x, 50)).unwrap();
        assert!(rect.intersects(&Rect::new(x, 50, SQUARE, SQUARE)), "frame {}: {:?}", i, rect);
    }
}

// =============================================================================
// Test 6: Grid sampler and count invariance
// =============================================================================

#[test]
fn test_integration_grid_sampler_scenario() {
    let mut sampler: SamplerEnum = GridSampler::new(20, 20, 2.0, 1.0).unwrap().into();
    let image = Image::filled(100, 100, 0);
    let mut rng = StdRng::seed_from_u64(0);
    let mut samples = Vec::new();
    sampler.init(&image);
    sampler.sample(&[], &mut samples, &image, None, &mut rng);
    assert_eq!(samples.len(), 25);
    assert!(samples.iter().all(|s| s.size == 20 && (s.bounds().x % 20) == 0 && (s.bounds().y % 20) == 0));
}

#[test]
fn test_integration_count_invariance_across_images() {
    let mut tracker = CondensationTracker::new(&config(6), static_model()).unwrap();
    for i in 0..20 {
        let image = if i % 3 == 0 {
            Image::filled(WIDTH, HEIGHT, 20)
        } else {
            frame_with_square(5 * i, 10 + 2 * i)
        };
        tracker.process(image);
        assert_eq!(tracker.samples().len(), 600);
        for sample in tracker.samples() {
            assert!(sample.size >= 16 && sample.size <= 26);
            assert!(sample.bounds().is_inside(WIDTH, HEIGHT));
        }
    }
}

// =============================================================================
// Test 7: Static negatives and frame-based example management
// =============================================================================

#[test]
fn test_integration_static_negatives_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..5 {
        writeln!(file, "{}", vec!["0.0"; 4].join(" ")).unwrap();
    }
    file.flush().unwrap();

    let mut svm = TrainableSvmClassifier::new(
        SvmParameters::new(Kernel::Linear, 1.0),
        Box::new(MeanDifferenceSolver),
        FrameBasedExampleManagement::new(3, 1.0).unwrap().into(),
        0.0,
    )
    .unwrap();
    svm.load_static_negatives(file.path(), Some(3), 1.0).unwrap();
    assert_eq!(svm.static_negatives().len(), 3);

    // ceil(1.0 * 3) = 3 positives are required before the first training
    let positive = || DVector::from_element(4, 1.0);
    assert!(!svm.retrain(vec![positive(), positive()], vec![]).unwrap());
    assert!(svm.retrain(vec![positive()], vec![]).unwrap());
    assert!(svm.classify(&positive()).0);
    assert!(!svm.classify(&DVector::zeros(4)).0);
}
