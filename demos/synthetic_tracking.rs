//! Track a bright square moving over a dark background.
//!
//! The static brightness model finds the square first; once the adaptive
//! model has learned it from a few frames, the tracker switches over.
//!
//! Run with: cargo run --example synthetic_tracking [log-level]

use nalgebra::DVector;

use condensation_rs::classifier::{
    Classifier, FixedSizeExampleManagement, TrainableProbabilisticSvmClassifier,
    TrainableSvmClassifier,
};
use condensation_rs::features::DirectPixelExtractor;
use condensation_rs::measurement::{
    PositionDependentMeasurementModel, PositionDependentParameters, SingleClassifierModel,
};
use condensation_rs::svm::{Kernel, MeanDifferenceSolver, SvmParameters};
use condensation_rs::{Image, PartiallyAdaptiveCondensationTracker, Rect, Result, TrackerConfig};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const SQUARE: i32 = 24;
const FRAMES: i32 = 60;

struct BrightnessClassifier;

impl Classifier for BrightnessClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        let mean = features.mean();
        (mean > 0.5, mean)
    }
}

/// Square position in frame `i`: a slow diagonal drift with a bounce.
fn square_position(i: i32) -> (i32, i32) {
    let x = 30 + 4 * i;
    let y = 60 + ((i % 30) - 15).abs() * 3;
    (x.min(WIDTH as i32 - SQUARE), y)
}

fn main() -> Result<()> {
    let level = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<tracing_subscriber::filter::LevelFilter>().ok())
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let mut config = TrackerConfig::new(16, 40);
    config.sample_count = 600;
    config.seed = 42;

    let static_model = SingleClassifierModel::new(
        Box::new(DirectPixelExtractor::new(8, 8)?),
        Box::new(BrightnessClassifier),
    );
    let svm = TrainableSvmClassifier::new(
        SvmParameters::new(Kernel::Rbf { gamma: 0.05 }, 1.0),
        Box::new(MeanDifferenceSolver),
        FixedSizeExampleManagement::new(50, 250, 5)?.into(),
        0.0,
    )?;
    let adaptive_model = PositionDependentMeasurementModel::new(
        Box::new(DirectPixelExtractor::new(8, 8)?),
        Box::new(TrainableProbabilisticSvmClassifier::new(svm)),
        PositionDependentParameters::default(),
    )?;
    let mut tracker = PartiallyAdaptiveCondensationTracker::new(
        &config,
        static_model.into(),
        adaptive_model.into(),
    )?;

    let mut hits = 0;
    for i in 0..FRAMES {
        let (x, y) = square_position(i);
        let mut image = Image::filled(WIDTH, HEIGHT, 25);
        image.fill_rect(x, y, SQUARE, SQUARE, 220);

        let found = tracker.process(image)?;
        let truth = Rect::new(x, y, SQUARE, SQUARE);
        let model = if tracker.used_adaptive_model() { "adaptive" } else { "static" };
        match found {
            Some(rect) => {
                if rect.intersects(&truth) {
                    hits += 1;
                }
                println!(
                    "frame {:3} [{:8}] truth ({:3}, {:3}) found ({:3}, {:3}, {:2}x{:2})",
                    i, model, x, y, rect.x, rect.y, rect.width, rect.height
                );
            }
            None => println!("frame {:3} [{:8}] truth ({:3}, {:3}) not found", i, model, x, y),
        }
    }
    println!("tracked {} of {} frames", hits, FRAMES);
    Ok(())
}
