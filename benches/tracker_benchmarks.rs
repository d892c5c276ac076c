//! Tracker benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use condensation_rs::classifier::{
    Classifier, FixedSizeExampleManagement, TrainableClassifier, TrainableSvmClassifier,
};
use condensation_rs::features::DirectPixelExtractor;
use condensation_rs::measurement::SingleClassifierModel;
use condensation_rs::svm::{Kernel, MeanDifferenceSolver, SvmParameters};
use condensation_rs::{CondensationTracker, Image, TrackerConfig};

struct BrightnessClassifier;

impl Classifier for BrightnessClassifier {
    fn classify(&self, features: &DVector<f64>) -> (bool, f64) {
        let mean = features.mean();
        (mean > 0.5, mean)
    }
}

fn create_frame(offset: i32) -> Image {
    let mut image = Image::filled(320, 240, 20);
    image.fill_rect(100 + offset, 100, 24, 24, 230);
    image
}

fn create_tracker(sample_count: usize) -> CondensationTracker {
    let mut config = TrackerConfig::new(16, 40);
    config.sample_count = sample_count;
    let model = SingleClassifierModel::new(
        Box::new(DirectPixelExtractor::new(10, 10).expect("valid patch size")),
        Box::new(BrightnessClassifier),
    );
    CondensationTracker::new(&config, model.into()).expect("valid tracker")
}

fn benchmark_tracker_process(c: &mut Criterion) {
    for sample_count in [200, 800] {
        let mut tracker = create_tracker(sample_count);
        let frames: Vec<Image> = (0..8).map(|i| create_frame(2 * i)).collect();
        let mut i = 0;
        c.bench_function(&format!("tracker_process_{}_samples", sample_count), |b| {
            b.iter(|| {
                i = (i + 1) % frames.len();
                tracker.process(black_box(frames[i].clone()))
            })
        });
    }
}

fn benchmark_svm_retrain(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut random_vector = |offset: f64| DVector::from_fn(100, |_, _| offset + rng.gen::<f64>() * 0.5);
    let positives: Vec<DVector<f64>> = (0..10).map(|_| random_vector(0.5)).collect();
    let negatives: Vec<DVector<f64>> = (0..50).map(|_| random_vector(0.0)).collect();

    let mut classifier = TrainableSvmClassifier::new(
        SvmParameters::new(Kernel::Rbf { gamma: 0.05 }, 1.0),
        Box::new(MeanDifferenceSolver),
        FixedSizeExampleManagement::new(50, 250, 1).expect("valid capacities").into(),
        0.0,
    )
    .expect("valid parameters");

    c.bench_function("svm_retrain_10_50", |b| {
        b.iter(|| {
            classifier
                .retrain(black_box(positives.clone()), black_box(negatives.clone()))
                .expect("training succeeds")
        })
    });
}

criterion_group!(benches, benchmark_tracker_process, benchmark_svm_retrain);
criterion_main!(benches);
