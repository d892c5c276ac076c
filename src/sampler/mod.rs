//! Samplers producing each new generation of particles.
//!
//! - `ResamplingSampler` - importance resampling + transition + random exploration
//! - `GridSampler` - exhaustive sliding-window search

mod traits;
mod grid;
mod resampling_sampler;
mod dispatch;

pub use traits::Sampler;
pub use grid::GridSampler;
pub use resampling_sampler::ResamplingSampler;
pub use dispatch::SamplerEnum;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampling::{LowVarianceResampling, MultinomialResampling, ResamplingAlgorithm};
    use crate::transition::{SimpleTransitionModel, TransitionModelEnum};
    use crate::{Image, Sample};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn resampling_sampler(count: usize, random_rate: f64, deviation: f64) -> ResamplingSampler {
        ResamplingSampler::new(
            count,
            random_rate,
            ResamplingAlgorithm::LowVariance(LowVarianceResampling),
            TransitionModelEnum::Simple(SimpleTransitionModel::new(deviation, 0.2).unwrap()),
            10,
            60,
        )
        .unwrap()
    }

    // ===== GridSampler =====

    #[test]
    fn test_grid_single_scale_tiles_image() {
        let mut sampler = GridSampler::new(20, 20, 2.0, 1.0).unwrap();
        let image = Image::filled(100, 100, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut samples = Vec::new();
        sampler.sample(&[], &mut samples, &image, None, &mut rng);

        let per_side = ((100 - 20) / 20 + 1) as usize;
        assert_eq!(samples.len(), per_side * per_side);
        assert!(samples.iter().all(|s| s.size == 20));

        let mut xs: Vec<i32> = samples.iter().map(|s| s.bounds().x).collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs, vec![0, 20, 40, 60, 80]);
        assert!(samples.iter().all(|s| s.bounds().is_inside(100, 100)));
    }

    #[test]
    fn test_grid_multiple_scales() {
        let sampler = GridSampler::new(10, 45, 2.0, 0.5).unwrap();
        assert_eq!(sampler.sizes(), vec![10, 20, 40]);

        let mut sampler = sampler;
        let image = Image::filled(50, 30, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut samples = Vec::new();
        sampler.sample(&[], &mut samples, &image, None, &mut rng);

        // size 10, stride 5: 9 x 5; size 20, stride 10: 4 x 2; size 40 does not fit 30 rows
        assert_eq!(samples.len(), 9 * 5 + 4 * 2);
        assert!(samples.iter().all(|s| s.bounds().is_inside(50, 30)));
    }

    #[test]
    fn test_grid_ignores_previous_generation() {
        let mut sampler = GridSampler::new(20, 20, 2.0, 1.0).unwrap();
        let image = Image::filled(100, 100, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut first = Vec::new();
        sampler.sample(&[], &mut first, &image, None, &mut rng);
        let mut old = first.clone();
        old[3].weight = 100.0;
        let mut second = Vec::new();
        sampler.sample(&old, &mut second, &image, None, &mut rng);
        assert_eq!(first, second);
    }

    #[test]
    fn test_grid_invalid_arguments() {
        assert!(GridSampler::new(0, 10, 2.0, 1.0).is_err());
        assert!(GridSampler::new(10, 5, 2.0, 1.0).is_err());
        assert!(GridSampler::new(10, 20, 1.0, 1.0).is_err());
        assert!(GridSampler::new(10, 20, 2.0, 0.0).is_err());
        assert!(GridSampler::new(10, 20, f64::NAN, 1.0).is_err());
    }

    // ===== ResamplingSampler =====

    #[test]
    fn test_resampling_count_invariance() {
        let mut sampler = resampling_sampler(150, 0.3, 3.0);
        let image = Image::filled(120, 80, 0);
        let mut rng = StdRng::seed_from_u64(42);

        let mut old = Vec::new();
        let mut new = Vec::new();
        for frame in 0..30 {
            sampler.sample(&old, &mut new, &image, None, &mut rng);
            assert_eq!(new.len(), 150, "frame {}", frame);
            for s in new.iter_mut() {
                s.weight = rng.gen::<f64>();
            }
            std::mem::swap(&mut old, &mut new);
        }
    }

    #[test]
    fn test_resampling_validity_invariant() {
        // large diffusion pushes many particles out of the image
        let mut sampler = resampling_sampler(200, 0.1, 40.0);
        let image = Image::filled(100, 90, 0);
        let mut rng = StdRng::seed_from_u64(5);

        let mut old: Vec<Sample> = (0..200)
            .map(|i| {
                let mut s = Sample::new(8 + (i % 3), 50, 12);
                s.weight = 1.0;
                s.vx = -5;
                s.v_size = 1.3;
                s
            })
            .collect();
        let mut new = Vec::new();
        for _ in 0..10 {
            sampler.sample(&old, &mut new, &image, None, &mut rng);
            for s in &new {
                assert!(s.size >= 10 && s.size <= 60, "size {}", s.size);
                assert!(s.bounds().is_inside(100, 90), "bounds {:?}", s.bounds());
            }
            for s in new.iter_mut() {
                s.weight = 1.0;
            }
            std::mem::swap(&mut old, &mut new);
        }
    }

    #[test]
    fn test_resampling_follows_weights() {
        let mut sampler = ResamplingSampler::new(
            100,
            0.0,
            ResamplingAlgorithm::Multinomial(MultinomialResampling),
            TransitionModelEnum::Simple(SimpleTransitionModel::new(0.0, 0.0).unwrap()),
            10,
            60,
        )
        .unwrap();
        let image = Image::filled(200, 200, 0);
        let mut rng = StdRng::seed_from_u64(9);

        let mut heavy = Sample::new(100, 100, 20);
        heavy.weight = 1.0;
        let light = Sample::new(50, 50, 20);
        let mut new = Vec::new();
        sampler.sample(&[heavy, light], &mut new, &image, None, &mut rng);

        assert_eq!(new.len(), 100);
        assert!(new.iter().all(|s| s.x == 100 && s.y == 100));
    }

    #[test]
    fn test_resampling_all_random_when_weightless() {
        let mut sampler = resampling_sampler(50, 0.0, 1.0);
        let image = Image::filled(100, 100, 0);
        let mut rng = StdRng::seed_from_u64(2);
        let old = vec![Sample::new(50, 50, 20); 50];
        let mut new = Vec::new();
        sampler.sample(&old, &mut new, &image, None, &mut rng);
        assert_eq!(new.len(), 50);
        assert!(new.iter().all(|s| sampler.is_valid(s, &image)));
        assert!(new.iter().any(|s| (s.x, s.y) != (50, 50)));
    }

    #[test]
    fn test_random_samples_cover_size_range() {
        let sampler = resampling_sampler(10, 1.0, 1.0);
        let image = Image::filled(100, 100, 0);
        let mut rng = StdRng::seed_from_u64(3);
        let sizes: Vec<i32> = (0..500).map(|_| sampler.random_sample(&image, &mut rng).size).collect();
        assert_eq!(*sizes.iter().min().unwrap(), 10);
        assert_eq!(*sizes.iter().max().unwrap(), 60);
    }

    #[test]
    fn test_resampling_invalid_arguments() {
        let transition = || TransitionModelEnum::Simple(SimpleTransitionModel::default());
        assert!(ResamplingSampler::new(0, 0.5, ResamplingAlgorithm::default(), transition(), 10, 20).is_err());
        assert!(ResamplingSampler::new(10, 1.5, ResamplingAlgorithm::default(), transition(), 10, 20).is_err());
        assert!(ResamplingSampler::new(10, 0.5, ResamplingAlgorithm::default(), transition(), 0, 20).is_err());
        assert!(ResamplingSampler::new(10, 0.5, ResamplingAlgorithm::default(), transition(), 30, 20).is_err());
    }

    #[test]
    fn test_sampler_enum_dispatch() {
        let mut sampler: SamplerEnum = GridSampler::new(50, 50, 2.0, 1.0).unwrap().into();
        let image = Image::filled(100, 100, 0);
        let mut rng = StdRng::seed_from_u64(0);
        sampler.init(&image);
        let mut new = Vec::new();
        sampler.sample(&[], &mut new, &image, None, &mut rng);
        assert_eq!(new.len(), 4);
    }
}
