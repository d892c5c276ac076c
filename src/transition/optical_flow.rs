//! Median-flow transition driven by sparse optical flow.

use std::fmt;

use nalgebra::Point2;
use rand::rngs::StdRng;

use super::dispatch::TransitionModelEnum;
use super::simple::{check_deviation, gaussian};
use super::traits::{OpticalFlow, TransitionModel};
use crate::utils::{lower_median, round_to_i32};
use crate::{Error, Image, Result, Sample};

/// Rigid motion estimated from the surviving point correspondences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianFlow {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

/// Transition model that moves all particles with the median motion of a grid
/// of points tracked over the previous target box.
///
/// Points are tracked forward and backward; those whose round trip misses the
/// start by more than `max_fb_error` are dropped. If fewer than half of the
/// grid survives, or the flow is degenerate, or there is no previous frame or
/// target, the wrapped fallback model predicts instead.
pub struct OpticalFlowTransitionModel {
    fallback: Box<TransitionModelEnum>,
    flow: Box<dyn OpticalFlow>,
    scatter: f64,
    grid_size: usize,
    max_fb_error: f64,
    previous: Option<Image>,
}

impl OpticalFlowTransitionModel {
    /// Create a new model.
    ///
    /// # Arguments
    /// * `fallback` - Model used when the flow cannot be trusted
    /// * `flow` - Point tracker
    /// * `scatter` - Noise scale: position deviation is `scatter * size`, size deviation `scatter` (log2)
    /// * `grid_size` - Number of grid points per side (at least 2)
    /// * `max_fb_error` - Maximum forward-backward error in pixels
    pub fn new(
        fallback: TransitionModelEnum,
        flow: Box<dyn OpticalFlow>,
        scatter: f64,
        grid_size: usize,
        max_fb_error: f64,
    ) -> Result<Self> {
        check_deviation("scatter", scatter)?;
        if grid_size < 2 {
            return Err(Error::InvalidArgument(format!(
                "grid_size must be at least 2, got {}",
                grid_size
            )));
        }
        if !(max_fb_error.is_finite() && max_fb_error >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "max_fb_error must be finite and non-negative, got {}",
                max_fb_error
            )));
        }
        Ok(Self {
            fallback: Box::new(fallback),
            flow,
            scatter,
            grid_size,
            max_fb_error,
            previous: None,
        })
    }

    pub fn scatter(&self) -> f64 {
        self.scatter
    }

    /// Grid of `grid_size x grid_size` points spread over the target box.
    fn grid_points(&self, target: &Sample) -> Vec<Point2<f64>> {
        let bounds = target.bounds();
        let n = self.grid_size as f64;
        let cell_w = f64::from(bounds.width) / n;
        let cell_h = f64::from(bounds.height) / n;
        let mut points = Vec::with_capacity(self.grid_size * self.grid_size);
        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                points.push(Point2::new(
                    f64::from(bounds.x) + (col as f64 + 0.5) * cell_w,
                    f64::from(bounds.y) + (row as f64 + 0.5) * cell_h,
                ));
            }
        }
        points
    }

    /// Estimate the median motion of the target between `previous` and `current`.
    ///
    /// Returns `None` when too few points survive or the result is degenerate.
    pub fn estimate_flow(
        &mut self,
        previous: &Image,
        current: &Image,
        target: &Sample,
    ) -> Option<MedianFlow> {
        let points = self.grid_points(target);
        let forward = self.flow.track(previous, current, &points);

        let mut starts = Vec::with_capacity(points.len());
        let mut ends = Vec::with_capacity(points.len());
        for (start, end) in points.iter().zip(forward.iter()) {
            if let Some(end) = end {
                starts.push(*start);
                ends.push(*end);
            }
        }
        if starts.is_empty() {
            return None;
        }

        let backward = self.flow.track(current, previous, &ends);
        let mut prev_pts = Vec::with_capacity(starts.len());
        let mut curr_pts = Vec::with_capacity(starts.len());
        for ((start, end), back) in starts.iter().zip(ends.iter()).zip(backward.iter()) {
            if let Some(back) = back {
                let error = (back - start).norm();
                if error.is_finite() && error <= self.max_fb_error {
                    prev_pts.push(*start);
                    curr_pts.push(*end);
                }
            }
        }

        if prev_pts.len() * 2 < points.len() {
            tracing::debug!(
                survivors = prev_pts.len(),
                grid = points.len(),
                "too few optical flow points survived"
            );
            return None;
        }

        let dxs: Vec<f64> = prev_pts.iter().zip(&curr_pts).map(|(p, c)| c.x - p.x).collect();
        let dys: Vec<f64> = prev_pts.iter().zip(&curr_pts).map(|(p, c)| c.y - p.y).collect();

        let mut ratios = Vec::new();
        for i in 0..prev_pts.len() {
            for j in (i + 1)..prev_pts.len() {
                let before = (prev_pts[i] - prev_pts[j]).norm();
                if before > f64::EPSILON {
                    ratios.push((curr_pts[i] - curr_pts[j]).norm() / before);
                }
            }
        }

        let flow = MedianFlow {
            dx: lower_median(&dxs)?,
            dy: lower_median(&dys)?,
            scale: lower_median(&ratios)?,
        };
        if flow.scale > 0.0 && flow.scale.is_finite() {
            Some(flow)
        } else {
            None
        }
    }
}

impl fmt::Debug for OpticalFlowTransitionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpticalFlowTransitionModel")
            .field("fallback", &self.fallback)
            .field("scatter", &self.scatter)
            .field("grid_size", &self.grid_size)
            .field("max_fb_error", &self.max_fb_error)
            .field("has_previous", &self.previous.is_some())
            .finish()
    }
}

impl TransitionModel for OpticalFlowTransitionModel {
    fn init(&mut self, image: &Image) {
        self.previous = Some(image.clone());
        self.fallback.init(image);
    }

    fn predict(
        &mut self,
        samples: &mut [Sample],
        image: &Image,
        target: Option<&Sample>,
        rng: &mut StdRng,
    ) {
        let previous = self.previous.take();
        let estimate = match (previous.as_ref(), target) {
            (Some(prev), Some(target)) => self
                .estimate_flow(prev, image, target)
                .map(|flow| (flow, target.clone())),
            _ => None,
        };

        match estimate {
            Some((flow, target)) => {
                let cx = f64::from(target.x);
                let cy = f64::from(target.y);
                for sample in samples.iter_mut() {
                    let old_x = sample.x;
                    let old_y = sample.y;
                    let old_size = f64::from(sample.size);

                    // scale about the target centre, then translate with it
                    let mut x = cx + flow.dx + flow.scale * (f64::from(old_x) - cx);
                    let mut y = cy + flow.dy + flow.scale * (f64::from(old_y) - cy);
                    let mut size = old_size * flow.scale;

                    if self.scatter > 0.0 {
                        let deviation = self.scatter * size;
                        x += gaussian(rng, deviation);
                        y += gaussian(rng, deviation);
                        size *= 2f64.powf(gaussian(rng, self.scatter));
                    }

                    sample.x = round_to_i32(x);
                    sample.y = round_to_i32(y);
                    sample.size = round_to_i32(size);
                    sample.vx = sample.x - old_x;
                    sample.vy = sample.y - old_y;
                    sample.v_size = if old_size > 0.0 {
                        f64::from(sample.size) / old_size
                    } else {
                        1.0
                    };
                }
            }
            None => {
                tracing::debug!("optical flow unavailable, using fallback transition");
                self.fallback.predict(samples, image, target, rng);
            }
        }

        self.previous = Some(image.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::SimpleTransitionModel;
    use rand::SeedableRng;

    /// Moves every point by a fixed offset; the backward call undoes it.
    struct ShiftFlow {
        dx: f64,
        dy: f64,
        calls: usize,
        /// Number of leading points that move wildly (but consistently).
        outliers: usize,
        /// Drop every point forward.
        lose_all: bool,
    }

    impl ShiftFlow {
        fn new(dx: f64, dy: f64) -> Self {
            Self { dx, dy, calls: 0, outliers: 0, lose_all: false }
        }
    }

    impl OpticalFlow for ShiftFlow {
        fn track(&mut self, _from: &Image, _to: &Image, points: &[Point2<f64>]) -> Vec<Option<Point2<f64>>> {
            self.calls += 1;
            let sign = if self.calls % 2 == 1 { 1.0 } else { -1.0 };
            points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    if self.lose_all {
                        return None;
                    }
                    let factor = if i < self.outliers { 40.0 } else { 1.0 };
                    Some(Point2::new(p.x + sign * factor * self.dx, p.y + sign * factor * self.dy))
                })
                .collect()
        }
    }

    /// Forward flow is fine but the backward pass lands far from the start.
    struct InconsistentFlow {
        calls: usize,
    }

    impl OpticalFlow for InconsistentFlow {
        fn track(&mut self, _from: &Image, _to: &Image, points: &[Point2<f64>]) -> Vec<Option<Point2<f64>>> {
            self.calls += 1;
            let offset = if self.calls % 2 == 1 { 2.0 } else { 10.0 };
            points.iter().map(|p| Some(Point2::new(p.x + offset, p.y))).collect()
        }
    }

    fn still_fallback() -> TransitionModelEnum {
        TransitionModelEnum::Simple(SimpleTransitionModel::new(0.0, 0.0).unwrap())
    }

    fn model(flow: Box<dyn OpticalFlow>) -> OpticalFlowTransitionModel {
        OpticalFlowTransitionModel::new(still_fallback(), flow, 0.0, 5, 1.0).unwrap()
    }

    #[test]
    fn test_follows_median_flow() {
        let mut model = model(Box::new(ShiftFlow::new(5.0, -3.0)));
        let image = Image::filled(200, 200, 0);
        let mut rng = StdRng::seed_from_u64(0);
        model.init(&image);

        let target = Sample::new(100, 100, 40);
        let mut samples = vec![Sample::new(100, 100, 40), Sample::new(120, 90, 30)];
        model.predict(&mut samples, &image, Some(&target), &mut rng);

        assert_eq!((samples[0].x, samples[0].y, samples[0].size), (105, 97, 40));
        assert_eq!((samples[1].x, samples[1].y, samples[1].size), (125, 87, 30));
        assert_eq!((samples[1].vx, samples[1].vy), (5, -3));
    }

    #[test]
    fn test_median_ignores_outliers() {
        let mut flow = ShiftFlow::new(4.0, 0.0);
        flow.outliers = 5; // 5 of 25 points
        let mut model = model(Box::new(flow));
        let image = Image::filled(200, 200, 0);
        let mut rng = StdRng::seed_from_u64(0);
        model.init(&image);

        let target = Sample::new(100, 100, 40);
        let mut samples = vec![Sample::new(100, 100, 40)];
        model.predict(&mut samples, &image, Some(&target), &mut rng);
        assert_eq!(samples[0].x, 104);
    }

    #[test]
    fn test_falls_back_without_previous_frame() {
        let mut model = model(Box::new(ShiftFlow::new(5.0, 5.0)));
        let image = Image::filled(200, 200, 0);
        let mut rng = StdRng::seed_from_u64(0);

        let target = Sample::new(100, 100, 40);
        let mut sample = Sample::new(100, 100, 40);
        sample.vx = 1;
        let mut samples = vec![sample];
        model.predict(&mut samples, &image, Some(&target), &mut rng);
        // the still fallback only integrates the existing velocity
        assert_eq!((samples[0].x, samples[0].y), (101, 100));

        // the frame is now remembered, so the next step uses the flow
        let mut samples = vec![Sample::new(100, 100, 40)];
        model.predict(&mut samples, &image, Some(&target), &mut rng);
        assert_eq!((samples[0].x, samples[0].y), (105, 105));
    }

    #[test]
    fn test_falls_back_without_target() {
        let mut model = model(Box::new(ShiftFlow::new(5.0, 5.0)));
        let image = Image::filled(200, 200, 0);
        let mut rng = StdRng::seed_from_u64(0);
        model.init(&image);

        let mut samples = vec![Sample::new(50, 50, 20)];
        model.predict(&mut samples, &image, None, &mut rng);
        assert_eq!((samples[0].x, samples[0].y), (50, 50));
    }

    #[test]
    fn test_falls_back_when_points_are_lost() {
        let mut flow = ShiftFlow::new(5.0, 5.0);
        flow.lose_all = true;
        let mut model = model(Box::new(flow));
        let image = Image::filled(200, 200, 0);
        let mut rng = StdRng::seed_from_u64(0);
        model.init(&image);

        let target = Sample::new(100, 100, 40);
        let mut samples = vec![Sample::new(100, 100, 40)];
        model.predict(&mut samples, &image, Some(&target), &mut rng);
        assert_eq!((samples[0].x, samples[0].y), (100, 100));
    }

    #[test]
    fn test_forward_backward_error_rejects_points() {
        let mut model = model(Box::new(InconsistentFlow { calls: 0 }));
        let image = Image::filled(200, 200, 0);
        model.init(&image);

        let target = Sample::new(100, 100, 40);
        assert!(model.estimate_flow(&image, &image, &target).is_none());
    }

    #[test]
    fn test_estimated_scale_is_one_for_translation() {
        let mut model = model(Box::new(ShiftFlow::new(2.0, 1.0)));
        let image = Image::filled(200, 200, 0);
        let flow = model.estimate_flow(&image, &image, &Sample::new(100, 100, 40)).unwrap();
        assert!((flow.scale - 1.0).abs() < 1e-9);
        assert!((flow.dx - 2.0).abs() < 1e-9);
        assert!((flow.dy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(OpticalFlowTransitionModel::new(still_fallback(), Box::new(ShiftFlow::new(0.0, 0.0)), -0.1, 5, 1.0).is_err());
        assert!(OpticalFlowTransitionModel::new(still_fallback(), Box::new(ShiftFlow::new(0.0, 0.0)), 0.1, 1, 1.0).is_err());
        assert!(OpticalFlowTransitionModel::new(still_fallback(), Box::new(ShiftFlow::new(0.0, 0.0)), 0.1, 5, f64::NAN).is_err());
    }
}
