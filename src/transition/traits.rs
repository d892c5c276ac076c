//! Transition model and optical flow traits.

use nalgebra::Point2;
use rand::rngs::StdRng;

use crate::{Image, Sample};

/// Propagates particles from one frame to the next.
pub trait TransitionModel {
    /// Reset image-dependent state with the first frame of a sequence.
    fn init(&mut self, image: &Image);

    /// Move every sample forward in time, in place.
    ///
    /// # Arguments
    /// * `samples` - Particles to advance
    /// * `image` - The frame the particles are predicted into
    /// * `target` - Estimated target of the previous frame, if any
    /// * `rng` - Random source for the process noise
    fn predict(
        &mut self,
        samples: &mut [Sample],
        image: &Image,
        target: Option<&Sample>,
        rng: &mut StdRng,
    );
}

/// Sparse point tracker between two frames (e.g. pyramidal Lucas-Kanade).
///
/// Implemented outside this crate; the optical-flow transition model only
/// needs point correspondences.
pub trait OpticalFlow: Send {
    /// Track `points` from `from` into `to`.
    ///
    /// # Returns
    /// One entry per input point, `None` when the point could not be tracked.
    fn track(&mut self, from: &Image, to: &Image, points: &[Point2<f64>]) -> Vec<Option<Point2<f64>>>;
}
