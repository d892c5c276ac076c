//! Feature extraction contract.

use nalgebra::DVector;

use crate::{Rect, VersionedImage};

/// Feature vector of an image region.
///
/// `(x, y)` is the centre of the region it was extracted from.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub data: DVector<f64>,
}

impl Patch {
    /// Region the patch was extracted from.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x - self.width / 2, self.y - self.height / 2, self.width, self.height)
    }
}

/// Turns image regions into feature vectors (pixels, HOG, LBP, ...).
pub trait FeatureExtractor: Send {
    /// Make `image` the source of subsequent extractions.
    fn update(&mut self, image: &VersionedImage);

    /// Extract the features of the region centred at `(x, y)`.
    ///
    /// # Returns
    /// `None` when the region does not lie inside the image. This is not an error.
    fn extract(&mut self, x: i32, y: i32, width: i32, height: i32) -> Option<Patch>;
}
