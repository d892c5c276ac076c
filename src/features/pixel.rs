//! Baseline extractor using raw, rescaled pixels.

use nalgebra::DVector;

use super::traits::{FeatureExtractor, Patch};
use crate::{Error, Image, Rect, Result, VersionedImage};

/// Crops the region, resizes it to a fixed patch size with nearest-neighbour
/// sampling and returns the pixels scaled to `[0, 1]` in row-major order.
#[derive(Debug, Clone)]
pub struct DirectPixelExtractor {
    patch_width: usize,
    patch_height: usize,
    image: Option<Image>,
    version: u64,
}

impl DirectPixelExtractor {
    /// Create a new extractor producing `patch_width * patch_height` features.
    pub fn new(patch_width: usize, patch_height: usize) -> Result<Self> {
        if patch_width == 0 || patch_height == 0 {
            return Err(Error::InvalidArgument(format!(
                "patch size must be positive, got {}x{}",
                patch_width, patch_height
            )));
        }
        Ok(Self {
            patch_width,
            patch_height,
            image: None,
            version: 0,
        })
    }

    /// Length of the produced feature vectors.
    pub fn dimensions(&self) -> usize {
        self.patch_width * self.patch_height
    }
}

impl FeatureExtractor for DirectPixelExtractor {
    fn update(&mut self, image: &VersionedImage) {
        if self.image.is_none() || image.version() != self.version {
            self.image = image.data().cloned();
            self.version = image.version();
        }
    }

    fn extract(&mut self, x: i32, y: i32, width: i32, height: i32) -> Option<Patch> {
        let image = self.image.as_ref()?;
        let bounds = Rect::new(x - width / 2, y - height / 2, width, height);
        if !bounds.is_inside(image.width(), image.height()) {
            return None;
        }

        let mut data = DVector::zeros(self.dimensions());
        for row in 0..self.patch_height {
            let src_y = bounds.y as usize + row * height as usize / self.patch_height;
            for col in 0..self.patch_width {
                let src_x = bounds.x as usize + col * width as usize / self.patch_width;
                data[row * self.patch_width + col] = f64::from(image.get(src_x, src_y)) / 255.0;
            }
        }

        Some(Patch {
            x,
            y,
            width,
            height,
            data,
        })
    }
}
