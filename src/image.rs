//! Grayscale frames and the version counter used to scope per-frame caches.

use nalgebra::DMatrix;

use crate::{Error, Result};

/// 8-bit grayscale image. Pixels are stored as a `height x width` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: DMatrix<u8>,
}

impl Image {
    /// Create an image filled with a constant value.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            pixels: DMatrix::from_element(height, width, value),
        }
    }

    /// Create an image from row-major pixel data.
    pub fn from_row_slice(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::InvalidArgument(format!(
                "pixel buffer length {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            pixels: DMatrix::from_row_slice(height, width, data),
        })
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at column `x`, row `y`. Panics when out of range.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[(y, x)]
    }

    /// Fill a rectangle, clipped to the image.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, value: u8) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + width).clamp(0, self.width() as i32) as usize;
        let y1 = (y + height).clamp(0, self.height() as i32) as usize;
        for row in y0..y1 {
            for col in x0..x1 {
                self.pixels[(row, col)] = value;
            }
        }
    }
}

/// Image plus a version number that increases strictly with every `set_data`.
///
/// Feature extractors and measurement models compare versions to decide
/// whether cached data still belongs to the current frame.
#[derive(Debug, Clone, Default)]
pub struct VersionedImage {
    data: Option<Image>,
    version: u64,
}

impl VersionedImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(image: Image) -> Self {
        let mut versioned = Self::new();
        versioned.set_data(image);
        versioned
    }

    /// Replace the image and bump the version.
    pub fn set_data(&mut self, image: Image) {
        self.data = Some(image);
        self.version += 1;
    }

    /// Current image, `None` before the first `set_data`.
    pub fn data(&self) -> Option<&Image> {
        self.data.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn width(&self) -> usize {
        self.data.as_ref().map_or(0, Image::width)
    }

    pub fn height(&self) -> usize {
        self.data.as_ref().map_or(0, Image::height)
    }
}
