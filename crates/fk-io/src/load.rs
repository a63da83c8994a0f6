use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult, RgbImage};
use ndarray::Array4;
use tracing::debug;

use fk_core::{CropRegion, pad_batch};

use crate::LoadError;

/// Stride the interpolator's feature pyramid needs by default.
pub const DEFAULT_ALIGN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// Height and width are padded up to a multiple of this.
    pub align: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            align: DEFAULT_ALIGN,
        }
    }
}

/// Converts 8-bit RGB pixels into a `1 x H x W x 3` batch scaled to `[0, 1]`.
pub fn rgb_to_batch(rgb: &RgbImage) -> Array4<f32> {
    let (w, h) = rgb.dimensions();
    let mut batch = Array4::<f32>::zeros((1, h as usize, w as usize, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            batch[[0, y, x, c]] = pixel[c] as f32 / 255.0;
        }
    }
    batch
}

/// Decodes `path` by content sniffing and applies its EXIF orientation, so
/// height and width are those of the image as displayed.
fn decode_oriented(path: &Path) -> ImageResult<DynamicImage> {
    let mut decoder = ImageReader::open(path)?.with_guessed_format()?.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut decoded = DynamicImage::from_decoder(decoder)?;
    decoded.apply_orientation(orientation);
    Ok(decoded)
}

/// Reads and decodes `path`, returning the padded batch and its crop region.
pub fn load_image(path: impl AsRef<Path>, align: usize) -> Result<(Array4<f32>, CropRegion), LoadError> {
    let path = path.as_ref();
    let decoded = decode_oriented(path).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = decoded.to_rgb8();
    debug!(
        path = %path.display(),
        width = rgb.width(),
        height = rgb.height(),
        align,
        "decoded image"
    );

    let batch = rgb_to_batch(&rgb);
    let (padded, region) = pad_batch(batch.view(), align)?;
    Ok((padded, region))
}

pub fn load_image_with(path: impl AsRef<Path>, config: &LoadConfig) -> Result<(Array4<f32>, CropRegion), LoadError> {
    load_image(path, config.align)
}
