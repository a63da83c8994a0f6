//! Loading image files into padded, normalized batches.
//!
//! Decoded pixels are returned channels-last as a `1 x H x W x 3` batch of
//! `f32` in `[0, 1]`, channel order R, G, B, zero-padded to the requested
//! alignment. The accompanying [`CropRegion`](fk_core::CropRegion) recovers
//! the original frame.

mod error;
mod load;

pub use error::LoadError;
pub use load::{DEFAULT_ALIGN, LoadConfig, load_image, load_image_with, rgb_to_batch};
