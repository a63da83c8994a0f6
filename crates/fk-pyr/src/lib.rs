//! Image and flow pyramids for coarse-to-fine frame interpolation.
//!
//! Pyramids are ordered finest-first: level 0 is the input resolution and
//! each following level halves height and width.
//!
//! Drop-odd policy:
//! - [`downsample2x2_mean`] output size is `(h / 2, w / 2)`.
//! - If source height or width is odd, the last row/column is dropped.
//!
//! Representational meaning:
//! - Each destination pixel is the arithmetic mean of one 2x2 source block.
//! - A flow pyramid stores absolute flow in the pixel units of its own level;
//!   moving one level finer doubles the magnitude.

mod downsample;
mod ops;
mod pyramid;
mod resize;

pub use downsample::downsample2x2_mean;
pub use ops::{concatenate_pyramids, flow_pyramid_synthesis, multiply_pyramid, pyramid_warp};
pub use pyramid::{Pyramid, PyramidConfig, build_image_pyramid};
pub use resize::resize_bilinear;
