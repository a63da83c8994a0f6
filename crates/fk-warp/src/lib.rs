//! Backward warping of image batches by dense optical flow.
//!
//! Warping happens in two steps. [`sampling_grid`] turns a `(dx, dy)` flow
//! field into absolute sampling positions in normalized `[-1, 1]` space, and
//! [`grid_sample`] reads the source image bilinearly at those positions.
//!
//! Normalized coordinates follow the half-pixel (`align_corners = false`)
//! convention: `-1` and `1` are the outer edges of the border pixels, not
//! their centers. A column `x` of a `W` wide image sits at
//! `(2x + 1) / W - 1`.

mod grid;
mod warp;

pub use grid::{linspace, sampling_grid, unnormalize};
pub use warp::{grid_sample, warp, warp_with_border};
