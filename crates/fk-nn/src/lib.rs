//! Layer construction helpers for FILM-style models.
//!
//! Kept apart from the numeric crates: nothing in the pyramid or warping
//! code depends on layers, only model assembly does.
//!
//! Convolutions use "same" padding, so a stride-1 layer preserves height and
//! width for any kernel size; for even kernels the extra padding row/column
//! goes to the bottom/right.

mod activation;
mod conv;

pub use activation::{Activation, LEAKY_RELU_SLOPE};
pub use conv::{Conv2d, ConvBlock, conv, conv_with_rng};
