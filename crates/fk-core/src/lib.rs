//! Foundational primitives for FILM-style frame interpolation.
//!
//! ## Tensor Layout
//! Batches are 4D `f32` arrays. The math primitives (pyramids, warping,
//! convolution) use channels-first `B x C x H x W`. Loading and stride
//! padding use channels-last `B x H x W x C`, the layout decoders produce.
//! [`nhwc_to_nchw`] and [`nchw_to_nhwc`] bridge the two.
//!
//! ## Flow Fields
//! A flow field is `B x 2 x H x W` with channel 0 holding the horizontal
//! displacement `dx` and channel 1 the vertical displacement `dy`.
//!
//! ## Border Modes
//! Sampling supports clamp-to-edge and constant fill. Bilinear sampling uses
//! pixel-center coordinates and the floor-based 2x2 neighborhood.

mod border;
mod crop;
mod error;
mod pad;
mod sample;
mod tensor;

pub use border::{BorderMode, map_index};
pub use crop::CropRegion;
pub use error::Error;
pub use pad::{crop_batch, pad_amount, pad_batch};
pub use sample::sample_bilinear;
pub use tensor::{
    Dims, FlowField, ImageBatch, ensure_flow_matches, ensure_same_spatial, nchw_to_nhwc,
    nhwc_to_nchw,
};
