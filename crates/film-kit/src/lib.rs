//! Umbrella crate for the `film-kit` workspace.
//!
//! Re-exports the pyramid, warping, loading and layer primitives a FILM-style
//! frame interpolator is assembled from.

pub use fk_core::*;
pub use fk_io::*;
pub use fk_nn::*;
pub use fk_pyr::*;
pub use fk_warp::*;
