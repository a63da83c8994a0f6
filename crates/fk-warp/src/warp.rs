use ndarray::{Array4, ArrayView4, Axis, s};

use fk_core::{BorderMode, Dims, Error, ensure_flow_matches, sample_bilinear};

use crate::grid::{sampling_grid, unnormalize};

/// Bilinearly samples `image` (`B x C x H x W`) at the normalized positions of
/// `grid` (`B x Ho x Wo x 2`), producing `B x C x Ho x Wo`.
///
/// With [`BorderMode::Clamp`] the unnormalized coordinates are clipped to the
/// image before interpolation, so positions past the edge repeat the border
/// pixels. With [`BorderMode::Constant`] out-of-image neighbors read the fill
/// value, and so do non-finite positions.
pub fn grid_sample(
    image: ArrayView4<'_, f32>,
    grid: ArrayView4<'_, f32>,
    border: BorderMode<f32>,
) -> Result<Array4<f32>, Error> {
    let src = Dims::nchw(&image);
    let (grid_b, out_h, out_w, grid_c) = grid.dim();
    if grid_b != src.batch || grid_c != 2 {
        return Err(Error::ShapeMismatch {
            what: "grid",
            expected: [src.batch, out_h, out_w, 2],
            actual: [grid_b, out_h, out_w, grid_c],
        });
    }

    let (height, width) = src.spatial();
    let mut out = Array4::zeros((src.batch, src.channels, out_h, out_w));

    for (b, coords) in grid.axis_iter(Axis(0)).enumerate() {
        let mut positions = Vec::with_capacity(out_h * out_w);
        for row in coords.outer_iter() {
            for xy in row.outer_iter() {
                let ix = unnormalize(xy[0], width);
                let iy = unnormalize(xy[1], height);
                positions.push(match border {
                    BorderMode::Clamp => (clip(ix, width), clip(iy, height)),
                    BorderMode::Constant(_) => (bound(ix, width), bound(iy, height)),
                });
            }
        }

        for c in 0..src.channels {
            let plane = image.slice(s![b, c, .., ..]);
            let mut dst = out.slice_mut(s![b, c, .., ..]);
            for (v, &(ix, iy)) in dst.iter_mut().zip(positions.iter()) {
                *v = sample_bilinear(&plane, ix, iy, &border);
            }
        }
    }

    Ok(out)
}

/// Backward warps `image` by `flow` with border-clamped extrapolation.
///
/// Output pixel `(y, x)` of item `b` is the bilinear lookup of the source at
/// `(x + flow[b, 0, y, x], y + flow[b, 1, y, x])`.
pub fn warp(image: ArrayView4<'_, f32>, flow: ArrayView4<'_, f32>) -> Result<Array4<f32>, Error> {
    warp_with_border(image, flow, BorderMode::Clamp)
}

pub fn warp_with_border(
    image: ArrayView4<'_, f32>,
    flow: ArrayView4<'_, f32>,
    border: BorderMode<f32>,
) -> Result<Array4<f32>, Error> {
    ensure_flow_matches(Dims::nchw(&image), Dims::nchw(&flow))?;
    let grid = sampling_grid(flow)?;
    grid_sample(image, grid.view(), border)
}

#[inline]
fn clip(coord: f32, size: usize) -> f32 {
    coord.max(0.0).min(size as f32 - 1.0)
}

/// Limits a fill-mode coordinate to `[-2, size + 1]`. Both neighbors of a
/// position at or past either bound are outside the image.
#[inline]
fn bound(coord: f32, size: usize) -> f32 {
    if coord.is_finite() {
        coord.clamp(-2.0, size as f32 + 1.0)
    } else {
        -2.0
    }
}
