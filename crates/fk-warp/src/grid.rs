use ndarray::{Array4, ArrayView4};

use fk_core::{Dims, Error};

/// `steps` evenly spaced values from `start` to `end` inclusive.
///
/// The first half is stepped forward from `start` and the second half
/// backward from `end`, so both endpoints are exact and the sequence is
/// symmetric around the midpoint.
pub fn linspace(start: f32, end: f32, steps: usize) -> Vec<f32> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f32;
            let halfway = steps / 2;
            (0..steps)
                .map(|i| {
                    if i < halfway {
                        start + step * i as f32
                    } else {
                        end - step * (steps - i - 1) as f32
                    }
                })
                .collect()
        }
    }
}

/// Maps a normalized coordinate to a pixel-center coordinate along an axis
/// of `size` pixels.
#[inline]
pub fn unnormalize(coord: f32, size: usize) -> f32 {
    ((coord + 1.0) * size as f32 - 1.0) / 2.0
}

/// Builds the normalized sampling grid for a backward warp.
///
/// The result is `B x H x W x 2` with `[.., 0]` the horizontal and `[.., 1]`
/// the vertical normalized source coordinate. The flow is flipped to
/// `(dy, dx)` and negated, scaled by half the axis length, and subtracted
/// from the identity grid, which lands each output pixel on
/// `(x + dx, y + dy)` once unnormalized.
pub fn sampling_grid(flow: ArrayView4<'_, f32>) -> Result<Array4<f32>, Error> {
    let dims = Dims::nchw(&flow);
    if dims.channels != 2 {
        return Err(Error::ShapeMismatch {
            what: "flow",
            expected: [dims.batch, 2, dims.height, dims.width],
            actual: dims.to_nchw(),
        });
    }

    let (height, width) = dims.spatial();
    let ls_x = (1.0 - 1.0 / width as f64) as f32;
    let ls_y = (1.0 - 1.0 / height as f64) as f32;
    let xs = linspace(-ls_x, ls_x, width);
    let ys = linspace(-ls_y, ls_y, height);

    let half_h = height as f32 * 0.5;
    let half_w = width as f32 * 0.5;

    Ok(Array4::from_shape_fn(
        (dims.batch, height, width, 2),
        |(b, y, x, axis)| {
            // flipped and negated: channel 0 holds -dy, channel 1 holds -dx
            if axis == 0 {
                let f1 = -flow[[b, 0, y, x]];
                xs[x] - f1 / half_w
            } else {
                let f0 = -flow[[b, 1, y, x]];
                ys[y] - f0 / half_h
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::{linspace, sampling_grid, unnormalize};

    #[test]
    fn linspace_endpoints_and_midpoint() {
        assert_eq!(linspace(-1.0, 1.0, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(0.25, 3.0, 1), vec![0.25]);
        assert!(linspace(0.0, 1.0, 0).is_empty());

        let v = linspace(-0.9921875, 0.9921875, 128);
        assert_eq!(v[0], -0.9921875);
        assert_eq!(v[127], 0.9921875);
        for i in 0..64 {
            assert_eq!(v[i], -v[127 - i]);
        }
    }

    #[test]
    fn zero_flow_grid_lands_on_pixel_centers() {
        let flow = Array4::<f32>::zeros((1, 2, 3, 5));
        let grid = sampling_grid(flow.view()).expect("two-channel flow");
        assert_eq!(grid.dim(), (1, 3, 5, 2));

        for y in 0..3 {
            for x in 0..5 {
                let ix = unnormalize(grid[[0, y, x, 0]], 5);
                let iy = unnormalize(grid[[0, y, x, 1]], 3);
                assert!((ix - x as f32).abs() < 1e-5, "x={x} ix={ix}");
                assert!((iy - y as f32).abs() < 1e-5, "y={y} iy={iy}");
            }
        }
    }

    #[test]
    fn flow_offsets_grid_by_pixels() {
        let mut flow = Array4::<f32>::zeros((1, 2, 4, 8));
        flow.index_axis_mut(ndarray::Axis(1), 0).fill(1.5);
        flow.index_axis_mut(ndarray::Axis(1), 1).fill(-2.0);
        let grid = sampling_grid(flow.view()).expect("two-channel flow");

        let ix = unnormalize(grid[[0, 3, 2, 0]], 8);
        let iy = unnormalize(grid[[0, 3, 2, 1]], 4);
        assert!((ix - 3.5).abs() < 1e-5);
        assert!((iy - 1.0).abs() < 1e-5);
    }

    #[test]
    fn single_pixel_axis_maps_to_center() {
        let flow = Array4::<f32>::zeros((1, 2, 1, 1));
        let grid = sampling_grid(flow.view()).expect("two-channel flow");
        assert_eq!(grid[[0, 0, 0, 0]], 0.0);
        assert_eq!(unnormalize(grid[[0, 0, 0, 1]], 1), 0.0);
    }

    #[test]
    fn three_channel_flow_is_rejected() {
        let flow = Array4::<f32>::zeros((1, 3, 2, 2));
        assert!(sampling_grid(flow.view()).is_err());
    }
}
