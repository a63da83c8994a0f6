use ndarray::{Array4, ArrayView4, s};

/// Source index and blend weights for one destination coordinate.
#[derive(Debug, Clone, Copy)]
struct Tap {
    i0: usize,
    i1: usize,
    w0: f32,
    w1: f32,
}

/// Half-pixel-center taps (`align_corners = false`) for resizing an axis of
/// `src_len` samples to `dst_len` samples. Source positions left of the
/// first center are clamped to it.
fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|d| {
            let real = (scale * (d as f32 + 0.5) - 0.5).max(0.0);
            let i0 = (real.floor() as usize).min(src_len - 1);
            let i1 = if i0 < src_len - 1 { i0 + 1 } else { i0 };
            let w1 = (real - i0 as f32).clamp(0.0, 1.0);
            Tap {
                i0,
                i1,
                w0: 1.0 - w1,
                w1,
            }
        })
        .collect()
}

/// Bilinear resize of a channels-first batch to `out_h x out_w`.
pub fn resize_bilinear(src: ArrayView4<'_, f32>, out_h: usize, out_w: usize) -> Array4<f32> {
    let (batch, channels, src_h, src_w) = src.dim();
    let mut dst = Array4::zeros((batch, channels, out_h, out_w));
    if src_h == 0 || src_w == 0 || out_h == 0 || out_w == 0 {
        return dst;
    }

    let rows = taps(src_h, out_h);
    let cols = taps(src_w, out_w);

    for b in 0..batch {
        for c in 0..channels {
            let plane = src.slice(s![b, c, .., ..]);
            let mut out = dst.slice_mut(s![b, c, .., ..]);
            for ((y, x), v) in out.indexed_iter_mut() {
                let r = rows[y];
                let k = cols[x];
                *v = r.w0 * (k.w0 * plane[[r.i0, k.i0]] + k.w1 * plane[[r.i0, k.i1]])
                    + r.w1 * (k.w0 * plane[[r.i1, k.i0]] + k.w1 * plane[[r.i1, k.i1]]);
            }
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::resize_bilinear;

    #[test]
    fn upsample_2x_uses_half_pixel_centers() {
        let src = Array4::from_shape_vec((1, 1, 1, 2), vec![0.0f32, 4.0]).expect("valid shape");
        let dst = resize_bilinear(src.view(), 1, 4);

        // destination centers map to source x = -0.25 (clamped), 0.25, 0.75, 1.25
        let row: Vec<f32> = dst.iter().copied().collect();
        let expected = [0.0f32, 1.0, 3.0, 4.0];
        for (g, e) in row.iter().zip(expected) {
            assert!((g - e).abs() < 1e-6, "{row:?}");
        }
    }

    #[test]
    fn same_size_is_identity() {
        let src = Array4::from_shape_fn((2, 2, 3, 5), |(b, c, y, x)| (b + c * 3 + y * 7 + x) as f32);
        let dst = resize_bilinear(src.view(), 3, 5);
        assert_eq!(dst, src);
    }

    #[test]
    fn constant_plane_stays_constant() {
        let src = Array4::from_elem((1, 2, 3, 3), 2.5f32);
        let dst = resize_bilinear(src.view(), 7, 6);
        assert_eq!(dst.dim(), (1, 2, 7, 6));
        assert!(dst.iter().all(|&v| (v - 2.5).abs() < 1e-6));
    }

    #[test]
    fn downscale_2x_averages_pairs() {
        let src = Array4::from_shape_vec((1, 1, 1, 4), vec![1.0f32, 3.0, 5.0, 7.0]).expect("valid shape");
        let dst = resize_bilinear(src.view(), 1, 2);
        let row: Vec<f32> = dst.iter().copied().collect();
        assert!((row[0] - 2.0).abs() < 1e-6);
        assert!((row[1] - 6.0).abs() < 1e-6);
    }

    #[test]
    fn fractional_scale_follows_interior_ramp() {
        let src = Array4::from_shape_fn((1, 1, 18, 1), |(_, _, y, _)| y as f32);
        let dst = resize_bilinear(src.view(), 37, 1);
        assert_eq!(dst.dim(), (1, 1, 37, 1));

        let scale = 18.0f32 / 37.0;
        for y in 0..37 {
            let real = (scale * (y as f32 + 0.5) - 0.5).clamp(0.0, 17.0);
            assert!((dst[[0, 0, y, 0]] - real).abs() < 1e-4, "row {y}");
        }
    }
}
