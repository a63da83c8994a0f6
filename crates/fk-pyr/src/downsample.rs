use ndarray::{Array4, ArrayView2, ArrayView4, ArrayViewMut2, s};

#[inline]
fn dst_dims(src_h: usize, src_w: usize) -> (usize, usize) {
    (src_h / 2, src_w / 2)
}

/// 2x2 stride-2 mean pooling of a channels-first batch.
pub fn downsample2x2_mean(src: ArrayView4<'_, f32>) -> Array4<f32> {
    let (batch, channels, src_h, src_w) = src.dim();
    let (dst_h, dst_w) = dst_dims(src_h, src_w);
    let mut dst = Array4::zeros((batch, channels, dst_h, dst_w));

    if dst_h == 0 || dst_w == 0 {
        return dst;
    }

    for b in 0..batch {
        for c in 0..channels {
            downsample_plane(
                src.slice(s![b, c, .., ..]),
                dst.slice_mut(s![b, c, .., ..]),
            );
        }
    }
    dst
}

fn downsample_plane(src: ArrayView2<'_, f32>, mut dst: ArrayViewMut2<'_, f32>) {
    let (dst_h, dst_w) = dst.dim();
    let src_w = src.ncols();

    if src_w.is_multiple_of(2)
        && src.nrows().is_multiple_of(2)
        && let Some(src_contig) = src.as_slice()
        && let Some(dst_contig) = dst.as_slice_mut()
    {
        downsample_contiguous_even(src_contig, src_w, dst_contig, dst_w, dst_h);
        return;
    }

    downsample_fallback(&src, &mut dst);
}

fn downsample_contiguous_even(src: &[f32], src_w: usize, dst: &mut [f32], dst_w: usize, dst_h: usize) {
    for (y, dst_row) in dst.chunks_exact_mut(dst_w).take(dst_h).enumerate() {
        let src_row0 = &src[(2 * y) * src_w..(2 * y + 1) * src_w];
        let src_row1 = &src[(2 * y + 1) * src_w..(2 * y + 2) * src_w];
        for (x, out) in dst_row.iter_mut().enumerate() {
            let sx = 2 * x;
            *out = (src_row0[sx] + src_row0[sx + 1] + src_row1[sx] + src_row1[sx + 1]) * 0.25;
        }
    }
}

fn downsample_fallback(src: &ArrayView2<'_, f32>, dst: &mut ArrayViewMut2<'_, f32>) {
    for ((y, x), out) in dst.indexed_iter_mut() {
        let (sy, sx) = (2 * y, 2 * x);
        *out = (src[[sy, sx]] + src[[sy, sx + 1]] + src[[sy + 1, sx]] + src[[sy + 1, sx + 1]]) * 0.25;
    }
}
