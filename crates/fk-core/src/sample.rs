use ndarray::ArrayView2;

use crate::border::{BorderMode, map_index};

/// Bilinear lookup in a single `H x W` plane at pixel-center coordinates.
///
/// `x` indexes columns and `y` rows. Neighbors outside the plane are resolved
/// through `border`.
pub fn sample_bilinear(plane: &ArrayView2<'_, f32>, x: f32, y: f32, border: &BorderMode<f32>) -> f32 {
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let x1 = x0.saturating_add(1);
    let y1 = y0.saturating_add(1);

    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = sample_at(plane, x0, y0, border);
    let p10 = sample_at(plane, x1, y0, border);
    let p01 = sample_at(plane, x0, y1, border);
    let p11 = sample_at(plane, x1, y1, border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

#[inline]
fn sample_at(plane: &ArrayView2<'_, f32>, x: isize, y: isize, border: &BorderMode<f32>) -> f32 {
    let (height, width) = plane.dim();
    match (map_index(x, width, border), map_index(y, height, border)) {
        (Some(xi), Some(yi)) => plane[[yi, xi]],
        _ => match border {
            BorderMode::Constant(c) => *c,
            BorderMode::Clamp => 0.0,
        },
    }
}
