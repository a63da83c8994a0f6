use ndarray::{Array4, ArrayView4, s};

use crate::{CropRegion, Error};

/// Extra pixels needed to bring `len` up to a multiple of `align`.
///
/// An `align` of zero means no alignment and yields zero.
#[inline]
pub fn pad_amount(len: usize, align: usize) -> usize {
    if align == 0 || len.is_multiple_of(align) {
        0
    } else {
        align - len % align
    }
}

/// Zero-pads a channels-last batch so height and width are multiples of
/// `align`.
///
/// Padding is split evenly; an odd extra pixel goes to the bottom/right.
/// The returned region selects the original pixels inside the padded batch.
pub fn pad_batch(batch: ArrayView4<'_, f32>, align: usize) -> Result<(Array4<f32>, CropRegion), Error> {
    if align == 0 {
        return Err(Error::InvalidAlign);
    }

    let (n, height, width, channels) = batch.dim();
    let pad_h = pad_amount(height, align);
    let pad_w = pad_amount(width, align);
    let top = pad_h >> 1;
    let left = pad_w >> 1;

    let region = CropRegion::new(top, left, height + top, width + left);

    let mut out = Array4::zeros((n, height + pad_h, width + pad_w, channels));
    out.slice_mut(s![.., top..region.bottom, left..region.right, ..])
        .assign(&batch);

    Ok((out, region))
}

/// Cuts `region` out of a channels-last batch, undoing [`pad_batch`].
pub fn crop_batch(batch: ArrayView4<'_, f32>, region: CropRegion) -> Result<Array4<f32>, Error> {
    let (_, height, width, _) = batch.dim();
    if !region.fits(height, width) {
        return Err(Error::OutOfBounds {
            region: region.to_array(),
            height,
            width,
        });
    }

    Ok(batch
        .slice(s![.., region.top..region.bottom, region.left..region.right, ..])
        .to_owned())
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::{crop_batch, pad_amount, pad_batch};
    use crate::{CropRegion, Error};

    fn ramp(h: usize, w: usize, c: usize) -> Array4<f32> {
        Array4::from_shape_fn((1, h, w, c), |(_, y, x, ch)| 1.0 + (y * w + x) as f32 + ch as f32 * 0.5)
    }

    #[test]
    fn pad_amount_rounds_up_to_alignment() {
        assert_eq!(pad_amount(64, 64), 0);
        assert_eq!(pad_amount(65, 64), 63);
        assert_eq!(pad_amount(5, 4), 3);
        assert_eq!(pad_amount(0, 8), 0);
        assert_eq!(pad_amount(7, 0), 0);
    }

    #[test]
    fn odd_padding_goes_bottom_right() {
        let src = ramp(5, 6, 3);
        let (padded, region) = pad_batch(src.view(), 4).expect("valid align");

        // height 5 -> 8 (3 extra: 1 top, 2 bottom); width 6 -> 8 (1 left, 1 right)
        assert_eq!(padded.dim(), (1, 8, 8, 3));
        assert_eq!(region, CropRegion::new(1, 1, 6, 7));

        assert_eq!(padded[[0, 0, 3, 0]], 0.0);
        assert_eq!(padded[[0, 6, 3, 0]], 0.0);
        assert_eq!(padded[[0, 7, 3, 0]], 0.0);
        assert_eq!(padded[[0, 3, 0, 2]], 0.0);
        assert_eq!(padded[[0, 3, 7, 2]], 0.0);
        assert_eq!(padded[[0, 1, 1, 0]], src[[0, 0, 0, 0]]);
    }

    #[test]
    fn crop_recovers_original() {
        for &(h, w, align) in &[(5usize, 6usize, 4usize), (17, 33, 16), (64, 64, 64), (1, 1, 64)] {
            let src = ramp(h, w, 2);
            let (padded, region) = pad_batch(src.view(), align).expect("valid align");
            let (_, ph, pw, _) = padded.dim();

            assert_eq!(ph % align, 0);
            assert_eq!(pw % align, 0);
            assert!(ph >= h && ph < h + align);
            assert!(pw >= w && pw < w + align);

            let cropped = crop_batch(padded.view(), region).expect("region fits");
            assert_eq!(cropped, src);
        }
    }

    #[test]
    fn aligned_input_is_untouched() {
        let src = ramp(8, 8, 1);
        let (padded, region) = pad_batch(src.view(), 8).expect("valid align");
        assert_eq!(padded, src);
        assert_eq!(region, CropRegion::new(0, 0, 8, 8));
    }

    #[test]
    fn zero_align_is_rejected() {
        let src = ramp(2, 2, 1);
        assert!(matches!(pad_batch(src.view(), 0), Err(Error::InvalidAlign)));
    }

    #[test]
    fn crop_outside_batch_is_rejected() {
        let src = ramp(4, 4, 1);
        let err = crop_batch(src.view(), CropRegion::new(0, 0, 5, 4)).expect_err("too tall");
        assert!(matches!(err, Error::OutOfBounds { height: 4, width: 4, .. }));
    }
}
