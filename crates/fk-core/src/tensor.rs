use ndarray::{Array4, ArrayBase, ArrayView4, Data, Ix4};

use crate::Error;

/// A batch of images, `B x C x H x W` or `B x H x W x C` depending on context.
pub type ImageBatch = Array4<f32>;

/// A batch of flow fields, `B x 2 x H x W` with channels `(dx, dy)`.
pub type FlowField = Array4<f32>;

/// Named extents of a 4D batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub batch: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Dims {
    /// Reads extents from a channels-first array.
    pub fn nchw<S: Data<Elem = f32>>(a: &ArrayBase<S, Ix4>) -> Self {
        let (batch, channels, height, width) = a.dim();
        Self {
            batch,
            channels,
            height,
            width,
        }
    }

    /// Reads extents from a channels-last array.
    pub fn nhwc<S: Data<Elem = f32>>(a: &ArrayBase<S, Ix4>) -> Self {
        let (batch, height, width, channels) = a.dim();
        Self {
            batch,
            channels,
            height,
            width,
        }
    }

    pub fn to_nchw(self) -> [usize; 4] {
        [self.batch, self.channels, self.height, self.width]
    }

    pub fn spatial(self) -> (usize, usize) {
        (self.height, self.width)
    }
}

pub fn nhwc_to_nchw(batch: ArrayView4<'_, f32>) -> Array4<f32> {
    batch.permuted_axes([0, 3, 1, 2]).as_standard_layout().into_owned()
}

pub fn nchw_to_nhwc(batch: ArrayView4<'_, f32>) -> Array4<f32> {
    batch.permuted_axes([0, 2, 3, 1]).as_standard_layout().into_owned()
}

/// Checks that `flow` is a `(dx, dy)` field covering every pixel of `image`.
pub fn ensure_flow_matches(image: Dims, flow: Dims) -> Result<(), Error> {
    let expected = [image.batch, 2, image.height, image.width];
    if flow.to_nchw() != expected {
        return Err(Error::ShapeMismatch {
            what: "flow",
            expected,
            actual: flow.to_nchw(),
        });
    }
    Ok(())
}

/// Checks that `other` shares batch size and spatial extent with `reference`.
/// Channel counts may differ.
pub fn ensure_same_spatial(what: &'static str, reference: Dims, other: Dims) -> Result<(), Error> {
    let expected = [
        reference.batch,
        other.channels,
        reference.height,
        reference.width,
    ];
    if other.to_nchw() != expected {
        return Err(Error::ShapeMismatch {
            what,
            expected,
            actual: other.to_nchw(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::{Dims, ensure_flow_matches, ensure_same_spatial, nchw_to_nhwc, nhwc_to_nchw};
    use crate::Error;

    #[test]
    fn layout_conversion_moves_channels() {
        let nhwc = Array4::from_shape_fn((2, 3, 4, 5), |(b, y, x, c)| {
            (b * 1000 + y * 100 + x * 10 + c) as f32
        });

        let nchw = nhwc_to_nchw(nhwc.view());
        assert_eq!(nchw.dim(), (2, 5, 3, 4));
        assert_eq!(nchw[[1, 4, 2, 3]], nhwc[[1, 2, 3, 4]]);
        assert!(nchw.is_standard_layout());

        let back = nchw_to_nhwc(nchw.view());
        assert_eq!(back, nhwc);
    }

    #[test]
    fn dims_read_both_layouts() {
        let a = Array4::<f32>::zeros((1, 3, 8, 6));
        assert_eq!(Dims::nchw(&a).spatial(), (8, 6));
        assert_eq!(Dims::nhwc(&a).channels, 6);
        assert_eq!(Dims::nhwc(&a).spatial(), (3, 8));
    }

    #[test]
    fn flow_shape_is_validated() {
        let image = Dims::nchw(&Array4::<f32>::zeros((2, 3, 4, 4)));
        let good = Dims::nchw(&Array4::<f32>::zeros((2, 2, 4, 4)));
        let bad = Dims::nchw(&Array4::<f32>::zeros((2, 2, 4, 5)));

        assert!(ensure_flow_matches(image, good).is_ok());
        let err = ensure_flow_matches(image, bad).expect_err("width differs");
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                what: "flow",
                expected: [2, 2, 4, 4],
                actual: [2, 2, 4, 5],
            }
        ));
    }

    #[test]
    fn spatial_check_ignores_channels() {
        let a = Dims::nchw(&Array4::<f32>::zeros((1, 3, 4, 4)));
        let b = Dims::nchw(&Array4::<f32>::zeros((1, 7, 4, 4)));
        let c = Dims::nchw(&Array4::<f32>::zeros((2, 7, 4, 4)));

        assert!(ensure_same_spatial("features", a, b).is_ok());
        assert!(ensure_same_spatial("features", a, c).is_err());
    }
}
