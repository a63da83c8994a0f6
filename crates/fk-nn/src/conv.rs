use std::ops::Range;

use ndarray::{Array1, Array4, ArrayView4, s};
use rand::Rng;

use fk_core::{Dims, Error};

use crate::activation::Activation;

fn validate_positive(value: usize, what: &'static str) -> Result<(), Error> {
    if value == 0 {
        return Err(Error::NonPositive { what });
    }
    Ok(())
}

/// Output rows (or columns) whose tap at `offset` stays inside `0..len`.
#[inline]
fn valid_range(len: usize, offset: isize) -> Range<usize> {
    let lo = (-offset).max(0) as usize;
    let hi = (len as isize - offset).clamp(0, len as isize) as usize;
    lo.min(hi)..hi
}

/// Stride-1 2D convolution with "same" zero padding and a bias.
///
/// Weights are laid out `out x in x k x k` and applied as a
/// cross-correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2d {
    weight: Array4<f32>,
    bias: Array1<f32>,
}

impl Conv2d {
    /// Randomly initialized layer; weights and bias are uniform in
    /// `±1/sqrt(in_channels * size * size)`.
    pub fn with_rng<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, Error> {
        validate_positive(in_channels, "in_channels")?;
        validate_positive(out_channels, "out_channels")?;
        validate_positive(size, "kernel size")?;

        let fan_in = in_channels * size * size;
        let bound = 1.0 / (fan_in as f32).sqrt();
        let weight = Array4::from_shape_simple_fn((out_channels, in_channels, size, size), || {
            rng.random_range(-bound..bound)
        });
        let bias = Array1::from_shape_simple_fn(out_channels, || rng.random_range(-bound..bound));

        Ok(Self { weight, bias })
    }

    /// Layer with trained parameters: `weight` is `out x in x k x k`, `bias`
    /// has one entry per output channel.
    pub fn from_weights(weight: Array4<f32>, bias: Array1<f32>) -> Result<Self, Error> {
        let (out_channels, in_channels, kh, kw) = weight.dim();
        validate_positive(in_channels, "in_channels")?;
        validate_positive(out_channels, "out_channels")?;
        validate_positive(kh, "kernel size")?;
        if kh != kw || bias.len() != out_channels {
            return Err(Error::ShapeMismatch {
                what: "conv weight",
                expected: [bias.len(), in_channels, kh, kh],
                actual: [out_channels, in_channels, kh, kw],
            });
        }
        Ok(Self { weight, bias })
    }

    pub fn in_channels(&self) -> usize {
        self.weight.dim().1
    }

    pub fn out_channels(&self) -> usize {
        self.weight.dim().0
    }

    pub fn kernel_size(&self) -> usize {
        self.weight.dim().2
    }

    pub fn weight(&self) -> &Array4<f32> {
        &self.weight
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// Convolves a channels-first batch; height and width are preserved.
    pub fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Array4<f32>, Error> {
        let dims = Dims::nchw(&input);
        if dims.channels != self.in_channels() {
            return Err(Error::ShapeMismatch {
                what: "conv input",
                expected: [dims.batch, self.in_channels(), dims.height, dims.width],
                actual: dims.to_nchw(),
            });
        }

        let k = self.kernel_size();
        let before = ((k - 1) / 2) as isize;
        let (height, width) = dims.spatial();
        let mut out = Array4::zeros((dims.batch, self.out_channels(), height, width));

        for b in 0..dims.batch {
            for o in 0..self.out_channels() {
                let mut plane = out.slice_mut(s![b, o, .., ..]);
                plane.fill(self.bias[o]);

                for i in 0..self.in_channels() {
                    let src = input.slice(s![b, i, .., ..]);
                    for ky in 0..k {
                        let dy = ky as isize - before;
                        let rows = valid_range(height, dy);
                        for kx in 0..k {
                            let dx = kx as isize - before;
                            let cols = valid_range(width, dx);
                            let wv = self.weight[[o, i, ky, kx]];
                            for y in rows.clone() {
                                let sy = (y as isize + dy) as usize;
                                for x in cols.clone() {
                                    let sx = (x as isize + dx) as usize;
                                    plane[[y, x]] += wv * src[[sy, sx]];
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(out)
    }
}

/// A convolution optionally followed by an activation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvBlock {
    pub conv: Conv2d,
    pub activation: Option<Activation>,
}

impl ConvBlock {
    pub fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Array4<f32>, Error> {
        let mut out = self.conv.forward(input)?;
        if let Some(act) = self.activation {
            act.apply_inplace(&mut out);
        }
        Ok(out)
    }
}

/// Builds a same-padded convolution of `size x size`, followed by the leaky
/// rectifier when `activation` is set.
pub fn conv(
    in_channels: usize,
    out_channels: usize,
    size: usize,
    activation: Option<Activation>,
) -> Result<ConvBlock, Error> {
    conv_with_rng(in_channels, out_channels, size, activation, &mut rand::rng())
}

pub fn conv_with_rng<R: Rng + ?Sized>(
    in_channels: usize,
    out_channels: usize,
    size: usize,
    activation: Option<Activation>,
    rng: &mut R,
) -> Result<ConvBlock, Error> {
    Ok(ConvBlock {
        conv: Conv2d::with_rng(in_channels, out_channels, size, rng)?,
        activation,
    })
}
