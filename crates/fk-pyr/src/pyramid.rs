use ndarray::{Array4, ArrayView4};
use tracing::trace;

use fk_core::Error;

use crate::downsample::downsample2x2_mean;

/// Ordered multi-resolution stack of channels-first batches, finest first.
///
/// Holds image pyramids built by [`build_image_pyramid`] as well as flow,
/// residual and feature pyramids produced elsewhere; no size relation
/// between levels is enforced on construction.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pyramid {
    levels: Vec<Array4<f32>>,
}

impl Pyramid {
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    pub fn from_levels(levels: Vec<Array4<f32>>) -> Self {
        Self { levels }
    }

    pub fn level(&self, i: usize) -> Option<&Array4<f32>> {
        self.levels.get(i)
    }

    pub fn levels(&self) -> &[Array4<f32>] {
        &self.levels
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Lowest-resolution level.
    pub fn coarsest(&self) -> Option<&Array4<f32>> {
        self.levels.last()
    }

    pub fn push(&mut self, level: Array4<f32>) {
        self.levels.push(level);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Array4<f32>> {
        self.levels.iter()
    }

    pub fn into_levels(self) -> Vec<Array4<f32>> {
        self.levels
    }

    /// `(height, width)` of each level.
    pub fn level_sizes(&self) -> Vec<(usize, usize)> {
        self.levels
            .iter()
            .map(|l| {
                let (_, _, h, w) = l.dim();
                (h, w)
            })
            .collect()
    }
}

impl FromIterator<Array4<f32>> for Pyramid {
    fn from_iter<I: IntoIterator<Item = Array4<f32>>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Pyramid {
    type Item = Array4<f32>;
    type IntoIter = std::vec::IntoIter<Array4<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.into_iter()
    }
}

impl<'a> IntoIterator for &'a Pyramid {
    type Item = &'a Array4<f32>;
    type IntoIter = std::slice::Iter<'a, Array4<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

/// Pyramid depth used by the interpolator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidConfig {
    pub levels: usize,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self { levels: 3 }
    }
}

/// Builds an image pyramid of exactly `levels` levels.
///
/// Level 0 is a copy of `image`; each next level is a 2x2 mean downsample
/// of the previous one. Fails if a level would end up with zero rows or
/// columns.
pub fn build_image_pyramid(image: ArrayView4<'_, f32>, levels: usize) -> Result<Pyramid, Error> {
    let mut pyramid = Pyramid::new();
    if levels == 0 {
        return Ok(pyramid);
    }

    let mut current = image.to_owned();
    for level in 0..levels {
        let (_, _, height, width) = current.dim();
        if height == 0 || width == 0 {
            return Err(Error::LevelTooSmall {
                level,
                height,
                width,
            });
        }
        trace!(level, height, width, "pyramid level");

        if level + 1 == levels {
            pyramid.push(current);
            break;
        }
        let next = downsample2x2_mean(current.view());
        pyramid.push(std::mem::replace(&mut current, next));
    }

    Ok(pyramid)
}
