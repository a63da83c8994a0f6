use ndarray::{Array4, Axis, concatenate};

use fk_core::{Dims, Error, ensure_same_spatial};
use fk_warp::warp;

use crate::pyramid::Pyramid;
use crate::resize::resize_bilinear;

fn ensure_level_counts(left: &Pyramid, right: &Pyramid) -> Result<(), Error> {
    if left.num_levels() != right.num_levels() {
        return Err(Error::LevelCountMismatch {
            left: left.num_levels(),
            right: right.num_levels(),
        });
    }
    Ok(())
}

/// Multiplies every level by a per-item scalar.
///
/// `scalar[b]` scales batch item `b` across all channels and pixels. A single
/// scalar applies to every item.
pub fn multiply_pyramid(pyramid: &Pyramid, scalar: &[f32]) -> Result<Pyramid, Error> {
    pyramid
        .iter()
        .map(|level| {
            let batch = level.dim().0;
            if scalar.len() != batch && scalar.len() != 1 {
                return Err(Error::ScalarCount {
                    expected: batch,
                    actual: scalar.len(),
                });
            }

            let mut out = level.clone();
            for (b, mut item) in out.axis_iter_mut(Axis(0)).enumerate() {
                let s = if scalar.len() == 1 { scalar[0] } else { scalar[b] };
                item.mapv_inplace(|v| v * s);
            }
            Ok(out)
        })
        .collect()
}

/// Accumulates a residual flow pyramid into absolute flow at every level.
///
/// Starting from the coarsest residual, the running flow is doubled,
/// bilinearly resized to the next finer level and added to that level's
/// residual. The result is finest-first like the input.
pub fn flow_pyramid_synthesis(residual_pyramid: &Pyramid) -> Result<Pyramid, Error> {
    let Some(coarsest) = residual_pyramid.coarsest() else {
        return Err(Error::EmptyPyramid);
    };

    let mut flow = coarsest.clone();
    let mut flows = Vec::with_capacity(residual_pyramid.num_levels());
    let finer = &residual_pyramid.levels()[..residual_pyramid.num_levels() - 1];

    for residual in finer.iter().rev() {
        let current = Dims::nchw(&flow);
        let target = Dims::nchw(residual);
        let expected = [current.batch, current.channels, target.height, target.width];
        if target.to_nchw() != expected {
            return Err(Error::ShapeMismatch {
                what: "residual flow",
                expected,
                actual: target.to_nchw(),
            });
        }

        let doubled = &flow * 2.0;
        let mut upsampled = resize_bilinear(doubled.view(), target.height, target.width);
        upsampled += residual;
        flows.push(std::mem::replace(&mut flow, upsampled));
    }
    flows.push(flow);
    flows.reverse();

    Ok(Pyramid::from_levels(flows))
}

/// Warps each feature level by the flow of the same level.
pub fn pyramid_warp(feature_pyramid: &Pyramid, flow_pyramid: &Pyramid) -> Result<Pyramid, Error> {
    ensure_level_counts(feature_pyramid, flow_pyramid)?;
    feature_pyramid
        .iter()
        .zip(flow_pyramid.iter())
        .map(|(features, flow)| warp(features.view(), flow.view()))
        .collect()
}

/// Concatenates matching levels along the channel axis, `pyramid1` first.
pub fn concatenate_pyramids(pyramid1: &Pyramid, pyramid2: &Pyramid) -> Result<Pyramid, Error> {
    ensure_level_counts(pyramid1, pyramid2)?;
    pyramid1
        .iter()
        .zip(pyramid2.iter())
        .map(|(a, b)| -> Result<Array4<f32>, Error> {
            ensure_same_spatial("pyramid level", Dims::nchw(a), Dims::nchw(b))?;
            Ok(concatenate(Axis(1), &[a.view(), b.view()])?)
        })
        .collect()
}
