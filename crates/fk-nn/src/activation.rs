use std::fmt;
use std::str::FromStr;

use ndarray::Array4;

use fk_core::Error;

/// Negative-side slope of the rectifier used after convolutions.
pub const LEAKY_RELU_SLOPE: f32 = 0.2;

/// Nonlinearity applied after a convolution.
///
/// The model configuration names it `"relu"`; the layer is a leaky
/// rectifier with slope [`LEAKY_RELU_SLOPE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    LeakyRelu,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::LeakyRelu => {
                if x >= 0.0 {
                    x
                } else {
                    x * LEAKY_RELU_SLOPE
                }
            }
        }
    }

    pub fn apply_inplace(self, batch: &mut Array4<f32>) {
        batch.mapv_inplace(|v| self.apply(v));
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relu" => Ok(Self::LeakyRelu),
            other => Err(Error::UnknownActivation(other.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeakyRelu => write!(f, "relu"),
        }
    }
}
