use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::error::{MlpError, Result};
use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// A classified digit: the most probable class and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Digit {
    /// Class index in `[0, output_size)`.
    pub value: usize,
    /// Softmax probability assigned to `value`.
    pub probability: f32,
}

/// A feed-forward network of dense layers built against a [`Topology`].
///
/// ReLU activates every layer except the last, which uses softmax. The
/// network holds no mutable state: `classify` is a pure function of the
/// stored parameters and its input, so one instance can serve any number of
/// independent calls (or threads) without interference.
pub struct Network {
    layers: Vec<Dense>,
    image_dims: (usize, usize),
}

impl Network {
    /// Builds the network from per-layer `(weights, bias)` pairs.
    ///
    /// Every matrix is validated against the topology before any layer is
    /// built; a mismatched shape fails construction with a size error, so a
    /// successfully constructed network can never trip an internal dimension
    /// check during inference.
    pub fn new(topology: &Topology, parameters: Vec<(Matrix, Matrix)>) -> Result<Network> {
        if parameters.len() != topology.len() {
            return Err(MlpError::DimensionMismatch {
                expected: format!("{} (weights, bias) pairs", topology.len()),
                actual: format!("{}", parameters.len()),
            });
        }

        let last = topology.len() - 1;
        let mut layers = Vec::with_capacity(topology.len());
        for (i, ((weights, bias), &(out, input))) in
            parameters.into_iter().zip(topology.layers()).enumerate()
        {
            if weights.rows() != out || weights.cols() != input {
                return Err(MlpError::DimensionMismatch {
                    expected: format!("{}x{} weights for layer {}", out, input, i),
                    actual: format!("{}x{}", weights.rows(), weights.cols()),
                });
            }
            if bias.rows() != out || bias.cols() != 1 {
                return Err(MlpError::DimensionMismatch {
                    expected: format!("{}x1 bias for layer {}", out, i),
                    actual: format!("{}x{}", bias.rows(), bias.cols()),
                });
            }
            let activation = if i == last { Activation::Softmax } else { Activation::ReLU };
            layers.push(Dense::new(weights, bias, activation)?);
        }

        Ok(Network {
            layers,
            image_dims: topology.image_dims(),
        })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Classifies an image: flattens it row-major into a column vector,
    /// feeds it through the layers in order, and returns the class with the
    /// highest probability. Ties go to the lowest index (strictly-greater
    /// scan from index 0).
    pub fn classify(&self, image: &Matrix) -> Result<Digit> {
        if (image.rows(), image.cols()) != self.image_dims {
            return Err(MlpError::DimensionMismatch {
                expected: format!("{}x{} image", self.image_dims.0, self.image_dims.1),
                actual: format!("{}x{}", image.rows(), image.cols()),
            });
        }

        let mut current = image.clone().flatten();
        for layer in &self.layers {
            current = layer.apply(&current)?;
        }

        Ok(argmax(&current))
    }
}

/// Reduces a probability column to its most probable entry, first index
/// winning ties.
fn argmax(output: &Matrix) -> Digit {
    let mut best = Digit { value: 0, probability: output.as_slice()[0] };
    for (i, &p) in output.iter().enumerate().skip(1) {
        if p > best.probability {
            best = Digit { value: i, probability: p };
        }
    }
    best
}
