use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Activation applied after a layer's affine transform.
///
/// Held by value in a [`Dense`](crate::layers::dense::Dense) layer so any
/// layer can carry either variant indifferently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    ReLU,
    /// Softmax normalizes over the whole matrix as one flat collection, not
    /// per-row or per-column; it is the output-layer activation.
    Softmax,
}

impl Activation {
    /// Applies the activation to `input`, returning a fresh matrix of the
    /// same shape. Pure: the input is never mutated.
    pub fn apply(&self, input: &Matrix) -> Matrix {
        match self {
            Activation::ReLU => relu(input),
            Activation::Softmax => softmax(input),
        }
    }
}

/// Element-wise rectifier: `max(0, x)`.
pub fn relu(input: &Matrix) -> Matrix {
    input.map(|x| if x > 0.0 { x } else { 0.0 })
}

/// Global softmax: `exp(x_i) / sum(exp(x_j))` over every element of `input`.
///
/// Every output element lies in `(0, 1]` and the outputs sum to 1 within
/// floating-point tolerance. No max-subtraction guard is applied before
/// exponentiating, so extremely large inputs can overflow; callers feed
/// normalized pixel data and small intermediate logits.
pub fn softmax(input: &Matrix) -> Matrix {
    let sum: f32 = input.iter().map(|x| x.exp()).sum();
    input.map(|x| x.exp() / sum)
}
