use crate::activation::activation::Activation;
use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;

/// A fully-connected layer: `activation(weights * x + bias)`.
///
/// Immutable after construction and stateless across applications; the layer
/// is purely a function of its stored parameters and its input.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Matrix,
    bias: Matrix,
    activation: Activation,
}

impl Dense {
    /// Binds a weight matrix (`out x in`), a bias column (`out x 1`), and an
    /// activation.
    ///
    /// Fails with a dimension mismatch if the bias is not a column vector
    /// with one row per weight row.
    pub fn new(weights: Matrix, bias: Matrix, activation: Activation) -> Result<Dense> {
        if bias.rows() != weights.rows() || bias.cols() != 1 {
            return Err(MlpError::DimensionMismatch {
                expected: format!("{}x1 bias", weights.rows()),
                actual: format!("{}x{}", bias.rows(), bias.cols()),
            });
        }
        Ok(Dense { weights, bias, activation })
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &Matrix {
        &self.bias
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Output size of this layer (rows of the weight matrix).
    pub fn output_size(&self) -> usize {
        self.weights.rows()
    }

    /// Expected input size (columns of the weight matrix).
    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    /// Applies the layer to a column vector, returning a fresh column vector.
    ///
    /// An input whose row count does not equal the weight matrix's column
    /// count surfaces the underlying matmul dimension mismatch.
    pub fn apply(&self, input: &Matrix) -> Result<Matrix> {
        let z = self.weights.matmul(input)?.add(&self.bias)?;
        Ok(self.activation.apply(&z))
    }
}
