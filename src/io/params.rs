//! Binary parameter loading.
//!
//! Weight, bias, and raw image files are flat, headerless sequences of
//! little-endian IEEE-754 f32 values in row-major order. A file is valid for
//! a matrix only when its byte length equals exactly `rows * cols * 4`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// Fills a pre-shaped matrix from a binary file.
///
/// Fails with an I/O error if the path cannot be opened and with a file-size
/// error if the file's length is not exactly the matrix's byte size. The
/// destination is left untouched on failure.
pub fn read_matrix<P: AsRef<Path>>(path: P, matrix: &mut Matrix) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    matrix.read_from(&mut reader)
}

/// Loads every `(weights, bias)` pair for `topology` from parallel path
/// lists, each matrix allocated at its topology shape before reading.
///
/// Path counts must match the layer count; the first failed file aborts the
/// whole load with a [`MlpError::Parameter`] naming the 1-based layer and
/// the offending path.
pub fn load_parameters<P: AsRef<Path>>(
    topology: &Topology,
    weight_paths: &[P],
    bias_paths: &[P],
) -> Result<Vec<(Matrix, Matrix)>> {
    if weight_paths.len() != topology.len() || bias_paths.len() != topology.len() {
        return Err(MlpError::DimensionMismatch {
            expected: format!("{} weight and {} bias paths", topology.len(), topology.len()),
            actual: format!("{} and {}", weight_paths.len(), bias_paths.len()),
        });
    }

    let mut parameters = Vec::with_capacity(topology.len());
    for (i, &(out, input)) in topology.layers().iter().enumerate() {
        let mut weights = Matrix::zeros(out, input)?;
        read_matrix(&weight_paths[i], &mut weights)
            .map_err(|e| layer_error(i + 1, &weight_paths[i], e))?;

        let mut bias = Matrix::zeros(out, 1)?;
        read_matrix(&bias_paths[i], &mut bias)
            .map_err(|e| layer_error(i + 1, &bias_paths[i], e))?;

        parameters.push((weights, bias));
    }
    Ok(parameters)
}

fn layer_error<P: AsRef<Path>>(layer: usize, path: &P, source: MlpError) -> MlpError {
    MlpError::Parameter {
        layer,
        path: path.as_ref().display().to_string(),
        source: Box::new(source),
    }
}
