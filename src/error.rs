//! Error types for mlp-digits operations.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MlpError>;

/// Main error type for matrix and network operations.
///
/// Three families of failure exist: shape/size errors (mismatched operand
/// dimensions or a zero dimension at construction), out-of-range element
/// access, and format/I-O errors while loading binary parameters or images.
#[derive(Debug)]
pub enum MlpError {
    /// A matrix constructor received a zero dimension.
    InvalidDimensions {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// Operand dimensions are incompatible for the requested operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Element access outside the matrix's valid bounds.
    OutOfRange {
        /// The offending coordinate or flat index
        index: String,
        /// The valid bounds
        bounds: String,
    },

    /// A binary source's byte length does not equal the destination
    /// matrix's expected size. Too short and too long are both rejected.
    InvalidFileSize {
        /// Expected byte count (rows * cols * 4)
        expected: usize,
        /// Actual byte count found
        actual: usize,
    },

    /// A network parameter file failed to load. Wraps the underlying
    /// failure with the layer it belongs to.
    Parameter {
        /// 1-based layer number, matching CLI output
        layer: usize,
        /// Path of the offending file
        path: String,
        /// The underlying size or I/O failure
        source: Box<MlpError>,
    },

    /// Invalid or undecodable content (image bytes, topology JSON).
    Format {
        /// Error description
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),
}

impl fmt::Display for MlpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlpError::InvalidDimensions { rows, cols } => {
                write!(f, "invalid matrix dimensions: {}x{} (both must be at least 1)", rows, cols)
            }
            MlpError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {}, got {}", expected, actual)
            }
            MlpError::OutOfRange { index, bounds } => {
                write!(f, "index out of range: {} (valid bounds: {})", index, bounds)
            }
            MlpError::InvalidFileSize { expected, actual } => {
                write!(f, "invalid file size: expected exactly {} bytes, got {}", expected, actual)
            }
            MlpError::Parameter { layer, path, source } => {
                write!(f, "invalid parameters file for layer {} ('{}'): {}", layer, path, source)
            }
            MlpError::Format { message } => {
                write!(f, "format error: {}", message)
            }
            MlpError::Io(e) => {
                write!(f, "I/O error: {}", e)
            }
        }
    }
}

impl std::error::Error for MlpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MlpError::Io(e) => Some(e),
            MlpError::Parameter { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MlpError {
    fn from(e: std::io::Error) -> Self {
        MlpError::Io(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        let err = MlpError::DimensionMismatch {
            expected: "3x2".to_string(),
            actual: "2x3".to_string(),
        };
        assert!(err.to_string().contains("dimension mismatch"));

        let err = MlpError::InvalidFileSize { expected: 3136, actual: 3135 };
        assert!(err.to_string().contains("3136"));
        assert!(err.to_string().contains("3135"));
    }

    #[test]
    fn parameter_errors_name_the_layer_and_path() {
        use std::error::Error;
        let err = MlpError::Parameter {
            layer: 2,
            path: "w1.bin".to_string(),
            source: Box::new(MlpError::InvalidFileSize { expected: 24, actual: 4 }),
        };
        let message = err.to_string();
        assert!(message.contains("layer 2"));
        assert!(message.contains("w1.bin"));
        assert!(message.contains("24"));
        assert!(err.source().is_some());
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;
        let err: MlpError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
    }
}
