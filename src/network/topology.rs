use serde::{Serialize, Deserialize};

use crate::error::{MlpError, Result};

/// The layer dimensions of the digit-recognition network: four dense layers
/// narrowing 784 → 128 → 64 → 20 → 10, fed by a 28x28 image.
const MNIST_LAYER_DIMS: [(usize, usize); 4] = [(128, 784), (64, 128), (20, 64), (10, 20)];
const MNIST_IMAGE_DIMS: (usize, usize) = (28, 28);

/// An ordered description of a network's layer dimensions plus the shape of
/// the input image, validated once at construction.
///
/// Each entry is an `(out, in)` pair: the weight matrix of layer *i* is
/// `out x in` and its bias is `out x 1`. Layer *i*'s `in` must equal layer
/// *i-1*'s `out`, and the flattened image must match the first layer's `in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    layers: Vec<(usize, usize)>,
    image_dims: (usize, usize),
}

impl Topology {
    /// Builds a validated topology from `(out, in)` pairs and the input
    /// image shape. Fails with a size error on a zero dimension, an empty
    /// layer list, a broken chain, or an image that does not flatten to the
    /// first layer's input size.
    pub fn new(layers: Vec<(usize, usize)>, image_dims: (usize, usize)) -> Result<Topology> {
        if layers.is_empty() {
            return Err(MlpError::DimensionMismatch {
                expected: "at least one layer".to_string(),
                actual: "0 layers".to_string(),
            });
        }
        if image_dims.0 == 0 || image_dims.1 == 0 {
            return Err(MlpError::InvalidDimensions {
                rows: image_dims.0,
                cols: image_dims.1,
            });
        }
        for &(out, input) in &layers {
            if out == 0 || input == 0 {
                return Err(MlpError::InvalidDimensions { rows: out, cols: input });
            }
        }
        let flat = image_dims.0 * image_dims.1;
        if layers[0].1 != flat {
            return Err(MlpError::DimensionMismatch {
                expected: format!("first layer input of {} ({}x{} image)", flat, image_dims.0, image_dims.1),
                actual: format!("{}", layers[0].1),
            });
        }
        for i in 1..layers.len() {
            if layers[i].1 != layers[i - 1].0 {
                return Err(MlpError::DimensionMismatch {
                    expected: format!("layer {} input of {}", i, layers[i - 1].0),
                    actual: format!("{}", layers[i].1),
                });
            }
        }
        Ok(Topology { layers, image_dims })
    }

    /// The fixed digit-recognition topology.
    pub fn mnist() -> Topology {
        Topology {
            layers: MNIST_LAYER_DIMS.to_vec(),
            image_dims: MNIST_IMAGE_DIMS,
        }
    }

    /// `(out, in)` dimension pairs in layer order.
    pub fn layers(&self) -> &[(usize, usize)] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// `(rows, cols)` of the expected input image.
    pub fn image_dims(&self) -> (usize, usize) {
        self.image_dims
    }

    /// Flattened input size (first layer's `in`).
    pub fn input_size(&self) -> usize {
        self.layers[0].1
    }

    /// Output class count (last layer's `out`).
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].0
    }

    /// Serializes the topology to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| MlpError::Format { message: e.to_string() })
    }

    /// Deserializes a `Topology` from a JSON file. The decoded value is
    /// re-validated so hand-edited files cannot smuggle in a broken chain.
    pub fn load_json(path: &str) -> Result<Topology> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let decoded: Topology = serde_json::from_reader(reader)
            .map_err(|e| MlpError::Format { message: e.to_string() })?;
        Topology::new(decoded.layers, decoded.image_dims)
    }
}
