pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod io;

// Convenience re-exports
pub use error::{MlpError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::Activation;
pub use layers::dense::Dense;
pub use network::network::{Digit, Network};
pub use network::topology::Topology;
