pub mod network;
pub mod topology;

pub use network::{Digit, Network};
pub use topology::Topology;
