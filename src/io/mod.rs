pub mod params;
pub mod image;

pub use params::{load_parameters, read_matrix};
pub use image::{decode_image, read_image};
