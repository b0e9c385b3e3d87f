pub mod color;
pub mod image;
pub mod value;

pub use color::Color;
pub use image::Image;
pub use value::{NodeInputs, NodeOutputs, NodeValue};
