pub mod image;
pub mod lambda;

pub use image::*;
pub use lambda::*;
