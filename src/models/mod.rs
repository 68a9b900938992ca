pub mod common;
pub mod gemini;
pub mod generation;
pub mod image;

pub use common::*;
pub use gemini::*;
pub use generation::*;
pub use image::*;
