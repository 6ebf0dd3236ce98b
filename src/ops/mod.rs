//! Pixel algorithms: flood fill, shape rasterization, text stamping.

pub mod fill;
pub mod shapes;
pub mod text;
