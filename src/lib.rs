//! stl2normalmap - Generate normal map images from STL files

pub mod config;
pub mod geometry;
pub mod pipeline;
pub mod raster;
pub mod stl;
pub mod style;
