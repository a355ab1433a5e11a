pub mod scaling;
pub mod triangle;

pub use scaling::{Bounds, ScalePlan};
pub use triangle::Triangle;
