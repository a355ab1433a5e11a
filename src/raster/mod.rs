pub mod canvas;
pub mod png;
pub mod rasterizer;

pub use canvas::Canvas;
pub use png::write_png;
pub use rasterizer::rasterize;
