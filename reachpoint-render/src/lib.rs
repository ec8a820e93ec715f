pub mod raster;

pub use raster::Rasterizer;
