pub mod decompose;
pub mod polygon;

pub use decompose::decompose;
pub use polygon::Polygon;
