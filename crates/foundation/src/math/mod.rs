pub mod ecef;
pub mod geodesy;
pub mod intersect;
pub mod mat;
pub mod projection;
pub mod vec;

pub use ecef::*;
pub use geodesy::*;
pub use intersect::*;
pub use mat::*;
pub use projection::*;
pub use vec::*;
