//! Navigation core for the ellipsoidal globe viewer: camera pose,
//! geodetic tracking, precomputed flight transitions, terrain following,
//! and the streaming-gate coordination that keeps tile churn quiet while
//! the camera is in motion.

pub mod camera;
pub mod extent;
pub mod flight;
pub mod geodetic;
pub mod navigator;
pub mod settings;
pub mod terrain;

pub use camera::*;
pub use extent::*;
pub use flight::*;
pub use geodetic::*;
pub use navigator::*;
pub use settings::*;
pub use terrain::*;
