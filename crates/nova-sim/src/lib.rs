//! # Explosion Simulation Core
//!
//! Shared simulation clock, tunable parameter store, and the two
//! GPU-evaluated motion models (ballistic particle drift and radial
//! shockwave expansion) that the renderer reads every frame.

pub mod clock;
pub mod field;
pub mod params;
pub mod shockwave;
pub mod store;

pub use clock::*;
pub use field::*;
pub use params::*;
pub use shockwave::*;
pub use store::*;
