//! Numeric foundation of the Helios ray tracer: points, non-zero vectors,
//! rays and the epsilon rules every intersection test shares.

// Re-export glam's double precision vector for raw arithmetic
pub use glam::DVec3;

mod ray;
pub mod util;
mod vector;

pub use ray::{Ray, DELTA};
pub use util::{align_zero, is_zero, EPSILON};
pub use vector::{Point3, Vector3, ZeroVectorError};
