//! Lumen math - vector kernel, rays and intervals for the path tracer.
//!
//! Vectors are glam's double precision `DVec3`, aliased as [`Vec3`].
//! The operations the tracer needs beyond glam live on [`VecExt`].

/// Vector type used throughout the renderer (points, directions and colors).
pub type Vec3 = glam::DVec3;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{VecExt, NEAR_ZERO_EPSILON};

/// Convert an angle in degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}
