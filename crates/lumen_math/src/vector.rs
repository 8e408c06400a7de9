//! Vector operations used by scattering and camera pose updates.

use crate::{Interval, Vec3};

/// Components below this magnitude count as zero in [`VecExt::near_zero`].
pub const NEAR_ZERO_EPSILON: f64 = 1e-7;

/// Extra vector operations on top of glam's arithmetic.
///
/// Method names avoid glam's own `reflect`/`refract`, which use a different
/// convention for total internal reflection.
pub trait VecExt {
    /// True if every component is closer to zero than [`NEAR_ZERO_EPSILON`].
    fn near_zero(self) -> bool;

    /// Mirror the vector about a unit normal: `v - 2(v·n)n`.
    fn reflect_about(self, normal: Self) -> Self;

    /// Bend a unit vector through a surface with unit `normal` following
    /// Snell's law. `eta_ratio` is the incident over transmitted index.
    ///
    /// Does not check for total internal reflection; callers decide that
    /// before refracting.
    fn refract_through(self, normal: Self, eta_ratio: f64) -> Self;

    /// Rotate around `axis` by `angle` radians (Rodrigues' formula).
    /// The axis does not need to be normalized.
    fn rotate_about_axis(self, axis: Self, angle: f64) -> Self;
}

impl VecExt for Vec3 {
    #[inline]
    fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO_EPSILON
            && self.y.abs() < NEAR_ZERO_EPSILON
            && self.z.abs() < NEAR_ZERO_EPSILON
    }

    #[inline]
    fn reflect_about(self, normal: Self) -> Self {
        self - 2.0 * self.dot(normal) * normal
    }

    #[inline]
    fn refract_through(self, normal: Self, eta_ratio: f64) -> Self {
        // Floating point can push the cosine slightly past 1
        let cos_theta = Interval::new(-1.0, 1.0).clamp((-self).dot(normal));
        let r_out_perp = eta_ratio * (self + cos_theta * normal);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * normal;
        r_out_perp + r_out_parallel
    }

    fn rotate_about_axis(self, axis: Self, angle: f64) -> Self {
        let k = axis.normalize();
        let (sin, cos) = angle.sin_cos();
        self * cos + k.cross(self) * sin + k * (k.dot(self) * (1.0 - cos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-9)
    }

    #[test]
    fn test_near_zero() {
        assert!(Vec3::ZERO.near_zero());
        assert!(Vec3::splat(1e-9).near_zero());
        assert!(!Vec3::new(0.0, 1e-3, 0.0).near_zero());
        assert!(!Vec3::new(-1.0, 0.0, 0.0).near_zero());
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let reflected = v.reflect_about(Vec3::Y);
        assert_eq!(reflected, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_matched_index_passes_straight() {
        let incoming = Vec3::new(1.0, -2.0, 0.5).normalize();
        let refracted = incoming.refract_through(Vec3::Y, 1.0);
        assert!(approx_eq(refracted, incoming), "{refracted:?} != {incoming:?}");
    }

    #[test]
    fn test_refract_normal_incidence() {
        let refracted = (-Vec3::Y).refract_through(Vec3::Y, 1.0 / 1.5);
        assert!(approx_eq(refracted, -Vec3::Y));
    }

    #[test]
    fn test_refract_bends_toward_normal_entering_denser_medium() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = incoming.refract_through(Vec3::Y, 1.0 / 1.5);

        // sin(theta_t) = sin(theta_i) / 1.5
        let sin_i = incoming.x;
        assert!((refracted.x - sin_i / 1.5).abs() < 1e-9);
        assert!(refracted.y < 0.0);
        assert!((refracted.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_about_axis() {
        let rotated = Vec3::X.rotate_about_axis(Vec3::Z, FRAC_PI_2);
        assert!(approx_eq(rotated, Vec3::Y));

        // Axis is normalized internally
        let rotated = Vec3::X.rotate_about_axis(Vec3::new(0.0, 0.0, 5.0), FRAC_PI_2);
        assert!(approx_eq(rotated, Vec3::Y));

        // Vectors along the axis are unchanged
        let along = Vec3::new(0.0, 0.0, 3.0);
        assert!(approx_eq(along.rotate_about_axis(Vec3::Z, 1.234), along));
    }

    fn component() -> impl Strategy<Value = f64> {
        -100.0..100.0f64
    }

    proptest! {
        #[test]
        fn reflect_preserves_length_and_negates_normal_component(
            (dx, dy, dz) in (component(), component(), component()),
            (nx, ny, nz) in (component(), component(), component()),
        ) {
            let n = Vec3::new(nx, ny, nz);
            prop_assume!(n.length() > 1e-3);
            let n = n.normalize();
            let d = Vec3::new(dx, dy, dz);

            let r = d.reflect_about(n);
            let tolerance = 1e-9 * (1.0 + d.length());
            prop_assert!((r.length() - d.length()).abs() < tolerance);
            prop_assert!((r.dot(n) + d.dot(n)).abs() < tolerance);
        }

        #[test]
        fn rotation_preserves_length(
            (x, y, z) in (component(), component(), component()),
            angle in -10.0..10.0f64,
        ) {
            let v = Vec3::new(x, y, z);
            let rotated = v.rotate_about_axis(Vec3::new(1.0, 2.0, 3.0), angle);
            prop_assert!((rotated.length() - v.length()).abs() < 1e-9 * (1.0 + v.length()));
        }
    }
}
