//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - A sky gradient as the only light source
//! - Gamma correction and 8-bit quantization

use crate::{Color, HitRecord, Hittable};
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// Smallest accepted hit distance. Keeps scattered rays from hitting the
/// surface they start on.
pub const T_MIN: f64 = 0.0001;

/// Horizon color of the sky gradient.
pub const SKY_WHITE: Color = Color::new(1.0, 1.0, 1.0);

/// Zenith color of the sky gradient.
pub const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Output range for gamma-corrected channels before scaling to 0-255.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, multiplying in each surface's
/// attenuation until it escapes to the sky, is absorbed, or runs out of
/// bounces.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget exhausted, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(T_MIN, f64::INFINITY), &mut rec) {
        return sky_color(ray);
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Sky gradient for rays that escape the scene: white at the bottom,
/// light blue at the top, blended on the direction's vertical component.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    SKY_WHITE * (1.0 - a) + SKY_BLUE * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one linear channel to a byte, saturating at 0 and 255.
#[inline]
pub fn channel_to_byte(linear: f64) -> u8 {
    (256.0 * INTENSITY.clamp(linear_to_gamma(linear))) as u8
}

/// Convert a linear color to opaque 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    [
        channel_to_byte(color.x),
        channel_to_byte(color.y),
        channel_to_byte(color.z),
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Lambertian, Metal, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sky_gradient() {
        let up_color = sky_color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        let down_color = sky_color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        let level_color = sky_color(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));

        assert!((up_color - SKY_BLUE).length() < 1e-12);
        assert!((down_color - SKY_WHITE).length() < 1e-12);
        assert!((level_color - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgba_saturates() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(4.0, -2.0, f64::NAN)), [255, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::new(0.25, 0.25, 0.25)), [128, 128, 128, 255]);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(42);
        let color = ray_color(&Ray::new(Vec3::ZERO, Vec3::Y), &world, 0, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_miss_returns_sky() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.4, -1.0));
        assert_eq!(ray_color(&ray, &world, 5, &mut rng), sky_color(&ray));
    }

    #[test]
    fn test_mirror_tints_reflected_sky() {
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0, Metal::new(Color::new(0.5, 1.0, 1.0), 0.0)));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = ray_color(&ray, &world, 5, &mut rng);

        // Head-on reflection goes straight back along +z, which sees the horizon
        let expected = Color::new(0.5, 1.0, 1.0) * sky_color(&Ray::new(Vec3::ZERO, Vec3::Z));
        assert!((color - expected).length() < 1e-9);
    }

    #[test]
    fn test_black_absorber() {
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0, Lambertian::new(Color::ZERO)));

        let mut rng = StdRng::seed_from_u64(42);
        let color = ray_color(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, 10, &mut rng);
        assert_eq!(color, Color::ZERO);
    }
}
