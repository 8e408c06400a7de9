//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres lit by a sky gradient.
//!
//! A [`Camera`] owns a fixed-size RGBA frame buffer and a pool of worker
//! threads. Each [`Camera::render`] call splits the image into row bands,
//! renders them in parallel against a borrowed scene, and returns once the
//! whole frame is written. The same camera can be rendered once for a still
//! image or repeatedly, moving it between frames with
//! [`Camera::translate`] and [`Camera::rotate`].
//!
//! ```no_run
//! use lumen_renderer::{Camera, CameraParams, HittableList, Lambertian, Sphere, Vec3};
//!
//! let mut world = HittableList::new();
//! world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Lambertian::new(Vec3::splat(0.5))));
//!
//! let mut camera = Camera::new(CameraParams::default().with_quality(4, 10))?;
//! camera.render(&world);
//! camera.screenshot("out", "image.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bands;
mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod random;
mod renderer;
mod scene;
mod sphere;

pub use bands::{partition_rows, Band};
pub use camera::{Camera, CameraParams, BYTES_PER_PIXEL};
pub use error::{OutputError, OutputResult, RenderError, RenderResult, SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{save_image, save_png, save_ppm, write_png, write_ppm};
pub use renderer::{channel_to_byte, color_to_rgba, linear_to_gamma, ray_color, sky_color, T_MIN};
pub use scene::{MaterialDescription, SceneDescription, SphereDescription};
pub use sphere::Sphere;

/// Sampling helpers, for materials implemented outside this crate.
pub mod sampling {
    pub use crate::random::{
        gen_f64, gen_range, random_in_unit_disk, random_on_hemisphere, random_unit_vector, random_vec_in,
    };
}

/// Re-export math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3, VecExt};
