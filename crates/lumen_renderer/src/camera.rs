//! Camera: viewport geometry, per-pixel integration and the band scheduler.
//!
//! A [`Camera`] owns its RGBA frame buffer and a pool of worker threads for
//! its whole lifetime. Each [`Camera::render`] call overwrites the buffer.

use std::path::Path;
use std::time::Instant;

use lumen_math::{degrees_to_radians, Ray, Vec3, VecExt};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::bands::partition_rows;
use crate::error::{OutputResult, RenderError, RenderResult};
use crate::random::random_in_unit_disk;
use crate::renderer::{color_to_rgba, ray_color};
use crate::{output, Color, Hittable};

/// Bytes per pixel in the frame buffer (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Camera construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: usize,
    /// Vertical field of view in degrees
    pub vertical_fov: f64,
    /// Eye position
    pub look_from: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// World up direction
    pub vup: Vec3,
    /// Distance from the eye to the plane of perfect focus
    pub focal_distance: f64,
    /// Aperture cone angle in degrees; 0 disables depth of field
    pub defocus_angle: f64,
    /// Sub-pixel grid size; N takes N x N samples per pixel
    pub anti_aliasing: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Worker thread count; defaults to the available parallelism
    pub workers: Option<usize>,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 200,
            vertical_fov: 60.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            focal_distance: 1.0,
            defocus_angle: 0.0,
            anti_aliasing: 1,
            max_depth: 10,
            workers: None,
        }
    }
}

impl CameraParams {
    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: usize, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, anti_aliasing: u32, max_depth: u32) -> Self {
        self.anti_aliasing = anti_aliasing;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vertical_fov: f64, defocus_angle: f64, focal_distance: f64) -> Self {
        self.vertical_fov = vertical_fov;
        self.defocus_angle = defocus_angle;
        self.focal_distance = focal_distance;
        self
    }

    /// Set the number of render workers (and row bands).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Image height derived from width and aspect ratio, at least 1.
    pub fn image_height(&self) -> usize {
        ((self.image_width as f64 / self.aspect_ratio) as usize).max(1)
    }

    fn validate(&self) -> RenderResult<()> {
        let invalid = |message: &str| Err(RenderError::InvalidParams(message.to_string()));

        if self.image_width == 0 {
            return invalid("image width must be positive");
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid("aspect ratio must be positive and finite");
        }
        if !(self.vertical_fov > 0.0 && self.vertical_fov < 180.0) {
            return invalid("vertical field of view must be in (0, 180) degrees");
        }
        if !(self.focal_distance > 0.0) {
            return invalid("focal distance must be positive");
        }
        if self.anti_aliasing == 0 {
            return invalid("anti-aliasing level must be at least 1");
        }
        if self.workers == Some(0) {
            return invalid("worker count must be at least 1");
        }
        if (self.look_from - self.look_at).near_zero() {
            return invalid("look_from and look_at must differ");
        }
        if self.vup.cross(self.look_from - self.look_at).near_zero() {
            return invalid("up vector must not be parallel to the view direction");
        }
        Ok(())
    }
}

/// Viewport geometry and integrator settings shared by all workers.
#[derive(Debug, Clone)]
struct Viewport {
    image_width: usize,
    image_height: usize,
    vup: Vec3,

    // Lens and sampling
    viewport_width: f64,
    viewport_height: f64,
    focal_distance: f64,
    defocus_angle: f64,
    anti_aliasing: u32,
    max_depth: u32,

    // Pose
    center: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,

    // Derived from pose (set by orient())
    upper_left: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    sample_delta_u: Vec3,
    sample_delta_v: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Viewport {
    fn new(params: &CameraParams) -> Self {
        let image_height = params.image_height();

        let theta = degrees_to_radians(params.vertical_fov);
        let viewport_height = 2.0 * (theta / 2.0).tan() * params.focal_distance;
        let viewport_width = viewport_height * (params.image_width as f64 / image_height as f64);

        let w = (params.look_from - params.look_at).normalize();
        let u = params.vup.cross(w).normalize();
        let v = w.cross(u);

        let mut viewport = Self {
            image_width: params.image_width,
            image_height,
            vup: params.vup,
            viewport_width,
            viewport_height,
            focal_distance: params.focal_distance,
            defocus_angle: params.defocus_angle,
            anti_aliasing: params.anti_aliasing,
            max_depth: params.max_depth,
            center: params.look_from,
            u,
            v,
            w,
            upper_left: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            sample_delta_u: Vec3::ZERO,
            sample_delta_v: Vec3::ZERO,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        };
        viewport.orient(u, v, w);
        viewport
    }

    /// Install a new orthonormal frame and re-derive everything that
    /// depends on it around the current center.
    fn orient(&mut self, u: Vec3, v: Vec3, w: Vec3) {
        self.u = u;
        self.v = v;
        self.w = w;

        let edge_u = self.viewport_width * u;
        let edge_v = -self.viewport_height * v;

        self.pixel_delta_u = edge_u / self.image_width as f64;
        self.pixel_delta_v = edge_v / self.image_height as f64;
        self.upper_left = self.center - self.focal_distance * w - 0.5 * (edge_u + edge_v);

        // N samples per axis sit at k / (N + 1) of a pixel, k = 1..=N
        let steps = f64::from(self.anti_aliasing + 1);
        self.sample_delta_u = self.pixel_delta_u / steps;
        self.sample_delta_v = self.pixel_delta_v / steps;

        let defocus_radius = self.focal_distance * degrees_to_radians(self.defocus_angle / 2.0).tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;
    }

    /// Ray through sub-sample (`sx`, `sy`) of pixel (`x`, `y`), with
    /// `sx`, `sy` in `1..=anti_aliasing`.
    fn get_ray(&self, x: usize, y: usize, sx: u32, sy: u32, rng: &mut dyn RngCore) -> Ray {
        let pixel_corner =
            self.upper_left + x as f64 * self.pixel_delta_u + y as f64 * self.pixel_delta_v;
        let sample_point = pixel_corner
            + f64::from(sx) * self.sample_delta_u
            + f64::from(sy) * self.sample_delta_v;

        let origin = if self.defocus_angle > 0.0 {
            self.defocus_disk_sample(rng)
        } else {
            self.center
        };

        Ray::new(origin, sample_point - origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Average linear color over the pixel's sub-sample grid.
    fn sample_pixel(&self, x: usize, y: usize, world: &dyn Hittable, rng: &mut dyn RngCore) -> Color {
        let n = self.anti_aliasing;
        let mut pixel_color = Color::ZERO;

        for sy in 1..=n {
            for sx in 1..=n {
                let ray = self.get_ray(x, y, sx, sy, rng);
                pixel_color += ray_color(&ray, world, self.max_depth, rng);
            }
        }

        pixel_color / f64::from(n * n)
    }

    /// Render rows `rows` into `out`, which holds exactly those rows.
    fn render_rows(&self, rows: std::ops::Range<usize>, world: &dyn Hittable, out: &mut [u8], rng: &mut dyn RngCore) {
        let row_bytes = self.image_width * BYTES_PER_PIXEL;
        for (row, y) in out.chunks_exact_mut(row_bytes).zip(rows) {
            for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let color = self.sample_pixel(x, y, world, rng);
                pixel.copy_from_slice(&color_to_rgba(color));
            }
        }
    }
}

/// Camera for rendering a scene into an RGBA frame buffer.
pub struct Camera {
    viewport: Viewport,
    /// Row-major RGBA, `image_width * image_height * 4` bytes
    pixels: Vec<u8>,
    pool: ThreadPool,
    workers: usize,
}

impl Camera {
    /// Create a camera and start its worker threads.
    pub fn new(params: CameraParams) -> RenderResult<Self> {
        params.validate()?;

        let workers = params.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lumen-render-{i}"))
            .build()?;

        let viewport = Viewport::new(&params);
        // Opaque white until the first render
        let pixels = vec![255; viewport.image_width * viewport.image_height * BYTES_PER_PIXEL];

        log::info!(
            "Camera {}x{} at {:?}, {} workers, viewport {:.3}x{:.3}, AA {}x{}, depth {}",
            viewport.image_width,
            viewport.image_height,
            viewport.center,
            workers,
            viewport.viewport_width,
            viewport.viewport_height,
            viewport.anti_aliasing,
            viewport.anti_aliasing,
            viewport.max_depth,
        );

        Ok(Self {
            viewport,
            pixels,
            pool,
            workers,
        })
    }

    /// Render the scene into the frame buffer.
    ///
    /// Rows are split into one band per worker; the call returns only after
    /// every band has been written. The scene is borrowed for the duration
    /// of the call and must not change while it runs.
    pub fn render(&mut self, world: &dyn Hittable) {
        let start = Instant::now();
        let bands = partition_rows(self.viewport.image_height, self.workers);
        let band_count = bands.len();
        let row_bytes = self.viewport.image_width * BYTES_PER_PIXEL;

        let viewport = &self.viewport;
        let mut remaining: &mut [u8] = &mut self.pixels;

        self.pool.scope(|scope| {
            for band in bands {
                let (chunk, rest) = std::mem::take(&mut remaining).split_at_mut(band.row_count() * row_bytes);
                remaining = rest;

                scope.spawn(move |_| {
                    let mut rng = StdRng::from_entropy();
                    viewport.render_rows(band.rows.clone(), world, chunk, &mut rng);
                    log::trace!("Band {} (rows {:?}) done", band.index, band.rows);
                });
            }
        });

        log::debug!("Rendered frame in {:?} ({} bands)", start.elapsed(), band_count);
    }

    /// Render a single pixel and return its RGBA bytes without touching the
    /// frame buffer.
    pub fn render_pixel(&self, x: usize, y: usize, world: &dyn Hittable, rng: &mut dyn RngCore) -> [u8; 4] {
        color_to_rgba(self.viewport.sample_pixel(x, y, world, rng))
    }

    /// Ray through sub-sample (`sx`, `sy`) of pixel (`x`, `y`); sub-sample
    /// indices run from 1 to the anti-aliasing level.
    pub fn get_ray(&self, x: usize, y: usize, sx: u32, sy: u32, rng: &mut dyn RngCore) -> Ray {
        self.viewport.get_ray(x, y, sx, sy, rng)
    }

    /// Move the camera by `movement` given in camera-local axes
    /// (x right, y up, z backwards).
    pub fn translate(&mut self, movement: Vec3) {
        let vp = &mut self.viewport;
        let world_movement = vp.u * movement.x + vp.v * movement.y + vp.w * movement.z;
        vp.center += world_movement;
        vp.upper_left += world_movement;
    }

    /// Rotate the view by `angles` in radians: yaw (`y`) about the world up
    /// vector, then pitch (`x`) about the camera's right axis, then roll
    /// (`z`) about its view axis. The camera center does not move.
    pub fn rotate(&mut self, angles: Vec3) {
        if angles == Vec3::ZERO {
            return;
        }

        let vp = &self.viewport;
        let yaw = |d: Vec3| d.rotate_about_axis(vp.vup, angles.y);
        let (u, v, w) = (yaw(vp.u), yaw(vp.v), yaw(vp.w));

        let (v, w) = (v.rotate_about_axis(u, angles.x), w.rotate_about_axis(u, angles.x));
        let (u, v) = (u.rotate_about_axis(w, angles.z), v.rotate_about_axis(w, angles.z));

        // Remove accumulated drift so the frame stays orthonormal
        let w = w.normalize();
        let u = v.cross(w).normalize();
        let v = w.cross(u);

        self.viewport.orient(u, v, w);
    }

    /// Write the frame buffer to `directory/file_name`, creating the
    /// directory if needed. The extension picks the format (`.ppm`, `.png`).
    pub fn screenshot(&self, directory: impl AsRef<Path>, file_name: &str) -> OutputResult<()> {
        let path = directory.as_ref().join(file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        output::save_image(&path, &self.pixels, self.image_width(), self.image_height())
    }

    /// The last rendered frame: row-major RGBA, alpha always 255.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA bytes of pixel (x, y) from the last render.
    ///
    /// # Panics
    ///
    /// Panics if `x >= image_width()` or `y >= image_height()`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(
            x < self.viewport.image_width && y < self.viewport.image_height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.viewport.image_width,
            self.viewport.image_height
        );
        let idx = BYTES_PER_PIXEL * (y * self.viewport.image_width + x);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + BYTES_PER_PIXEL]);
        rgba
    }

    pub fn image_width(&self) -> usize {
        self.viewport.image_width
    }

    pub fn image_height(&self) -> usize {
        self.viewport.image_height
    }

    /// Number of worker threads, which is also the number of row bands.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Current eye position.
    pub fn look_from(&self) -> Vec3 {
        self.viewport.center
    }

    /// Point one unit ahead of the eye along the view direction.
    pub fn look_at(&self) -> Vec3 {
        self.viewport.center - self.viewport.w
    }

    /// Camera basis `(u, v, w)`: right, up, and backwards.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.viewport.u, self.viewport.v, self.viewport.w)
    }
}
