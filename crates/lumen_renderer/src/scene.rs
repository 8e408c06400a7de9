//! Serializable scene descriptions.
//!
//! A scene file is JSON listing spheres and, optionally, camera settings:
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "look_from": [0, 0, 0], "look_at": [0, 0, -1] },
//!   "spheres": [
//!     { "center": [0, 0, -1], "radius": 0.5,
//!       "material": { "type": "lambertian", "albedo": [0.1, 0.2, 0.5] } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraParams;
use crate::error::{SceneError, SceneResult};
use crate::{Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere};

/// Surface response of a described sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian { albedo: Color },
    Metal { albedo: Color, fuzz: f64 },
    Dielectric { refraction_index: f64 },
}

impl MaterialDescription {
    /// Instantiate the material.
    pub fn build(&self) -> Arc<dyn Material> {
        match *self {
            MaterialDescription::Lambertian { albedo } => Arc::new(Lambertian::new(albedo)),
            MaterialDescription::Metal { albedo, fuzz } => Arc::new(Metal::new(albedo, fuzz)),
            MaterialDescription::Dielectric { refraction_index } => Arc::new(Dielectric::new(refraction_index)),
        }
    }
}

/// A described sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Vec3,
    pub radius: f64,
    pub material: MaterialDescription,
}

/// A complete scene: primitives plus optional camera settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: Option<CameraParams>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    /// Parse a scene from a JSON string.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;
        log::info!("Loaded {} spheres from {}", scene.spheres.len(), path.display());
        Ok(scene)
    }

    /// The five-sphere demo scene: a blue diffuse ball between a hollow
    /// glass ball and a fuzzy gold one, on a large mirror-yellow ground.
    pub fn demo() -> Self {
        let sphere = |center: Vec3, radius: f64, material: MaterialDescription| SphereDescription {
            center,
            radius,
            material,
        };

        Self {
            camera: Some(
                CameraParams::default()
                    .with_resolution(200, 16.0 / 9.0)
                    .with_position(Vec3::new(-0.183, -0.168, -0.463), Vec3::new(0.572, -0.365, -1.088), Vec3::Y)
                    .with_lens(60.0, 0.0, 1.0)
                    .with_quality(1, 10),
            ),
            spheres: vec![
                sphere(
                    Vec3::new(0.0, 0.0, -1.2),
                    0.5,
                    MaterialDescription::Lambertian { albedo: Color::new(0.1, 0.2, 0.5) },
                ),
                sphere(
                    Vec3::new(-1.0, 0.0, -1.0),
                    0.5,
                    MaterialDescription::Dielectric { refraction_index: 1.5 },
                ),
                // Air bubble inside the glass ball
                sphere(
                    Vec3::new(-1.0, 0.0, -1.0),
                    0.4,
                    MaterialDescription::Dielectric { refraction_index: 1.0 / 1.5 },
                ),
                sphere(
                    Vec3::new(1.0, 0.0, -1.0),
                    0.5,
                    MaterialDescription::Metal { albedo: Color::new(0.8, 0.6, 0.2), fuzz: 0.2 },
                ),
                sphere(
                    Vec3::new(0.0, -100.5, -1.0),
                    100.0,
                    MaterialDescription::Metal { albedo: Color::new(0.8, 0.8, 0.0), fuzz: 0.0 },
                ),
            ],
        }
    }

    /// Reject primitives the intersection code cannot handle.
    pub fn validate(&self) -> SceneResult<()> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            let invalid = |message: &str| SceneError::InvalidSphere {
                index,
                message: message.to_string(),
            };

            if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
                return Err(invalid("radius must be positive"));
            }
            if !sphere.center.is_finite() {
                return Err(invalid("center must be finite"));
            }
            match sphere.material {
                MaterialDescription::Dielectric { refraction_index } if !(refraction_index > 0.0) => {
                    return Err(invalid("refraction index must be positive"));
                }
                MaterialDescription::Metal { fuzz, .. } if fuzz < 0.0 => {
                    return Err(invalid("fuzz must not be negative"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Build the scene aggregate. Each sphere gets its own material instance.
    pub fn build(&self) -> HittableList {
        let mut world = HittableList::new();
        for sphere in &self.spheres {
            world.add(Sphere::new(sphere.center, sphere.radius, sphere.material.build()));
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HitRecord, Hittable};
    use lumen_math::{Interval, Ray};

    #[test]
    fn test_demo_scene() {
        let scene = SceneDescription::demo();
        scene.validate().unwrap();
        assert_eq!(scene.spheres.len(), 5);

        let world = scene.build();
        assert_eq!(world.len(), 5);

        // Straight down from above the ground hits the ground sphere
        let ray = Ray::new(Vec3::new(0.0, 5.0, -2.0), Vec3::NEG_Y);
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.0001, f64::INFINITY), &mut rec));
        assert!((rec.p.y + 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "camera": { "image_width": 64, "anti_aliasing": 2 },
            "spheres": [
                { "center": [0, 0, -1], "radius": 0.5,
                  "material": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
                { "center": [1, 0, -1], "radius": 0.5,
                  "material": { "type": "metal", "albedo": [0.8, 0.6, 0.2], "fuzz": 0.1 } },
                { "center": [-1, 0, -1], "radius": 0.5,
                  "material": { "type": "dielectric", "refraction_index": 1.5 } }
            ]
        }"#;

        let scene = SceneDescription::from_json(json).unwrap();
        let camera = scene.camera.as_ref().unwrap();
        assert_eq!(camera.image_width, 64);
        assert_eq!(camera.anti_aliasing, 2);
        // Unspecified fields fall back to defaults
        assert_eq!(camera.max_depth, CameraParams::default().max_depth);

        assert_eq!(scene.spheres.len(), 3);
        assert_eq!(
            scene.spheres[1].material,
            MaterialDescription::Metal { albedo: Color::new(0.8, 0.6, 0.2), fuzz: 0.1 }
        );
    }

    #[test]
    fn test_json_round_trip_of_demo() {
        let demo = SceneDescription::demo();
        let json = serde_json::to_string_pretty(&demo).unwrap();
        assert_eq!(SceneDescription::from_json(&json).unwrap(), demo);
    }

    #[test]
    fn test_rejects_bad_spheres() {
        let zero_radius = r#"{ "spheres": [
            { "center": [0, 0, 0], "radius": 0.0,
              "material": { "type": "lambertian", "albedo": [1, 1, 1] } } ] }"#;
        assert!(matches!(
            SceneDescription::from_json(zero_radius),
            Err(SceneError::InvalidSphere { index: 0, .. })
        ));

        let bad_glass = r#"{ "spheres": [
            { "center": [0, 0, 0], "radius": 1.0,
              "material": { "type": "lambertian", "albedo": [1, 1, 1] } },
            { "center": [0, 0, 0], "radius": 1.0,
              "material": { "type": "dielectric", "refraction_index": -1.0 } } ] }"#;
        assert!(matches!(
            SceneDescription::from_json(bad_glass),
            Err(SceneError::InvalidSphere { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SceneDescription::from_json("{ \"spheres\": [ { \"radius\": 1 } ] }"),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_empty_scene() {
        let scene = SceneDescription::from_json("{}").unwrap();
        assert!(scene.camera.is_none());
        assert!(scene.build().is_empty());
    }
}
