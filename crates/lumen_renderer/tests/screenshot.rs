//! Writing rendered frames to disk.

use lumen_renderer::{Camera, CameraParams, HittableList, Lambertian, OutputError, SceneDescription, Sphere, Vec3};

fn rendered_camera() -> Camera {
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Lambertian::new(Vec3::splat(0.5))));

    let mut camera = Camera::new(CameraParams::default().with_resolution(16, 2.0).with_workers(2)).unwrap();
    camera.render(&world);
    camera
}

#[test]
fn ppm_screenshot_matches_frame_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let camera = rendered_camera();

    camera.screenshot(dir.path(), "frame.ppm").unwrap();

    let text = std::fs::read_to_string(dir.path().join("frame.ppm")).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("16 8"));
    assert_eq!(lines.next(), Some("255"));

    let triples: Vec<&str> = lines.collect();
    assert_eq!(triples.len(), 16 * 8);

    let [r, g, b, _] = camera.pixel(3, 2);
    assert_eq!(triples[2 * 16 + 3], format!("{r} {g} {b}"));
}

#[test]
fn png_screenshot_creates_directories_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let camera = rendered_camera();

    camera.screenshot(dir.path().join("nested/out"), "frame.png").unwrap();

    let decoded = image::open(dir.path().join("nested/out/frame.png")).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (16, 8));
    assert_eq!(decoded.into_raw(), camera.pixels());
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let camera = rendered_camera();

    let err = camera.screenshot(dir.path(), "frame.tiff").unwrap_err();
    assert!(matches!(err, OutputError::UnsupportedFormat(_)));
    assert!(!dir.path().join("frame.tiff").exists());
}

#[test]
fn io_errors_surface_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let camera = rendered_camera();

    // A regular file where a directory is expected
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = camera.screenshot(&blocker, "frame.ppm").unwrap_err();
    assert!(matches!(err, OutputError::Io(_)));
}

#[test]
fn demo_scene_renders_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let scene = SceneDescription::demo();
    let params = scene.camera.clone().unwrap_or_default().with_resolution(64, 16.0 / 9.0).with_workers(2);

    let mut camera = Camera::new(params).unwrap();
    camera.render(&scene.build());
    camera.screenshot(dir.path(), "demo.png").unwrap();

    assert!(dir.path().join("demo.png").metadata().unwrap().len() > 0);
}
