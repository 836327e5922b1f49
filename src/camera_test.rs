#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::{MAX_ZOOM, MIN_ZOOM};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Coordinate conversion
// =============================================================

#[test]
fn identity_camera_maps_screen_to_world_unchanged() {
    let cam = Camera::default();
    let world = cam.screen_to_world(pt(100.0, 50.0));
    assert_eq!(world, pt(100.0, 50.0));
}

#[test]
fn pan_shifts_world_coordinates() {
    let cam = Camera { x: 30.0, y: -20.0, zoom: 1.0 };
    let world = cam.screen_to_world(pt(100.0, 50.0));
    assert_eq!(world, pt(70.0, 70.0));
}

#[test]
fn zoom_scales_world_coordinates() {
    let cam = Camera { x: 0.0, y: 0.0, zoom: 2.0 };
    let world = cam.screen_to_world(pt(100.0, 50.0));
    assert_eq!(world, pt(50.0, 25.0));
}

#[test]
fn screen_world_roundtrip() {
    let cam = Camera { x: 13.0, y: 41.0, zoom: 1.5 };
    let screen = pt(220.0, 180.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen));
    assert!((back.x - screen.x).abs() < 1e-9);
    assert!((back.y - screen.y).abs() < 1e-9);
}

#[test]
fn screen_dist_scales_by_zoom() {
    let cam = Camera { x: 0.0, y: 0.0, zoom: 4.0 };
    assert_eq!(cam.screen_dist_to_world(8.0), 2.0);
}

// =============================================================
// Viewport center
// =============================================================

#[test]
fn world_center_of_identity_camera() {
    let cam = Camera::default();
    assert_eq!(cam.world_center(800.0, 600.0), pt(400.0, 300.0));
}

#[test]
fn world_center_accounts_for_pan_and_zoom() {
    let cam = Camera { x: 100.0, y: 100.0, zoom: 2.0 };
    // Screen center (400, 300) -> world ((400-100)/2, (300-100)/2).
    assert_eq!(cam.world_center(800.0, 600.0), pt(150.0, 100.0));
}

// =============================================================
// Zoom clamping
// =============================================================

#[test]
fn set_zoom_clamps_to_range() {
    let mut cam = Camera::default();
    cam.set_zoom(0.01);
    assert_eq!(cam.zoom, MIN_ZOOM);
    cam.set_zoom(50.0);
    assert_eq!(cam.zoom, MAX_ZOOM);
    cam.set_zoom(1.7);
    assert_eq!(cam.zoom, 1.7);
}

// =============================================================
// Serde (presence viewport)
// =============================================================

#[test]
fn camera_serde_roundtrip() {
    let cam = Camera { x: 5.0, y: -8.0, zoom: 0.5 };
    let json = serde_json::to_string(&cam).unwrap();
    let back: Camera = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cam);
}
