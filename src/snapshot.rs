//! Snapshot Renderer
//!
//! Projects a finished event sequence through an auto-fitted camera and
//! saves it as a PNG.

use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::info;

use foliage::{Color, DrawEvent, EventSummary, Vec3};

/// Side length of the ground plane under the structure
pub const GROUND_SIZE: f64 = 4.0;

const BACKGROUND: [u8; 4] = [20, 20, 31, 255];
const GROUND: Color = Color::from_hex(0x1f5f1f);

/// Which event kinds to draw
#[derive(Debug, Clone, Copy)]
pub struct Layers {
    pub points: bool,
    pub arrows: bool,
    pub markers: bool,
    pub ground: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            points: true,
            arrows: true,
            markers: true,
            ground: true,
        }
    }
}

/// Orthographic camera looking at `target`
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    target: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Camera looking at `target` from direction `offset`
    pub fn looking_at(target: Vec3, offset: Vec3) -> Self {
        let forward = (-offset).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        Self { target, right, up }
    }

    /// Fit the camera on the events' bounding box, viewed from a 3/4 angle
    pub fn auto_fit(summary: &EventSummary) -> Self {
        let center = summary.center().unwrap_or(Vec3::ZERO);
        Self::looking_at(center, Vec3::new(0.3, 0.4, 1.0))
    }

    /// View-plane coordinates of a world position
    pub fn project(&self, p: Vec3) -> [f64; 2] {
        let d = p - self.target;
        [d.dot(self.right), d.dot(self.up)]
    }
}

/// Corners of the ground plane, centered on the origin
pub fn ground_corners() -> [Vec3; 4] {
    let h = GROUND_SIZE / 2.0;
    [
        Vec3::new(-h, 0.0, -h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(h, 0.0, h),
        Vec3::new(-h, 0.0, h),
    ]
}

/// Render events into an image of `size` x `size` pixels
pub fn render(events: &[DrawEvent], size: u32, layers: Layers) -> RgbaImage {
    let summary = EventSummary::from_events(events);
    let camera = Camera::auto_fit(&summary);

    // Scale so everything drawn fits with a margin
    let mut extent: f64 = 1e-6;
    let mut include = |p: Vec3| {
        let [x, y] = camera.project(p);
        extent = extent.max(x.abs()).max(y.abs());
    };
    for event in events {
        for p in event.extent() {
            include(p);
        }
    }
    if layers.ground {
        for corner in ground_corners() {
            include(corner);
        }
    }

    let half = size as f64 / 2.0;
    let scale = half * 0.9 / extent;
    let to_pixel = |p: Vec3| {
        let [x, y] = camera.project(p);
        [half + x * scale, half - y * scale]
    };

    let mut img = RgbaImage::from_pixel(size, size, Rgba(BACKGROUND));

    if layers.ground {
        let corners = ground_corners();
        for i in 0..corners.len() {
            let a = to_pixel(corners[i]);
            let b = to_pixel(corners[(i + 1) % corners.len()]);
            draw_line(&mut img, a, b, GROUND);
        }
    }

    for event in events {
        match *event {
            DrawEvent::Arrow {
                origin,
                direction,
                length,
                color,
            } if layers.arrows => {
                draw_line(&mut img, to_pixel(origin), to_pixel(origin + direction * length), color);
            }
            DrawEvent::Point {
                position,
                color,
                marker,
            } if (marker && layers.markers) || (!marker && layers.points) => {
                draw_dot(&mut img, to_pixel(position), color);
            }
            _ => {}
        }
    }

    img
}

/// Render and write a PNG
pub fn save(events: &[DrawEvent], path: &Path, size: u32, layers: Layers) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let img = render(events, size, layers);
    img.save(path)?;
    info!("Saved {}", path.display());
    Ok(())
}

fn put(img: &mut RgbaImage, x: f64, y: f64, color: Color) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
    }
}

fn draw_line(img: &mut RgbaImage, a: [f64; 2], b: [f64; 2], color: Color) {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        put(img, a[0] + dx * t, a[1] + dy * t, color);
    }
}

fn draw_dot(img: &mut RgbaImage, p: [f64; 2], color: Color) {
    for oy in -1..=1 {
        for ox in -1..=1 {
            put(img, p[0] + ox as f64, p[1] + oy as f64, color);
        }
    }
}
