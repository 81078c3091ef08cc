//! Viewport coordinate mapping.
//!
//! Pointer offsets arrive in displayed (logical) canvas pixels with a
//! top-left origin. Renderer viewports are expressed bottom-left. These
//! helpers bridge both conventions and produce the `[-1, 1]` coordinates a
//! camera needs to build a picking ray.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Displayed size of the drawing surface plus its device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Displayed width in logical pixels.
    pub width: f32,
    /// Displayed height in logical pixels.
    pub height: f32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Canvas {
    /// Create a canvas with a pixel ratio of 1.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    /// Builder: set the device pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Displayed size in logical pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Size of the backing store in physical pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(0.0) as u32,
            (self.height * self.pixel_ratio).round().max(0.0) as u32,
        )
    }
}

/// Canvas sub-rectangle in renderer convention (bottom-left origin, logical pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRegion {
    /// Left edge.
    pub x: f32,
    /// Bottom edge, measured up from the canvas bottom.
    pub y: f32,
    /// Width of the region.
    pub width: f32,
    /// Height of the region.
    pub height: f32,
}

impl ViewportRegion {
    /// Create a region from its bottom-left corner and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert into a top-left origin rectangle against the displayed canvas.
    pub fn to_rect(&self, canvas: &Canvas) -> PixelRect {
        PixelRect {
            x1: self.x,
            x2: self.x + self.width,
            y1: canvas.height - (self.y + self.height),
            y2: canvas.height - self.y,
        }
    }
}

impl From<Vec4> for ViewportRegion {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

/// Top-left origin rectangle in displayed canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    /// Left edge.
    pub x1: f32,
    /// Right edge.
    pub x2: f32,
    /// Top edge.
    pub y1: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl PixelRect {
    /// Inclusive containment test on all four edges.
    pub fn contains(&self, point: Vec2) -> bool {
        self.x1 <= point.x && point.x <= self.x2 && self.y1 <= point.y && point.y <= self.y2
    }
}

/// Whether a pointer offset falls inside `region`. No region means the whole canvas.
pub fn is_within_region(canvas: &Canvas, region: Option<&ViewportRegion>, offset: Vec2) -> bool {
    match region {
        None => true,
        Some(region) => region.to_rect(canvas).contains(offset),
    }
}

/// Map a pointer offset to normalized device coordinates, writing into `out`.
///
/// The vertical axis is flipped. Values are not clamped, so offsets outside
/// the canvas (or region) land outside `[-1, 1]`.
pub fn write_normalized_device_coordinates(
    canvas: &Canvas,
    offset: Vec2,
    region: Option<&ViewportRegion>,
    out: &mut Vec2,
) {
    match region {
        None => {
            out.x = (offset.x / canvas.width) * 2.0 - 1.0;
            out.y = -(offset.y / canvas.height) * 2.0 + 1.0;
        }
        Some(region) => {
            let rect = region.to_rect(canvas);
            out.x = ((offset.x - rect.x1) / region.width) * 2.0 - 1.0;
            out.y = -((offset.y - rect.y1) / region.height) * 2.0 + 1.0;
        }
    }
}

/// Map a pointer offset to normalized device coordinates.
pub fn to_normalized_device_coordinates(
    canvas: &Canvas,
    offset: Vec2,
    region: Option<&ViewportRegion>,
) -> Vec2 {
    let mut out = Vec2::ZERO;
    write_normalized_device_coordinates(canvas, offset, region, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn full_canvas_corners_and_center() {
        let canvas = Canvas::new(800.0, 600.0);
        assert!(approx(
            to_normalized_device_coordinates(&canvas, Vec2::new(400.0, 300.0), None),
            Vec2::ZERO
        ));
        assert!(approx(
            to_normalized_device_coordinates(&canvas, Vec2::ZERO, None),
            Vec2::new(-1.0, 1.0)
        ));
        assert!(approx(
            to_normalized_device_coordinates(&canvas, Vec2::new(800.0, 600.0), None),
            Vec2::new(1.0, -1.0)
        ));
    }

    #[test]
    fn pixel_ratio_does_not_change_mapping() {
        let canvas = Canvas::new(800.0, 600.0).with_pixel_ratio(2.0);
        assert_eq!(canvas.backing_size(), (1600, 1200));
        assert!(approx(
            to_normalized_device_coordinates(&canvas, Vec2::new(600.0, 150.0), None),
            Vec2::new(0.5, 0.5)
        ));
    }

    #[test]
    fn region_converts_from_bottom_left_origin() {
        let canvas = Canvas::new(800.0, 600.0);
        let region = ViewportRegion::new(0.0, 0.0, 400.0, 300.0);
        let rect = region.to_rect(&canvas);
        assert_eq!(
            rect,
            PixelRect {
                x1: 0.0,
                x2: 400.0,
                y1: 300.0,
                y2: 600.0
            }
        );

        assert!(is_within_region(&canvas, Some(&region), Vec2::new(200.0, 450.0)));
        assert!(!is_within_region(&canvas, Some(&region), Vec2::new(200.0, 100.0)));
        assert!(is_within_region(&canvas, None, Vec2::new(-5.0, -5.0)));
    }

    #[test]
    fn region_edges_are_inclusive() {
        let canvas = Canvas::new(800.0, 600.0);
        let region = ViewportRegion::from(Vec4::new(100.0, 100.0, 200.0, 200.0));
        assert!(is_within_region(&canvas, Some(&region), Vec2::new(100.0, 300.0)));
        assert!(is_within_region(&canvas, Some(&region), Vec2::new(300.0, 500.0)));
        assert!(!is_within_region(&canvas, Some(&region), Vec2::new(300.1, 500.0)));
    }

    #[test]
    fn region_relative_mapping() {
        let canvas = Canvas::new(800.0, 600.0);
        let region = ViewportRegion::new(400.0, 300.0, 400.0, 300.0);
        // Top-right quadrant: centre of region is (600, 150) in pointer space.
        let mut out = Vec2::splat(9.0);
        write_normalized_device_coordinates(&canvas, Vec2::new(600.0, 150.0), Some(&region), &mut out);
        assert!(approx(out, Vec2::ZERO));

        let corner =
            to_normalized_device_coordinates(&canvas, Vec2::new(400.0, 0.0), Some(&region));
        assert!(approx(corner, Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn oversized_region_is_not_clamped() {
        let canvas = Canvas::new(100.0, 100.0);
        let region = ViewportRegion::new(0.0, 0.0, 50.0, 50.0);
        let ndc = to_normalized_device_coordinates(&canvas, Vec2::new(100.0, 0.0), Some(&region));
        assert!(ndc.x > 1.0);
        assert!(ndc.y > 1.0);
    }
}
