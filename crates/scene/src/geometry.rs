//! Pickable geometry and ray tests.

use glam::{Mat4, Vec2, Vec3};
use meshpick_interact::Ray;

const EPSILON: f32 = 1e-6;
/// Hits closer than this along one ray are the same surface point.
const COINCIDENT: f32 = 1e-4;

/// Shape attached to a scene node, in the node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centred on the origin.
    Box {
        /// Edge lengths.
        size: Vec3,
    },
    /// Rectangle in the XY plane centred on the origin, visible from both sides.
    Plane {
        /// Width and height.
        size: Vec2,
    },
    /// Camera-facing quad centred on the node's origin.
    Billboard {
        /// Width and height.
        size: Vec2,
    },
}

/// One surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

impl Geometry {
    /// Unit cube.
    pub fn cube(edge: f32) -> Self {
        Self::Box {
            size: Vec3::splat(edge),
        }
    }

    /// Flat rectangle.
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane {
            size: Vec2::new(width, height),
        }
    }

    /// Camera-facing quad.
    pub fn billboard(width: f32, height: f32) -> Self {
        Self::Billboard {
            size: Vec2::new(width, height),
        }
    }

    /// Every hit of `ray` against this shape placed by `world`.
    ///
    /// Triangle meshes report one hit per crossed surface, so a ray through
    /// a box yields both the entry and the exit face. A ray through an edge
    /// shared by two triangles counts once.
    pub fn raycast(&self, ray: &Ray, world: &Mat4) -> Vec<SurfaceHit> {
        match *self {
            Self::Box { size } => raycast_triangles(ray, world, &box_triangles(size)),
            Self::Plane { size } => raycast_triangles(ray, world, &plane_triangles(size)),
            Self::Billboard { size } => {
                let (scale, _, center) = world.to_scale_rotation_translation();
                let size = size * scale.truncate();
                raycast_billboard(ray, center, size).into_iter().collect()
            }
        }
    }
}

type Triangle = [Vec3; 3];

fn box_triangles(size: Vec3) -> Vec<Triangle> {
    let h = size * 0.5;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    // Each face as a quad (counter-clockwise seen from outside).
    let faces = [
        [corner(-1.0, -1.0, 1.0), corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)],
        [corner(1.0, -1.0, -1.0), corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0)],
        [corner(1.0, -1.0, 1.0), corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0)],
        [corner(-1.0, -1.0, -1.0), corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0)],
        [corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0), corner(-1.0, 1.0, -1.0)],
        [corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0), corner(-1.0, -1.0, 1.0)],
    ];
    faces.iter().flat_map(|quad| split_quad(*quad)).collect()
}

fn plane_triangles(size: Vec2) -> Vec<Triangle> {
    let h = size * 0.5;
    split_quad([
        Vec3::new(-h.x, -h.y, 0.0),
        Vec3::new(h.x, -h.y, 0.0),
        Vec3::new(h.x, h.y, 0.0),
        Vec3::new(-h.x, h.y, 0.0),
    ])
    .to_vec()
}

fn split_quad([a, b, c, d]: [Vec3; 4]) -> [Triangle; 2] {
    [[a, b, c], [a, c, d]]
}

fn raycast_triangles(ray: &Ray, world: &Mat4, triangles: &[Triangle]) -> Vec<SurfaceHit> {
    let mut hits: Vec<SurfaceHit> = triangles
        .iter()
        .filter_map(|[a, b, c]| {
            let a = world.transform_point3(*a);
            let b = world.transform_point3(*b);
            let c = world.transform_point3(*c);
            intersect_triangle(ray, a, b, c).map(|distance| SurfaceHit {
                distance,
                point: ray.at(distance),
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits.dedup_by(|later, earlier| (later.distance - earlier.distance).abs() <= COINCIDENT);
    hits
}

/// Double-sided Möller-Trumbore test. Returns the distance along the ray.
pub fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    // Ray parallel to the triangle plane, or degenerate triangle.
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Hit test against a quad that faces the ray origin.
pub fn raycast_billboard(ray: &Ray, center: Vec3, size: Vec2) -> Option<SurfaceHit> {
    let to_camera = (ray.origin - center).normalize_or_zero();
    if to_camera == Vec3::ZERO {
        return None;
    }

    // Billboard basis; falls back to Z when looking straight up or down.
    let mut right = Vec3::Y.cross(to_camera);
    if right.length_squared() < EPSILON {
        right = Vec3::Z.cross(to_camera);
    }
    let right = right.normalize();
    let up = to_camera.cross(right);

    let denom = ray.direction.dot(to_camera);
    if denom.abs() < 1e-4 {
        return None;
    }
    let t = (center - ray.origin).dot(to_camera) / denom;
    if t < 0.0 {
        return None;
    }

    let point = ray.at(t);
    let local = point - center;
    let half = size * 0.5;
    if local.dot(right).abs() <= half.x && local.dot(up).abs() <= half.y {
        Some(SurfaceHit { distance: t, point })
    } else {
        None
    }
}
