//! Capabilities the interaction layer consumes from the host scene graph.

use glam::{Vec2, Vec3};
use std::fmt::Debug;
use std::hash::Hash;

/// A picking ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin (usually the camera position).
    pub origin: Vec3,
    /// Normalized direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether origin and direction are usable for intersection tests.
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite() && self.direction != Vec3::ZERO
    }
}

/// One raw hit reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection<N> {
    /// The node whose geometry was hit (may be a non-interactive descendant).
    pub object: N,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Scene graph operations used for picking.
///
/// Hits from [`SceneGraph::intersect`] may be unsorted and may contain
/// several entries for one object (one per face); the pointer manager
/// sorts and deduplicates them itself.
pub trait SceneGraph {
    /// Node identity. Cheap to copy and compare.
    type Node: Copy + Eq + Hash + Debug;

    /// The scene root; parent walks stop here.
    fn root(&self) -> Self::Node;

    /// Parent of `node`, `None` for the root or detached nodes.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Direct children of `node` in insertion order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Cast `ray` against `targets`, descending into children when `recursive`.
    fn intersect(
        &self,
        ray: &Ray,
        targets: &[Self::Node],
        recursive: bool,
    ) -> Vec<Intersection<Self::Node>>;
}

/// A camera able to build a picking ray from normalized device coordinates.
pub trait RayCamera {
    /// Ray through `ndc` (`[-1, 1]` on both axes, Y up).
    fn ray_from_ndc(&self, ndc: Vec2) -> Ray;
}
