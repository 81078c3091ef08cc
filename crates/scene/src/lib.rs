#![warn(missing_docs)]
//! Reference scene graph for meshpick.
//!
//! A small arena of nodes with local transforms and optional pickable
//! geometry (boxes, planes and camera-facing billboards), a perspective
//! camera that produces picking rays, and a flat-colour material. It
//! implements the [`meshpick_interact::SceneGraph`] and
//! [`meshpick_interact::RayCamera`] capabilities so the pointer layer can
//! run against it headlessly.

pub mod camera;
pub mod geometry;
pub mod graph;
pub mod material;

pub use camera::PerspectiveCamera;
pub use geometry::{intersect_triangle, raycast_billboard, Geometry, SurfaceHit};
pub use graph::{Node, NodeId, Scene, Transform};
pub use material::BasicMaterial;
