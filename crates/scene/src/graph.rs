//! Node arena with parent links and local transforms.

use crate::geometry::Geometry;
use glam::{Mat4, Quat, Vec3};
use meshpick_interact::{Intersection, Ray, SceneGraph};
use std::fmt;
use tracing::trace;

/// Stable index of a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The scene root.
    pub const ROOT: NodeId = NodeId(0);

    /// Raw index.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Local placement relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent's origin.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder: replace the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: replace the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// One scene node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Debug name.
    pub name: String,
    /// Placement relative to the parent.
    pub transform: Transform,
    /// Pickable shape, if any. Groups have none.
    pub geometry: Option<Geometry>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Parent node; `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene graph. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                name: "root".to_string(),
                transform: Transform::default(),
                geometry: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }
}

impl Scene {
    /// Scene holding only the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without geometry.
    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform) -> NodeId {
        self.insert(parent, name.into(), transform, None)
    }

    /// Add a node with pickable geometry.
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        geometry: Geometry,
    ) -> NodeId {
        self.insert(parent, name.into(), transform, Some(geometry))
    }

    fn insert(
        &mut self,
        parent: NodeId,
        name: String,
        transform: Transform,
        geometry: Option<Geometry>,
    ) -> NodeId {
        // Unknown parents attach to the root.
        let parent = if self.contains(parent) {
            parent
        } else {
            NodeId::ROOT
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            transform,
            geometry,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Whether `id` names a node of this scene.
    pub fn contains(&self, id: NodeId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Node by id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node called `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(|index| NodeId(index as u32))
    }

    /// Local-to-world matrix of `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.node(id)) {
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    fn collect(&self, id: NodeId, recursive: bool, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.push(id);
        if recursive {
            for child in &node.children {
                self.collect(*child, true, out);
            }
        }
    }
}

impl SceneGraph for Scene {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(Node::parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn intersect(&self, ray: &Ray, targets: &[NodeId], recursive: bool) -> Vec<Intersection<NodeId>> {
        let mut candidates = Vec::new();
        for target in targets {
            self.collect(*target, recursive, &mut candidates);
        }

        let mut hits = Vec::new();
        for id in candidates {
            let Some(geometry) = self.node(id).and_then(|node| node.geometry) else {
                continue;
            };
            let world = self.world_matrix(id);
            hits.extend(geometry.raycast(ray, &world).into_iter().map(|hit| Intersection {
                object: id,
                distance: hit.distance,
                point: hit.point,
            }));
        }
        trace!(hits = hits.len(), "scene raycast");
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_link_to_parents_and_children() {
        let mut scene = Scene::new();
        let group = scene.add_group(NodeId::ROOT, "panel", Transform::default());
        let knob = scene.add_mesh(group, "knob", Transform::default(), Geometry::cube(1.0));

        assert_eq!(scene.parent(knob), Some(group));
        assert_eq!(scene.parent(group), Some(NodeId::ROOT));
        assert_eq!(scene.parent(NodeId::ROOT), None);
        assert_eq!(scene.children(NodeId::ROOT), vec![group]);
        assert_eq!(scene.find("knob"), Some(knob));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn world_matrix_composes_ancestors() {
        let mut scene = Scene::new();
        let outer = scene.add_group(
            NodeId::ROOT,
            "outer",
            Transform::from_translation(Vec3::X).with_scale(Vec3::splat(2.0)),
        );
        let inner = scene.add_group(outer, "inner", Transform::from_translation(Vec3::Y));
        let origin = scene.world_matrix(inner).transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn intersect_honours_recursion() {
        let mut scene = Scene::new();
        let group = scene.add_group(NodeId::ROOT, "group", Transform::default());
        let plane = scene.add_mesh(group, "plane", Transform::default(), Geometry::plane(1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let hits = scene.intersect(&ray, &[group], true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, plane);
        assert!(scene.intersect(&ray, &[group], false).is_empty());
    }

    #[test]
    fn unknown_parent_attaches_to_root() {
        let mut scene = Scene::new();
        let stray = scene.add_group(NodeId(42), "stray", Transform::default());
        assert_eq!(scene.parent(stray), Some(NodeId::ROOT));
    }
}
