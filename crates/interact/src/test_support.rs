//! Fixtures shared by the unit tests: a tinted material and a flat scene.

use crate::material::{Material, StateMaterial, StateMaterialSet, StateMaterialSetParams};
use crate::scene::{Intersection, Ray, RayCamera, SceneGraph};
use glam::{Vec2, Vec3};
use std::cell::Cell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Tint {
    pub name: &'static str,
    pub opacity: f32,
}

impl Material for Tint {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}

fn tint(name: &'static str) -> Option<StateMaterial<Tint>> {
    Some(StateMaterial::new(Tint { name, opacity: 1.0 }))
}

/// A set with a distinctly named visual in every slot.
pub fn tinted_set() -> StateMaterialSet<Tint> {
    StateMaterialSet::new(StateMaterialSetParams {
        normal: tint("normal"),
        over: tint("over"),
        down: tint("down"),
        disable: tint("disable"),
        normal_select: tint("normal_select"),
        over_select: tint("over_select"),
        down_select: tint("down_select"),
    })
    .expect("normal material present")
}

/// Axis-aligned rectangle facing +Z at height `z`, in NDC units.
#[derive(Debug, Clone, Copy)]
struct Panel {
    min: Vec2,
    max: Vec2,
    z: f32,
}

/// Flat scene: every node may own a panel; each panel reports two hits
/// (front and back face) so deduplication is exercised.
#[derive(Debug, Default)]
pub struct FlatScene {
    parents: HashMap<u32, u32>,
    children: HashMap<u32, Vec<u32>>,
    panels: HashMap<u32, Panel>,
    pub intersect_calls: Cell<usize>,
}

pub const ROOT: u32 = 0;

impl FlatScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: u32, parent: u32) -> &mut Self {
        self.parents.insert(node, parent);
        self.children.entry(parent).or_default().push(node);
        self
    }

    pub fn add_panel(&mut self, node: u32, parent: u32, min: Vec2, max: Vec2, z: f32) -> &mut Self {
        self.add(node, parent);
        self.panels.insert(node, Panel { min, max, z });
        self
    }

    fn collect(&self, node: u32, recursive: bool, out: &mut Vec<u32>) {
        out.push(node);
        if recursive {
            for child in self.children.get(&node).into_iter().flatten() {
                self.collect(*child, true, out);
            }
        }
    }
}

impl SceneGraph for FlatScene {
    type Node = u32;

    fn root(&self) -> u32 {
        ROOT
    }

    fn parent(&self, node: u32) -> Option<u32> {
        self.parents.get(&node).copied()
    }

    fn children(&self, node: u32) -> Vec<u32> {
        self.children.get(&node).cloned().unwrap_or_default()
    }

    fn intersect(&self, ray: &Ray, targets: &[u32], recursive: bool) -> Vec<Intersection<u32>> {
        self.intersect_calls.set(self.intersect_calls.get() + 1);
        let mut candidates = Vec::new();
        for target in targets {
            self.collect(*target, recursive, &mut candidates);
        }

        let mut hits = Vec::new();
        for node in candidates {
            let Some(panel) = self.panels.get(&node) else {
                continue;
            };
            let p = ray.origin.truncate();
            if p.x < panel.min.x || p.x > panel.max.x || p.y < panel.min.y || p.y > panel.max.y {
                continue;
            }
            let distance = ray.origin.z - panel.z;
            // Back face first so the host really is unsorted.
            hits.push(Intersection {
                object: node,
                distance: distance + 0.5,
                point: ray.at(distance + 0.5),
            });
            hits.push(Intersection {
                object: node,
                distance,
                point: ray.at(distance),
            });
        }
        hits
    }
}

/// Orthographic camera looking down -Z from `z = 10`; NDC maps 1:1 to world XY.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatCamera;

impl RayCamera for FlatCamera {
    fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        Ray::new(ndc.extend(10.0), Vec3::NEG_Z)
    }
}
