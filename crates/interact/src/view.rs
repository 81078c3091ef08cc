//! Interactive views: a scene node bound to its interaction handler.

use crate::handler::InteractionHandler;
use crate::material::StateMaterial;
use std::collections::HashMap;
use std::hash::Hash;

/// Scene-graph flavour of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Geometry with a material.
    Mesh,
    /// Camera-facing quad with a material.
    Sprite,
    /// Container without a material of its own; its descendants are the hit proxies.
    Group,
}

/// A scene node carrying an interaction handler.
#[derive(Debug, Clone)]
pub struct InteractiveView<N, M, V> {
    node: N,
    kind: ViewKind,
    handler: InteractionHandler<M, V>,
}

impl<N: Copy, M, V> InteractiveView<N, M, V> {
    /// Bind `handler` to `node`.
    pub fn new(node: N, kind: ViewKind, handler: InteractionHandler<M, V>) -> Self {
        Self {
            node,
            kind,
            handler,
        }
    }

    /// Mesh view.
    pub fn mesh(node: N, handler: InteractionHandler<M, V>) -> Self {
        Self::new(node, ViewKind::Mesh, handler)
    }

    /// Sprite view.
    pub fn sprite(node: N, handler: InteractionHandler<M, V>) -> Self {
        Self::new(node, ViewKind::Sprite, handler)
    }

    /// Group view.
    pub fn group(node: N, handler: InteractionHandler<M, V>) -> Self {
        Self::new(node, ViewKind::Group, handler)
    }

    /// Node the view is bound to.
    pub fn node(&self) -> N {
        self.node
    }

    /// View flavour.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// The handler.
    pub fn handler(&self) -> &InteractionHandler<M, V> {
        &self.handler
    }

    /// The handler, mutably.
    pub fn handler_mut(&mut self) -> &mut InteractionHandler<M, V> {
        &mut self.handler
    }

    /// Material currently assigned to the view. Groups never have one.
    pub fn material(&self) -> Option<&StateMaterial<M>> {
        match self.kind {
            ViewKind::Group => None,
            ViewKind::Mesh | ViewKind::Sprite => self.handler.material(),
        }
    }
}

/// Every interactive view of a scene, keyed by node.
///
/// A node "carries a handler" exactly when it has an entry here.
#[derive(Debug, Clone)]
pub struct InteractiveViews<N, M, V> {
    views: HashMap<N, InteractiveView<N, M, V>>,
}

impl<N, M, V> Default for InteractiveViews<N, M, V> {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash, M, V> InteractiveViews<N, M, V> {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view, returning the one it replaces.
    pub fn insert(&mut self, view: InteractiveView<N, M, V>) -> Option<InteractiveView<N, M, V>> {
        self.views.insert(view.node(), view)
    }

    /// Remove the view bound to `node`.
    pub fn remove(&mut self, node: N) -> Option<InteractiveView<N, M, V>> {
        self.views.remove(&node)
    }

    /// Whether `node` carries a handler.
    pub fn contains(&self, node: N) -> bool {
        self.views.contains_key(&node)
    }

    /// View bound to `node`.
    pub fn get(&self, node: N) -> Option<&InteractiveView<N, M, V>> {
        self.views.get(&node)
    }

    /// View bound to `node`, mutably.
    pub fn get_mut(&mut self, node: N) -> Option<&mut InteractiveView<N, M, V>> {
        self.views.get_mut(&node)
    }

    /// Handler bound to `node`.
    pub fn handler(&self, node: N) -> Option<&InteractionHandler<M, V>> {
        self.views.get(&node).map(InteractiveView::handler)
    }

    /// Handler bound to `node`, mutably.
    pub fn handler_mut(&mut self, node: N) -> Option<&mut InteractionHandler<M, V>> {
        self.views.get_mut(&node).map(InteractiveView::handler_mut)
    }

    /// Number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether there are no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Iterate over all views in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &InteractiveView<N, M, V>> {
        self.views.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tinted_set, Tint};

    #[test]
    fn group_views_have_no_material() {
        let group: InteractiveView<u32, Tint, ()> =
            InteractiveView::group(3, InteractionHandler::button(Some(tinted_set())));
        assert_eq!(group.kind(), ViewKind::Group);
        assert!(group.material().is_none());

        let mesh: InteractiveView<u32, Tint, ()> =
            InteractiveView::mesh(4, InteractionHandler::button(Some(tinted_set())));
        assert_eq!(mesh.material().unwrap().material().name, "normal");
    }

    #[test]
    fn collection_is_keyed_by_node() {
        let mut views: InteractiveViews<u32, Tint, ()> = InteractiveViews::new();
        assert!(views.is_empty());
        views.insert(InteractiveView::sprite(1, InteractionHandler::button(None)));
        views.insert(InteractiveView::mesh(2, InteractionHandler::checkbox(None)));
        assert_eq!(views.len(), 2);
        assert!(views.contains(1));
        assert_eq!(views.get(1).unwrap().kind(), ViewKind::Sprite);

        let replaced = views.insert(InteractiveView::mesh(1, InteractionHandler::radio(None)));
        assert_eq!(replaced.unwrap().kind(), ViewKind::Sprite);
        assert_eq!(views.len(), 2);

        views.handler_mut(2).unwrap().disable();
        assert!(!views.handler(2).unwrap().is_enabled());
        assert!(views.remove(2).is_some());
        assert!(!views.contains(2));
    }
}
