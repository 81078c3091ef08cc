//! Exclusive selection across a group of radio buttons.

use crate::event::{InteractionEvent, InteractionEventKind};
use crate::material::Material;
use crate::view::InteractiveViews;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, warn};

/// Keeps at most one member of a radio group selected.
///
/// The group only names its members; the handlers live in
/// [`InteractiveViews`] and are borrowed per call. The selected member is
/// also marked exclusive, which makes it ignore pointer input until another
/// member takes over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioButtonManager<N> {
    members: Vec<N>,
    selected: Option<N>,
}

impl<N> Default for RadioButtonManager<N> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            selected: None,
        }
    }
}

impl<N: Copy + Eq + Hash + fmt::Debug> RadioButtonManager<N> {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. Adding the same node twice is a no-op.
    pub fn add_interaction_handler(&mut self, node: N) {
        if !self.members.contains(&node) {
            self.members.push(node);
        }
    }

    /// Add several members in order.
    pub fn add_buttons(&mut self, nodes: impl IntoIterator<Item = N>) {
        for node in nodes {
            self.add_interaction_handler(node);
        }
    }

    /// Remove a member and return it.
    ///
    /// Removing the current selection leaves the group with none selected;
    /// the removed handler keeps its selection but accepts pointer input again.
    pub fn remove_interaction_handler<M, V>(
        &mut self,
        views: &mut InteractiveViews<N, M, V>,
        node: N,
    ) -> N
    where
        M: Material,
    {
        match self.members.iter().position(|member| *member == node) {
            Some(index) => {
                self.members.remove(index);
                if self.selected == Some(node) {
                    self.selected = None;
                    if let Some(handler) = views.handler_mut(node) {
                        handler.set_exclusive(false);
                    }
                    debug!(?node, "removed the selected radio button");
                }
            }
            None => warn!(?node, "removing a node that is not in the radio group"),
        }
        node
    }

    /// Make `node` the group's exclusive selection.
    ///
    /// The previous selection is deselected and unfrozen in the same step.
    /// Returns the group's `select` event, or `None` when nothing changed.
    pub fn select<M, V>(
        &mut self,
        views: &mut InteractiveViews<N, M, V>,
        node: N,
    ) -> Option<InteractionEvent<N>>
    where
        M: Material,
    {
        if !self.members.contains(&node) {
            warn!(?node, "selecting a node that is not in the radio group");
            return None;
        }
        let Some(handler) = views.handler(node) else {
            warn!(?node, "radio group member has no interactive view");
            return None;
        };
        if self.selected == Some(node) && handler.is_exclusively_selected() {
            return None;
        }

        if let Some(previous) = self.selected.take() {
            if let Some(handler) = views.handler_mut(previous) {
                handler.set_exclusive(false);
                handler.override_selection(false);
            }
        }
        if let Some(handler) = views.handler_mut(node) {
            handler.override_selection(true);
            handler.set_exclusive(true);
        }
        self.selected = Some(node);
        debug!(?node, "radio group selection changed");

        Some(InteractionEvent {
            kind: InteractionEventKind::Select,
            target: node,
            is_selected: Some(true),
        })
    }

    /// React to a handler event: a member reporting `select(true)` takes the selection.
    pub fn handle_event<M, V>(
        &mut self,
        views: &mut InteractiveViews<N, M, V>,
        event: &InteractionEvent<N>,
    ) -> Option<InteractionEvent<N>>
    where
        M: Material,
    {
        if event.kind != InteractionEventKind::Select || event.is_selected != Some(true) {
            return None;
        }
        if !self.members.contains(&event.target) {
            return None;
        }
        self.select(views, event.target)
    }

    /// Run [`RadioButtonManager::handle_event`] over a batch of events.
    pub fn forward<M, V>(
        &mut self,
        views: &mut InteractiveViews<N, M, V>,
        events: &[InteractionEvent<N>],
    ) -> Vec<InteractionEvent<N>>
    where
        M: Material,
    {
        events
            .iter()
            .filter_map(|event| self.handle_event(views, event))
            .collect()
    }

    /// Currently selected member.
    pub fn selected(&self) -> Option<N> {
        self.selected
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[N] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InteractionEventKind as Kind;
    use crate::handler::{InteractionHandler, InteractionState};
    use crate::test_support::{tinted_set, Tint};
    use crate::view::InteractiveView;

    type Views = InteractiveViews<u32, Tint, ()>;

    fn group_of(nodes: &[u32]) -> (RadioButtonManager<u32>, Views) {
        let mut views = Views::new();
        for node in nodes {
            views.insert(InteractiveView::mesh(
                *node,
                InteractionHandler::radio(Some(tinted_set())),
            ));
        }
        let mut group = RadioButtonManager::new();
        group.add_buttons(nodes.iter().copied());
        (group, views)
    }

    fn click(views: &mut Views, node: u32) -> Vec<InteractionEvent<u32>> {
        let mut out = Vec::new();
        let handler = views.handler_mut(node).unwrap();
        handler.pointer_over(node, &mut out);
        handler.pointer_down(node, &mut out);
        handler.pointer_up(node, &mut out);
        handler.pointer_out(node, &mut out);
        out
    }

    fn selected_members(group: &RadioButtonManager<u32>, views: &Views) -> Vec<u32> {
        group
            .members()
            .iter()
            .copied()
            .filter(|node| views.handler(*node).unwrap().is_exclusively_selected())
            .collect()
    }

    #[test]
    fn members_are_unique_and_ordered() {
        let mut group = RadioButtonManager::new();
        group.add_buttons([3u32, 1, 3, 2]);
        group.add_interaction_handler(1);
        assert_eq!(group.members(), &[3, 1, 2]);
        assert_eq!(group.len(), 3);
        assert!(!group.is_empty());
    }

    #[test]
    fn selecting_switches_exclusivity() {
        let (mut group, mut views) = group_of(&[1, 2, 3]);

        let event = group.select(&mut views, 1).unwrap();
        assert_eq!(event.kind, Kind::Select);
        assert_eq!(event.target, 1);
        assert_eq!(event.is_selected, Some(true));
        assert_eq!(selected_members(&group, &views), vec![1]);
        assert!(!views.handler(1).unwrap().check_activity());

        group.select(&mut views, 2).unwrap();
        assert_eq!(group.selected(), Some(2));
        assert_eq!(selected_members(&group, &views), vec![2]);
        let previous = views.handler(1).unwrap();
        assert_eq!(previous.selection(), Some(false));
        assert!(previous.check_activity());
        assert_eq!(previous.material().unwrap().material().name, "normal");
    }

    #[test]
    fn reselecting_is_silent() {
        let (mut group, mut views) = group_of(&[1, 2]);
        assert!(group.select(&mut views, 1).is_some());
        assert!(group.select(&mut views, 1).is_none());
        assert_eq!(selected_members(&group, &views), vec![1]);
    }

    #[test]
    fn non_members_are_ignored() {
        let (mut group, mut views) = group_of(&[1, 2]);
        views.insert(InteractiveView::mesh(9, InteractionHandler::radio(None)));
        assert!(group.select(&mut views, 9).is_none());
        assert_eq!(group.selected(), None);
        assert_eq!(views.handler(9).unwrap().selection(), Some(false));
    }

    #[test]
    fn clicks_route_through_the_group() {
        let (mut group, mut views) = group_of(&[1, 2]);

        let events = click(&mut views, 1);
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![Kind::Over, Kind::Down, Kind::Up, Kind::Click, Kind::Select, Kind::Out]
        );
        let group_events = group.forward(&mut views, &events);
        assert_eq!(group_events.len(), 1);
        assert_eq!(group.selected(), Some(1));

        // The exclusive member ignores further clicks.
        let events = click(&mut views, 1);
        assert!(events.iter().all(|e| e.kind != Kind::Click));
        assert!(group.forward(&mut views, &events).is_empty());

        let events = click(&mut views, 2);
        assert_eq!(group.forward(&mut views, &events).len(), 1);
        assert_eq!(selected_members(&group, &views), vec![2]);
        assert_eq!(views.handler(1).unwrap().state(), InteractionState::Normal);
    }

    #[test]
    fn deselect_events_are_not_forwarded() {
        let (mut group, mut views) = group_of(&[1]);
        let event = InteractionEvent {
            kind: Kind::Select,
            target: 1,
            is_selected: Some(false),
        };
        assert!(group.handle_event(&mut views, &event).is_none());
        assert_eq!(group.selected(), None);
    }

    #[test]
    fn removing_selection_clears_it() {
        let (mut group, mut views) = group_of(&[1, 2]);
        group.select(&mut views, 2);
        assert_eq!(group.remove_interaction_handler(&mut views, 2), 2);
        assert_eq!(group.selected(), None);
        assert_eq!(group.members(), &[1]);

        assert_eq!(group.remove_interaction_handler(&mut views, 7), 7);
        assert_eq!(group.members(), &[1]);
    }

    #[test]
    fn removed_selection_is_clickable_again() {
        let (mut group, mut views) = group_of(&[1, 2]);
        group.select(&mut views, 2);
        group.remove_interaction_handler(&mut views, 2);

        let handler = views.handler(2).unwrap();
        assert!(!handler.is_exclusively_selected());
        assert!(handler.check_activity());
        assert_eq!(handler.selection(), Some(true));

        let events = click(&mut views, 2);
        assert!(events.iter().any(|e| e.kind == Kind::Click));
        assert_eq!(views.handler(2).unwrap().selection(), Some(false));
        assert!(group.forward(&mut views, &events).is_empty());
    }

    #[test]
    fn selection_overrides_disabled_members() {
        let (mut group, mut views) = group_of(&[1, 2]);
        views.handler_mut(2).unwrap().disable();
        assert!(group.select(&mut views, 2).is_some());
        assert_eq!(views.handler(2).unwrap().selection(), Some(true));
        assert_eq!(
            views.handler(2).unwrap().material().unwrap().material().name,
            "disable"
        );
    }
}
