//! Pointer event manager: raycast dispatch from device pointer events to handlers.
//!
//! The manager turns raw pointer events into semantic interaction events:
//!
//! 1. map the pointer offset into normalized device coordinates (optionally
//!    inside a viewport region, skipping the raycast entirely outside it),
//! 2. cast a camera ray against the target list,
//! 3. sort hits nearest-first and keep one hit per object,
//! 4. walk each hit up the hierarchy to the first node carrying a handler;
//!    the nearest hit that resolves wins,
//! 5. update hover/press bookkeeping and drive the handler state machine.
//!
//! Hover tracking on pointer-move is throttled by a render clock; presses and
//! releases never are.

use crate::clock::{TickSource, TickSubscription};
use crate::error::InteractionError;
use crate::event::{InteractionEvent, PointerEvent, PointerEventKind};
use crate::material::Material;
use crate::scene::{Intersection, RayCamera, SceneGraph};
use crate::throttle::{Throttle, DEFAULT_THROTTLING_TIME_MS};
use crate::view::InteractiveViews;
use crate::viewport::{
    is_within_region, write_normalized_device_coordinates, Canvas, ViewportRegion,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use tracing::{debug, info, trace};

/// Tunables for [`PointerEventManager`].
///
/// `targets` holds scene nodes, so it is never read from or written to
/// configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerManagerOptions<N> {
    /// Minimum frame time between two hover raycasts. `0` disables throttling.
    pub throttling_time_ms: f64,
    /// Descend into the children of every target while raycasting.
    pub recursive: bool,
    /// Raycast roots; `None` uses the scene root's live children.
    #[serde(skip)]
    pub targets: Option<Vec<N>>,
    /// Restrict hit testing to this part of the canvas.
    pub viewport: Option<ViewportRegion>,
}

impl<N> Default for PointerManagerOptions<N> {
    fn default() -> Self {
        Self {
            throttling_time_ms: DEFAULT_THROTTLING_TIME_MS,
            recursive: true,
            targets: None,
            viewport: None,
        }
    }
}

/// Root objects handed to the raycaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetList<N> {
    /// The scene root's children, looked up on every raycast.
    SceneChildren,
    /// A fixed list supplied by the caller.
    Explicit(Vec<N>),
}

/// Routes pointer events on one canvas to the interactive views of a scene.
pub struct PointerEventManager<N, C> {
    camera: C,
    canvas: Canvas,
    viewport: Option<ViewportRegion>,
    targets: TargetList<N>,
    recursive: bool,
    throttle: Rc<RefCell<Throttle>>,
    clock: Box<dyn TickSource>,
    subscription: Option<TickSubscription>,
    hovered: Option<N>,
    pressed: Option<N>,
    ndc: Vec2,
    disposed: bool,
}

impl<N, C> PointerEventManager<N, C>
where
    N: Copy + Eq + Hash + fmt::Debug,
    C: RayCamera,
{
    /// Create a manager and subscribe it to `clock`.
    ///
    /// Fails when the throttling interval is negative or not finite.
    pub fn new(
        camera: C,
        canvas: Canvas,
        clock: impl TickSource + 'static,
        options: PointerManagerOptions<N>,
    ) -> Result<Self, InteractionError> {
        let throttle = Rc::new(RefCell::new(Throttle::new(options.throttling_time_ms)?));
        let clock: Box<dyn TickSource> = Box::new(clock);

        let shared = Rc::clone(&throttle);
        let subscription = clock.subscribe(Box::new(move |delta_ms| {
            if let Ok(mut throttle) = shared.try_borrow_mut() {
                throttle.tick(delta_ms);
            }
        }));

        debug!(
            throttling_time_ms = options.throttling_time_ms,
            recursive = options.recursive,
            targets = ?options.targets,
            viewport = ?options.viewport,
            "pointer event manager created"
        );

        Ok(Self {
            camera,
            canvas,
            viewport: options.viewport,
            targets: options.targets.map_or(TargetList::SceneChildren, TargetList::Explicit),
            recursive: options.recursive,
            throttle,
            clock,
            subscription: Some(subscription),
            hovered: None,
            pressed: None,
            ndc: Vec2::ZERO,
            disposed: false,
        })
    }

    /// Builder: raycast against an explicit target list instead of the scene's children.
    pub fn with_targets(mut self, targets: Vec<N>) -> Self {
        self.targets = TargetList::Explicit(targets);
        self
    }

    /// Replace the target list; `None` goes back to the scene's live children.
    pub fn set_targets(&mut self, targets: Option<Vec<N>>) {
        self.targets = match targets {
            Some(list) => TargetList::Explicit(list),
            None => TargetList::SceneChildren,
        };
    }

    /// Current target list.
    pub fn targets(&self) -> &TargetList<N> {
        &self.targets
    }

    /// Whether raycasting descends into children.
    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// Set whether raycasting descends into children.
    pub fn set_recursive(&mut self, recursive: bool) {
        self.recursive = recursive;
    }

    /// Viewport region constraining hit testing.
    pub fn viewport(&self) -> Option<&ViewportRegion> {
        self.viewport.as_ref()
    }

    /// Replace the viewport region.
    pub fn set_viewport(&mut self, viewport: Option<ViewportRegion>) {
        self.viewport = viewport;
    }

    /// Canvas the pointer events refer to.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Update the canvas after a resize.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// The picking camera.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// The picking camera, mutably.
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    /// Configured throttling interval.
    pub fn throttling_time_ms(&self) -> f64 {
        self.throttle.borrow().interval_ms()
    }

    /// Snapshot of the throttle state.
    pub fn throttle(&self) -> Throttle {
        self.throttle.borrow().clone()
    }

    /// Node currently under the pointer.
    pub fn hovered(&self) -> Option<N> {
        self.hovered
    }

    /// Node holding the current press.
    pub fn pressed(&self) -> Option<N> {
        self.pressed
    }

    /// Whether [`PointerEventManager::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Process one pointer event and return the interaction events it caused.
    ///
    /// Cancel and leave behave like a release with no target: hover and
    /// press are cleared without a click. Ignored after disposal.
    pub fn handle_pointer_event<S, M, V>(
        &mut self,
        scene: &S,
        views: &mut InteractiveViews<N, M, V>,
        event: &PointerEvent,
    ) -> Vec<InteractionEvent<N>>
    where
        S: SceneGraph<Node = N>,
        M: Material,
    {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }
        match event.kind {
            PointerEventKind::Move => self.on_pointer_move(scene, views, event, &mut out),
            PointerEventKind::Down => self.on_pointer_down(scene, views, event, &mut out),
            PointerEventKind::Up => self.on_pointer_up(scene, views, event, &mut out),
            PointerEventKind::Cancel | PointerEventKind::Leave => {
                self.release_all(views, &mut out);
            }
        }
        out
    }

    /// Raycast for `event`: nearest-first, one hit per object.
    ///
    /// Returns nothing, without raycasting, when a viewport region is set
    /// and the pointer lies outside it.
    pub fn get_intersects<S>(&mut self, scene: &S, event: &PointerEvent) -> Vec<Intersection<N>>
    where
        S: SceneGraph<Node = N>,
    {
        if !is_within_region(&self.canvas, self.viewport.as_ref(), event.offset) {
            trace!(offset = ?event.offset, "pointer outside viewport region");
            return Vec::new();
        }

        write_normalized_device_coordinates(
            &self.canvas,
            event.offset,
            self.viewport.as_ref(),
            &mut self.ndc,
        );
        let ray = self.camera.ray_from_ndc(self.ndc);
        if !ray.is_finite() {
            debug!(ndc = ?self.ndc, "skipping raycast with degenerate ray");
            return Vec::new();
        }

        let children;
        let targets: &[N] = match &self.targets {
            TargetList::SceneChildren => {
                children = scene.children(scene.root());
                &children
            }
            TargetList::Explicit(list) => list,
        };

        deduplicate_intersections(scene.intersect(&ray, targets, self.recursive))
    }

    /// Release the clock subscription and clear hover and press.
    ///
    /// Emits a final `out` for the hovered node (and `up` for a pending
    /// press) so no view stays stuck. Calling it again does nothing.
    pub fn dispose<M, V>(&mut self, views: &mut InteractiveViews<N, M, V>) -> Vec<InteractionEvent<N>>
    where
        M: Material,
    {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }
        self.disposed = true;

        if let Some(subscription) = self.subscription.take() {
            self.clock.unsubscribe(subscription);
        }
        self.release_all(views, &mut out);
        self.throttle.borrow_mut().detach();

        info!("pointer event manager disposed");
        out
    }

    fn on_pointer_move<S, M, V>(
        &mut self,
        scene: &S,
        views: &mut InteractiveViews<N, M, V>,
        event: &PointerEvent,
        out: &mut Vec<InteractionEvent<N>>,
    ) where
        S: SceneGraph<Node = N>,
        M: Material,
    {
        if !self.throttle.borrow_mut().try_acquire() {
            trace!("pointer move throttled");
            return;
        }
        let target = self.resolve_target(scene, views, event);
        self.sync_hover(views, target, out);
    }

    fn on_pointer_down<S, M, V>(
        &mut self,
        scene: &S,
        views: &mut InteractiveViews<N, M, V>,
        event: &PointerEvent,
        out: &mut Vec<InteractionEvent<N>>,
    ) where
        S: SceneGraph<Node = N>,
        M: Material,
    {
        // Touch input has no hover phase, so presses resolve hover first.
        let target = self.resolve_target(scene, views, event);
        self.sync_hover(views, target, out);

        if let Some(previous) = self.pressed.take() {
            if Some(previous) != target {
                release(views, previous, out);
            }
        }

        let Some(target) = target else {
            return;
        };
        if let Some(handler) = views.handler_mut(target) {
            handler.pointer_down(target, out);
            if handler.is_press() {
                self.pressed = Some(target);
            }
        }
    }

    fn on_pointer_up<S, M, V>(
        &mut self,
        scene: &S,
        views: &mut InteractiveViews<N, M, V>,
        event: &PointerEvent,
        out: &mut Vec<InteractionEvent<N>>,
    ) where
        S: SceneGraph<Node = N>,
        M: Material,
    {
        let target = self.resolve_target(scene, views, event);
        self.sync_hover(views, target, out);

        let pressed = self.pressed.take();
        if let Some(target) = target {
            release(views, target, out);
        }
        if let Some(pressed) = pressed {
            if Some(pressed) != target {
                release(views, pressed, out);
            }
        }
    }

    fn release_all<M, V>(
        &mut self,
        views: &mut InteractiveViews<N, M, V>,
        out: &mut Vec<InteractionEvent<N>>,
    ) where
        M: Material,
    {
        self.sync_hover(views, None, out);
        if let Some(pressed) = self.pressed.take() {
            release(views, pressed, out);
        }
    }

    fn resolve_target<S, M, V>(
        &mut self,
        scene: &S,
        views: &InteractiveViews<N, M, V>,
        event: &PointerEvent,
    ) -> Option<N>
    where
        S: SceneGraph<Node = N>,
    {
        let target = self
            .get_intersects(scene, event)
            .iter()
            .find_map(|hit| check_target(scene, views, hit.object));
        trace!(?target, kind = ?event.kind, "resolved pointer target");
        target
    }

    fn sync_hover<M, V>(
        &mut self,
        views: &mut InteractiveViews<N, M, V>,
        target: Option<N>,
        out: &mut Vec<InteractionEvent<N>>,
    ) where
        M: Material,
    {
        if self.hovered == target {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            if let Some(handler) = views.handler_mut(previous) {
                handler.pointer_out(previous, out);
            }
        }
        if let Some(next) = target {
            if let Some(handler) = views.handler_mut(next) {
                handler.pointer_over(next, out);
            }
        }
        self.hovered = target;
    }
}

fn release<N, M, V>(
    views: &mut InteractiveViews<N, M, V>,
    node: N,
    out: &mut Vec<InteractionEvent<N>>,
) where
    N: Copy + Eq + Hash,
    M: Material,
{
    if let Some(handler) = views.handler_mut(node) {
        handler.pointer_up(node, out);
    }
}

impl<N, C> Drop for PointerEventManager<N, C> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.clock.unsubscribe(subscription);
        }
    }
}

impl<N: fmt::Debug, C> fmt::Debug for PointerEventManager<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerEventManager")
            .field("canvas", &self.canvas)
            .field("viewport", &self.viewport)
            .field("targets", &self.targets)
            .field("recursive", &self.recursive)
            .field("throttle", &self.throttle)
            .field("hovered", &self.hovered)
            .field("pressed", &self.pressed)
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// Sort hits nearest-first and keep only the nearest hit of each object.
pub fn deduplicate_intersections<N: Copy + Eq + Hash>(
    mut hits: Vec<Intersection<N>>,
) -> Vec<Intersection<N>> {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    let mut seen = HashSet::with_capacity(hits.len());
    hits.retain(|hit| seen.insert(hit.object));
    hits
}

/// Walk from `node` up through its parents to the first node carrying a handler.
///
/// Returns `None` once the scene root (or a detached node) is reached, so
/// decorative geometry never blocks picking.
pub fn check_target<S, M, V>(scene: &S, views: &InteractiveViews<S::Node, M, V>, node: S::Node) -> Option<S::Node>
where
    S: SceneGraph,
{
    let root = scene.root();
    let mut current = node;
    loop {
        if views.contains(current) {
            return Some(current);
        }
        if current == root {
            return None;
        }
        current = scene.parent(current)?;
    }
}
