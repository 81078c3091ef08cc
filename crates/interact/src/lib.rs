#![warn(missing_docs)]
//! Pointer interaction for 3D scene graphs.
//!
//! Objects in a scene become clickable by binding an
//! [`InteractionHandler`] to their node in an [`InteractiveViews`]
//! collection. A [`PointerEventManager`] raycasts device pointer events
//! against the scene, resolves each hit to the nearest node carrying a
//! handler and drives the handler's state machine, returning the resulting
//! [`InteractionEvent`]s to the caller. [`RadioButtonManager`] layers
//! exclusive selection on top.
//!
//! The scene and camera are abstracted by [`SceneGraph`] and
//! [`RayCamera`]; hover raycasts are throttled by a [`TickSource`] such as
//! [`RenderClock`].
//!
//! ```rust,ignore
//! let clock = RenderClock::new();
//! let mut pointer = PointerEventManager::new(camera, canvas, clock.clone(), Default::default())?;
//! let mut radios = RadioButtonManager::new();
//!
//! // Per frame:
//! clock.tick(delta_ms);
//! for event in input_events {
//!     let fired = pointer.handle_pointer_event(&scene, &mut views, &event);
//!     radios.forward(&mut views, &fired);
//! }
//! ```

pub mod clock;
pub mod error;
pub mod event;
pub mod handler;
pub mod manager;
pub mod material;
pub mod radio;
pub mod scene;
pub mod throttle;
pub mod view;
pub mod viewport;

#[cfg(test)]
mod test_support;

pub use clock::{RenderClock, TickSource, TickSubscription};
pub use error::InteractionError;
pub use event::{InteractionEvent, InteractionEventKind, PointerEvent, PointerEventKind, PointerType};
pub use handler::{InteractionHandler, InteractionState, SelectionCapability, WidgetKind};
pub use manager::{
    check_target, deduplicate_intersections, PointerEventManager, PointerManagerOptions,
    TargetList,
};
pub use material::{
    Material, MaterialSlot, StateMaterial, StateMaterialSet, StateMaterialSetParams,
};
pub use radio::RadioButtonManager;
pub use scene::{Intersection, Ray, RayCamera, SceneGraph};
pub use throttle::{Throttle, DEFAULT_THROTTLING_TIME_MS};
pub use view::{InteractiveView, InteractiveViews, ViewKind};
pub use viewport::{
    is_within_region, to_normalized_device_coordinates, write_normalized_device_coordinates,
    Canvas, PixelRect, ViewportRegion,
};
