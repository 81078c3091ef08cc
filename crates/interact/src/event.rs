//! Pointer input and the semantic events synthesized from it.

use crate::error::InteractionError;
use crate::handler::InteractionHandler;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw pointer event types the manager listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer moved over the canvas.
    Move,
    /// Button/contact pressed.
    Down,
    /// Button/contact released.
    Up,
    /// The platform cancelled the pointer (for example a touch turned into a scroll).
    Cancel,
    /// The pointer left the canvas.
    Leave,
}

impl PointerEventKind {
    /// All kinds, in subscription order.
    pub const ALL: [PointerEventKind; 5] = [
        PointerEventKind::Move,
        PointerEventKind::Down,
        PointerEventKind::Up,
        PointerEventKind::Cancel,
        PointerEventKind::Leave,
    ];
}

/// Input device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    /// Mouse or trackpad.
    #[default]
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus.
    Pen,
}

/// Device pointer event in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// Offset from the canvas top-left corner, in displayed (logical) pixels.
    pub offset: Vec2,
    /// Device class.
    pub pointer_type: PointerType,
    /// Identifies the pointer (touch id, or 0 for the mouse).
    pub pointer_id: u64,
}

impl PointerEvent {
    /// Mouse event at `offset`.
    pub fn new(kind: PointerEventKind, offset: Vec2) -> Self {
        Self {
            kind,
            offset,
            pointer_type: PointerType::Mouse,
            pointer_id: 0,
        }
    }

    /// Builder: set the device class and pointer id.
    pub fn with_pointer(mut self, pointer_type: PointerType, pointer_id: u64) -> Self {
        self.pointer_type = pointer_type;
        self.pointer_id = pointer_id;
        self
    }
}

/// Semantic interaction event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionEventKind {
    /// Pointer entered the target.
    Over,
    /// Pointer left the target.
    Out,
    /// Target was pressed.
    Down,
    /// Press on the target was released.
    Up,
    /// Press and release completed over the target.
    Click,
    /// Selection changed (checkbox, radio, radio group).
    Select,
}

impl InteractionEventKind {
    /// Lowercase name used in logs and recordings.
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionEventKind::Over => "over",
            InteractionEventKind::Out => "out",
            InteractionEventKind::Down => "down",
            InteractionEventKind::Up => "up",
            InteractionEventKind::Click => "click",
            InteractionEventKind::Select => "select",
        }
    }
}

impl fmt::Display for InteractionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic event addressed to one interactive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent<N> {
    /// Event type.
    pub kind: InteractionEventKind,
    /// The interactive node the event concerns.
    pub target: N,
    /// Selection state carried by `select` events.
    pub is_selected: Option<bool>,
}

impl<N> InteractionEvent<N> {
    /// A pointer-derived event (`over`, `out`, `down`, `up`, `click`).
    pub(crate) fn pointer(kind: InteractionEventKind, target: N) -> Self {
        debug_assert!(kind != InteractionEventKind::Select);
        Self {
            kind,
            target,
            is_selected: None,
        }
    }

    /// Build a `select` event for `handler`, reporting its current selection.
    ///
    /// Fails with [`InteractionError::NotSelectable`] when the handler is a
    /// plain button.
    pub fn select<M, V>(
        target: N,
        handler: &InteractionHandler<M, V>,
    ) -> Result<Self, InteractionError> {
        let selected = handler.selection().ok_or(InteractionError::NotSelectable)?;
        Ok(Self {
            kind: InteractionEventKind::Select,
            target,
            is_selected: Some(selected),
        })
    }
}
