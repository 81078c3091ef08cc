//! Per-object interaction state machine.
//!
//! One [`InteractionHandler`] backs every interactive view. Buttons,
//! checkboxes and radio buttons share the same pointer state machine and
//! differ only in their [`SelectionCapability`]:
//!
//! | capability  | active when               | click                    |
//! |-------------|---------------------------|--------------------------|
//! | `None`      | enabled                   | `up`, `click`            |
//! | `Toggle`    | enabled                   | `up`, `click`, `select`  |
//! | `Exclusive` | enabled and not exclusive | `up`, `click`, `select`  |
//!
//! Inactive handlers ignore `over` and `down` entirely so disabled or
//! exclusively selected widgets stay visually static under pointer traffic.
//! An `out` is only ever sent to a handler that previously sent `over`.

use crate::error::InteractionError;
use crate::event::{InteractionEvent, InteractionEventKind};
use crate::material::{Material, MaterialSlot, StateMaterial, StateMaterialSet};
use tracing::debug;

/// Pointer-relative state of one interactive object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// Pointer elsewhere.
    #[default]
    Normal,
    /// Pointer hovering.
    Over,
    /// Pointer pressed on the object.
    Down,
}

/// Widget flavour, derived from the selection capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Plain push button.
    Button,
    /// Toggles on every click.
    CheckBox,
    /// Member of an exclusive group.
    RadioButton,
}

/// Selection axis of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCapability {
    /// No selection (button).
    None,
    /// Toggled by clicks (checkbox).
    Toggle {
        /// Current selection.
        selected: bool,
    },
    /// Toggled by clicks, frozen while it is the group's exclusive selection (radio).
    Exclusive {
        /// Current selection.
        selected: bool,
        /// Set by the owning radio group; makes the handler inactive.
        exclusive: bool,
    },
}

/// State machine for a single interactive view.
#[derive(Debug, Clone)]
pub struct InteractionHandler<M, V> {
    selection: SelectionCapability,
    state: InteractionState,
    enabled: bool,
    is_over: bool,
    over_sent: bool,
    is_press: bool,
    value: Option<V>,
    materials: Option<StateMaterialSet<M>>,
    applied: Option<MaterialSlot>,
    opacity: f32,
}

impl<M, V> InteractionHandler<M, V> {
    /// Widget flavour.
    pub fn kind(&self) -> WidgetKind {
        match self.selection {
            SelectionCapability::None => WidgetKind::Button,
            SelectionCapability::Toggle { .. } => WidgetKind::CheckBox,
            SelectionCapability::Exclusive { .. } => WidgetKind::RadioButton,
        }
    }

    /// Selection capability and flags.
    pub fn selection_capability(&self) -> SelectionCapability {
        self.selection
    }

    /// Current selection, `None` for buttons.
    pub fn selection(&self) -> Option<bool> {
        match self.selection {
            SelectionCapability::None => None,
            SelectionCapability::Toggle { selected }
            | SelectionCapability::Exclusive { selected, .. } => Some(selected),
        }
    }

    /// Whether a radio group currently holds this handler as its exclusive selection.
    pub fn is_exclusively_selected(&self) -> bool {
        matches!(
            self.selection,
            SelectionCapability::Exclusive {
                exclusive: true,
                ..
            }
        )
    }

    /// Whether pointer activity may change this handler right now.
    pub fn check_activity(&self) -> bool {
        match self.selection {
            SelectionCapability::Exclusive { exclusive, .. } => self.enabled && !exclusive,
            _ => self.enabled,
        }
    }

    /// Current pointer-relative state.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Whether the handler is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the pointer is over the handler's view.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Whether a press is in progress.
    pub fn is_press(&self) -> bool {
        self.is_press
    }

    /// User data.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Replace the user data.
    pub fn set_value(&mut self, value: Option<V>) {
        self.value = value;
    }

    /// Global opacity multiplier.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Visual slot currently assigned to the view, `None` without a material set.
    pub fn material_slot(&self) -> Option<MaterialSlot> {
        self.applied
    }

    /// The material set, if any.
    pub fn material_set(&self) -> Option<&StateMaterialSet<M>> {
        self.materials.as_ref()
    }

    /// Visual currently assigned to the view.
    pub fn material(&self) -> Option<&StateMaterial<M>> {
        match (&self.materials, self.applied) {
            (Some(set), Some(slot)) => Some(set.material(slot)),
            _ => None,
        }
    }

    fn selected_flag(&self) -> bool {
        self.selection().unwrap_or(false)
    }

    fn resolve_state(&self) -> InteractionState {
        if self.is_press && self.is_over {
            InteractionState::Down
        } else if self.is_over {
            InteractionState::Over
        } else {
            InteractionState::Normal
        }
    }

    fn update_state(&mut self, state: InteractionState) {
        self.state = state;
        self.update_material();
    }

    fn update_material(&mut self) {
        self.applied = self.materials.as_ref().map(|_| {
            MaterialSlot::resolve(self.state, self.enabled, self.selected_flag())
        });
    }
}

impl<M: Material, V> InteractionHandler<M, V> {
    fn with_selection(
        selection: SelectionCapability,
        materials: Option<StateMaterialSet<M>>,
    ) -> Self {
        let mut handler = Self {
            selection,
            state: InteractionState::Normal,
            enabled: true,
            is_over: false,
            over_sent: false,
            is_press: false,
            value: None,
            materials,
            applied: None,
            opacity: 1.0,
        };
        handler.update_material();
        handler
    }

    /// Plain button.
    pub fn button(materials: Option<StateMaterialSet<M>>) -> Self {
        Self::with_selection(SelectionCapability::None, materials)
    }

    /// Checkbox, initially unselected.
    pub fn checkbox(materials: Option<StateMaterialSet<M>>) -> Self {
        Self::with_selection(SelectionCapability::Toggle { selected: false }, materials)
    }

    /// Radio button, initially unselected and not exclusive.
    pub fn radio(materials: Option<StateMaterialSet<M>>) -> Self {
        Self::with_selection(
            SelectionCapability::Exclusive {
                selected: false,
                exclusive: false,
            },
            materials,
        )
    }

    /// Builder: attach user data.
    pub fn with_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// Enable the handler.
    pub fn enable(&mut self) {
        self.switch_enable(true);
    }

    /// Disable the handler. The disabled visual wins over every other state.
    pub fn disable(&mut self) {
        self.switch_enable(false);
    }

    /// Set the enabled flag; the logical state is kept, the visual re-derived.
    pub fn switch_enable(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.update_material();
    }

    /// Programmatic selection, bypassing the click path.
    ///
    /// Returns whether the value was applied. Radio buttons refuse while
    /// inactive (disabled or exclusively selected); plain buttons have no
    /// selection and return [`InteractionError::NotSelectable`].
    pub fn set_selection(&mut self, selected: bool) -> Result<bool, InteractionError> {
        match self.selection {
            SelectionCapability::None => Err(InteractionError::NotSelectable),
            SelectionCapability::Toggle { .. } => {
                self.selection = SelectionCapability::Toggle { selected };
                self.update_state(InteractionState::Normal);
                Ok(true)
            }
            SelectionCapability::Exclusive { exclusive, .. } => {
                if !self.check_activity() {
                    debug!(selected, "ignoring selection change on inactive radio button");
                    return Ok(false);
                }
                self.selection = SelectionCapability::Exclusive {
                    selected,
                    exclusive,
                };
                self.update_state(InteractionState::Normal);
                Ok(true)
            }
        }
    }

    /// Apply a global opacity multiplier to every visual and re-assign.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        if let Some(set) = self.materials.as_mut() {
            set.set_opacity(opacity);
        }
        self.update_material();
    }

    pub(crate) fn pointer_over<N: Copy>(&mut self, target: N, out: &mut Vec<InteractionEvent<N>>) {
        self.is_over = true;
        if !self.check_activity() {
            return;
        }
        self.over_sent = true;
        self.update_state(self.resolve_state());
        out.push(InteractionEvent::pointer(InteractionEventKind::Over, target));
    }

    pub(crate) fn pointer_out<N: Copy>(&mut self, target: N, out: &mut Vec<InteractionEvent<N>>) {
        if !self.is_over {
            return;
        }
        self.is_over = false;
        // Hover seen while inactive was never announced.
        if !self.over_sent {
            return;
        }
        self.over_sent = false;
        self.update_state(self.resolve_state());
        out.push(InteractionEvent::pointer(InteractionEventKind::Out, target));
    }

    pub(crate) fn pointer_down<N: Copy>(&mut self, target: N, out: &mut Vec<InteractionEvent<N>>) {
        if !self.check_activity() {
            return;
        }
        self.is_press = true;
        self.update_state(InteractionState::Down);
        out.push(InteractionEvent::pointer(InteractionEventKind::Down, target));
    }

    pub(crate) fn pointer_up<N: Copy>(&mut self, target: N, out: &mut Vec<InteractionEvent<N>>) {
        if !self.is_press {
            return;
        }
        self.is_press = false;
        self.update_state(self.resolve_state());
        out.push(InteractionEvent::pointer(InteractionEventKind::Up, target));

        if self.is_over && self.check_activity() {
            out.push(InteractionEvent::pointer(InteractionEventKind::Click, target));
            self.on_click(target, out);
        }
    }

    fn on_click<N: Copy>(&mut self, target: N, out: &mut Vec<InteractionEvent<N>>) {
        let selected = match &mut self.selection {
            SelectionCapability::None => return,
            SelectionCapability::Toggle { selected }
            | SelectionCapability::Exclusive { selected, .. } => {
                *selected = !*selected;
                *selected
            }
        };
        self.update_material();
        out.push(InteractionEvent {
            kind: InteractionEventKind::Select,
            target,
            is_selected: Some(selected),
        });
    }

    /// Group override: set the selection without consulting `check_activity`.
    ///
    /// Selecting resolves the visual from `Normal` so the selected visual
    /// shows regardless of lingering hover or press. Deselecting recomputes
    /// the state from the pointer flags so hover/press visuals come back.
    pub(crate) fn override_selection(&mut self, selected: bool) {
        match &mut self.selection {
            SelectionCapability::None => return,
            SelectionCapability::Toggle { selected: flag }
            | SelectionCapability::Exclusive { selected: flag, .. } => *flag = selected,
        }
        if selected {
            self.update_state(InteractionState::Normal);
        } else {
            self.update_state(self.resolve_state());
        }
    }

    pub(crate) fn set_exclusive(&mut self, value: bool) {
        if let SelectionCapability::Exclusive { exclusive, .. } = &mut self.selection {
            *exclusive = value;
        }
    }
}
