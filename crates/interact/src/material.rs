//! Per-state visuals for interactive objects.

use crate::error::InteractionError;
use crate::handler::InteractionState;

/// A visual whose opacity can be driven by the interaction layer.
///
/// Everything else about the material is opaque here; the host renderer
/// decides what it looks like.
pub trait Material {
    /// Current opacity.
    fn opacity(&self) -> f32;
    /// Overwrite the opacity.
    fn set_opacity(&mut self, opacity: f32);
}

/// One visual, possibly made of several material parts.
#[derive(Debug, Clone)]
pub struct StateMaterial<M> {
    parts: Vec<M>,
    authored: Vec<f32>,
}

impl<M: Material> StateMaterial<M> {
    /// Wrap a single material.
    pub fn new(material: M) -> Self {
        let authored = vec![material.opacity()];
        Self {
            parts: vec![material],
            authored,
        }
    }

    /// Wrap a multi-part visual (for example one material per mesh group).
    ///
    /// Fails with [`InteractionError::EmptyMaterial`] when `parts` is empty.
    pub fn multi(parts: Vec<M>) -> Result<Self, InteractionError> {
        if parts.is_empty() {
            return Err(InteractionError::EmptyMaterial);
        }
        let authored = parts.iter().map(Material::opacity).collect();
        Ok(Self { parts, authored })
    }

    /// Apply a global opacity multiplier, keeping each part's authored opacity as base.
    pub fn set_opacity(&mut self, opacity: f32) {
        for (part, base) in self.parts.iter_mut().zip(&self.authored) {
            part.set_opacity(opacity * base);
        }
    }

}

impl<M> StateMaterial<M> {
    /// The first (often only) part.
    pub fn material(&self) -> &M {
        // Both constructors guarantee at least one part.
        &self.parts[0]
    }

    /// All parts in authoring order.
    pub fn parts(&self) -> &[M] {
        &self.parts
    }
}

impl<M: Material> From<M> for StateMaterial<M> {
    fn from(material: M) -> Self {
        Self::new(material)
    }
}

/// Which of the seven visual slots is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    /// Idle.
    Normal,
    /// Hovered.
    Over,
    /// Pressed.
    Down,
    /// Disabled; wins over every other slot.
    Disable,
    /// Idle and selected.
    NormalSelect,
    /// Hovered and selected.
    OverSelect,
    /// Pressed and selected.
    DownSelect,
}

impl MaterialSlot {
    const COUNT: usize = 7;

    fn index(self) -> usize {
        self as usize
    }

    /// Resolve the slot for a state combination. Disabled always wins.
    pub fn resolve(state: InteractionState, enabled: bool, selected: bool) -> Self {
        if !enabled {
            return MaterialSlot::Disable;
        }
        match (state, selected) {
            (InteractionState::Normal, false) => MaterialSlot::Normal,
            (InteractionState::Over, false) => MaterialSlot::Over,
            (InteractionState::Down, false) => MaterialSlot::Down,
            (InteractionState::Normal, true) => MaterialSlot::NormalSelect,
            (InteractionState::Over, true) => MaterialSlot::OverSelect,
            (InteractionState::Down, true) => MaterialSlot::DownSelect,
        }
    }
}

/// Constructor input for [`StateMaterialSet`]. Only `normal` is mandatory.
#[derive(Debug, Clone)]
pub struct StateMaterialSetParams<M> {
    /// Idle visual.
    pub normal: Option<StateMaterial<M>>,
    /// Hover visual, defaults to `normal`.
    pub over: Option<StateMaterial<M>>,
    /// Press visual, defaults to `normal`.
    pub down: Option<StateMaterial<M>>,
    /// Disabled visual, defaults to `normal`.
    pub disable: Option<StateMaterial<M>>,
    /// Selected idle visual, defaults to `normal`.
    pub normal_select: Option<StateMaterial<M>>,
    /// Selected hover visual, defaults to the resolved `over`.
    pub over_select: Option<StateMaterial<M>>,
    /// Selected press visual, defaults to the resolved `down`.
    pub down_select: Option<StateMaterial<M>>,
}

impl<M> Default for StateMaterialSetParams<M> {
    fn default() -> Self {
        Self {
            normal: None,
            over: None,
            down: None,
            disable: None,
            normal_select: None,
            over_select: None,
            down_select: None,
        }
    }
}

/// Lookup table from (state, enabled, selected) to a visual.
///
/// Fallbacks are resolved once at construction into an index table so a
/// shared visual is stored (and re-tinted) exactly once.
#[derive(Debug, Clone)]
pub struct StateMaterialSet<M> {
    materials: Vec<StateMaterial<M>>,
    table: [usize; MaterialSlot::COUNT],
}

impl<M: Material> StateMaterialSet<M> {
    /// Build a set, failing when no `normal` visual is supplied.
    pub fn new(params: StateMaterialSetParams<M>) -> Result<Self, InteractionError> {
        let StateMaterialSetParams {
            normal,
            over,
            down,
            disable,
            normal_select,
            over_select,
            down_select,
        } = params;
        let normal = normal.ok_or(InteractionError::MissingNormalMaterial)?;

        let mut materials = vec![normal];
        let mut push = |material: Option<StateMaterial<M>>, fallback: usize| match material {
            Some(material) => {
                materials.push(material);
                materials.len() - 1
            }
            None => fallback,
        };

        let normal_idx = 0;
        let over_idx = push(over, normal_idx);
        let down_idx = push(down, normal_idx);
        let disable_idx = push(disable, normal_idx);
        let normal_select_idx = push(normal_select, normal_idx);
        let over_select_idx = push(over_select, over_idx);
        let down_select_idx = push(down_select, down_idx);

        let mut table = [0; MaterialSlot::COUNT];
        table[MaterialSlot::Normal.index()] = normal_idx;
        table[MaterialSlot::Over.index()] = over_idx;
        table[MaterialSlot::Down.index()] = down_idx;
        table[MaterialSlot::Disable.index()] = disable_idx;
        table[MaterialSlot::NormalSelect.index()] = normal_select_idx;
        table[MaterialSlot::OverSelect.index()] = over_select_idx;
        table[MaterialSlot::DownSelect.index()] = down_select_idx;

        Ok(Self { materials, table })
    }

    /// A set that shows `normal` in every state.
    pub fn from_normal(normal: impl Into<StateMaterial<M>>) -> Self {
        Self {
            materials: vec![normal.into()],
            table: [0; MaterialSlot::COUNT],
        }
    }

    /// Propagate a global opacity multiplier to every distinct visual.
    pub fn set_opacity(&mut self, opacity: f32) {
        for material in &mut self.materials {
            material.set_opacity(opacity);
        }
    }
}

impl<M> StateMaterialSet<M> {
    /// Visual for a state combination.
    pub fn get_material(
        &self,
        state: InteractionState,
        enabled: bool,
        selected: bool,
    ) -> &StateMaterial<M> {
        self.material(MaterialSlot::resolve(state, enabled, selected))
    }

    /// Visual stored for a slot (after fallbacks).
    pub fn material(&self, slot: MaterialSlot) -> &StateMaterial<M> {
        &self.materials[self.table[slot.index()]]
    }
}
