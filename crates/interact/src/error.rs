//! Error type for interaction contract violations.

use thiserror::Error;

/// Integration errors surfaced to the caller instead of being masked.
///
/// Recoverable misuse (selecting a stranger in a radio group, removing a
/// handler twice) is logged and ignored; only contract violations end up
/// here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    /// A state material set was built without its mandatory `normal` visual.
    #[error("state material set requires a normal material")]
    MissingNormalMaterial,
    /// A multi-part visual was built from an empty part list.
    #[error("state material needs at least one part")]
    EmptyMaterial,
    /// A selection-only operation was requested on a plain button.
    #[error("handler has no selection capability")]
    NotSelectable,
    /// The throttling interval was negative or not a finite number.
    #[error("invalid throttling interval: {0} ms")]
    InvalidThrottlingTime(f64),
}
