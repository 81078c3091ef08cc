//! Flat-colour material used by the reference scene.

use meshpick_interact::Material;
use serde::{Deserialize, Serialize};

/// Unlit colour with opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicMaterial {
    /// Debug label.
    pub name: String,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Alpha in `0..=1`.
    pub opacity: f32,
}

impl BasicMaterial {
    /// Opaque material.
    pub fn new(name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color,
            opacity: 1.0,
        }
    }

    /// Builder: authored opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// RGBA for upload.
    pub fn rgba(&self) -> [f32; 4] {
        [self.color[0], self.color[1], self.color[2], self.opacity]
    }
}

impl Material for BasicMaterial {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_interact::StateMaterial;

    #[test]
    fn opacity_scales_authored_value() {
        let mut visual = StateMaterial::new(BasicMaterial::new("glass", [0.2, 0.4, 0.8]).with_opacity(0.5));
        visual.set_opacity(0.5);
        assert_eq!(visual.material().rgba(), [0.2, 0.4, 0.8, 0.25]);
    }
}
