use anyhow::Result;
use glam::Vec3;
use meshpick_interact::{Canvas, PointerManagerOptions};
use meshpick_scene::{NodeId, PerspectiveCamera};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/meshpick.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated frame time fed to the render clock.
    pub frame_ms: f64,
    /// Frames to run; the script length wins when it is longer.
    pub frames: u64,
    pub canvas: Canvas,
    pub pointer: PointerManagerOptions<NodeId>,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_ms: 1000.0 / 60.0,
            frames: 240,
            canvas: Canvas::new(1280.0, 720.0),
            pointer: PointerManagerOptions::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 8.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 50.0,
        }
    }
}

impl CameraConfig {
    /// Picking camera for a canvas of the given size.
    pub fn build(&self, canvas: &Canvas) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(Vec3::from(self.position));
        camera.fov = self.fov_degrees.clamp(1.0, 179.0).to_radians();
        camera.set_aspect(canvas.width, canvas.height);
        camera.look_at(Vec3::from(self.target));
        camera
    }
}

impl DemoConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<DemoConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    DemoConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Demo config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                DemoConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
