use glam::Vec2;
use meshpick_interact::{PointerEvent, PointerEventKind};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Serialize)]
struct ScriptedPointerFile {
    steps: Vec<ScriptedPointerStep>,
}

/// One scripted step: fire `kind` at `(x, y)` then hold for `frames` frames.
///
/// A step without `kind` is a pause.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptedPointerStep {
    #[serde(default = "one_frame")]
    pub frames: u32,
    #[serde(default)]
    pub kind: Option<PointerEventKind>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

fn one_frame() -> u32 {
    1
}

impl ScriptedPointerStep {
    pub fn new(kind: PointerEventKind, at: Vec2, frames: u32) -> Self {
        Self {
            frames,
            kind: Some(kind),
            x: at.x,
            y: at.y,
        }
    }

    pub fn pause(frames: u32) -> Self {
        Self {
            frames,
            kind: None,
            x: 0.0,
            y: 0.0,
        }
    }
}

pub struct ScriptedPointerPlayer {
    steps: Vec<ScriptedPointerStep>,
    index: usize,
    frame_in_step: u32,
}

impl ScriptedPointerPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedPointerFile = serde_json::from_str(contents)?;
        Self::from_steps(file.steps)
    }

    pub fn from_steps(steps: Vec<ScriptedPointerStep>) -> anyhow::Result<Self> {
        if steps.is_empty() {
            anyhow::bail!("scripted pointer file contains no steps");
        }
        Ok(Self {
            steps,
            index: 0,
            frame_in_step: 0,
        })
    }

    /// Total frames covered by the script.
    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames.max(1))).sum()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Step one frame, returning the pointer event scheduled for it.
    pub fn advance(&mut self) -> Option<PointerEvent> {
        let step = self.steps.get(self.index)?;
        let event = if self.frame_in_step == 0 {
            step.kind
                .map(|kind| PointerEvent::new(kind, Vec2::new(step.x, step.y)))
        } else {
            None
        };

        self.frame_in_step += 1;
        if self.frame_in_step >= step.frames.max(1) {
            self.index += 1;
            self.frame_in_step = 0;
        }
        event
    }
}
