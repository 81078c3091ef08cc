#![warn(missing_docs)]
//! Pointer input from winit window events.

use glam::Vec2;
use meshpick_interact::{Canvas, PointerEvent, PointerEventKind, PointerType};
use tracing::{debug, trace};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

/// Pointer id reported for the mouse; touches use their own ids.
pub const MOUSE_POINTER_ID: u64 = 0;

/// Build the logical canvas for a window of `size` physical pixels.
pub fn canvas_for(size: PhysicalSize<u32>, scale_factor: f64) -> Canvas {
    let logical = size.to_logical::<f32>(scale_factor);
    Canvas::new(logical.width, logical.height).with_pixel_ratio(scale_factor as f32)
}

/// Translates window events into [`PointerEvent`]s in logical pixels.
#[derive(Debug)]
pub struct PointerTranslator {
    /// Physical pixels per logical pixel.
    scale_factor: f64,
    /// Window size in physical pixels.
    size: PhysicalSize<u32>,
    /// Last cursor position in logical pixels.
    cursor: Vec2,
    /// Left mouse button held.
    mouse_down: bool,
}

impl Default for PointerTranslator {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            size: PhysicalSize::new(1280, 720),
            cursor: Vec2::ZERO,
            mouse_down: false,
        }
    }
}

impl PointerTranslator {
    /// Translator for a window of `size` physical pixels.
    pub fn new(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            scale_factor,
            size,
            ..Default::default()
        }
    }

    /// Process a window event. Returns the pointer event it maps to, if any.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self.to_logical(*position);
                Some(self.mouse(PointerEventKind::Move))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.mouse_down = true;
                    Some(self.mouse(PointerEventKind::Down))
                }
                ElementState::Released => {
                    self.mouse_down = false;
                    Some(self.mouse(PointerEventKind::Up))
                }
            },
            WindowEvent::CursorLeft { .. } => {
                self.mouse_down = false;
                Some(self.mouse(PointerEventKind::Leave))
            }
            WindowEvent::Touch(touch) => Some(self.touch(touch)),
            WindowEvent::Resized(size) => {
                self.size = *size;
                None
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
                None
            }
            _ => None,
        }
    }

    /// Update the scale factor (normally delivered by `ScaleFactorChanged`).
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            debug!(scale_factor, "pointer scale factor changed");
            self.scale_factor = scale_factor;
        }
    }

    /// Current scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Last cursor position in logical pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Whether the left mouse button is held.
    pub fn mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Logical canvas matching the current window size.
    pub fn canvas(&self) -> Canvas {
        canvas_for(self.size, self.scale_factor)
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f32>(self.scale_factor);
        Vec2::new(logical.x, logical.y)
    }

    fn mouse(&self, kind: PointerEventKind) -> PointerEvent {
        PointerEvent::new(kind, self.cursor).with_pointer(PointerType::Mouse, MOUSE_POINTER_ID)
    }

    fn touch(&self, touch: &Touch) -> PointerEvent {
        let kind = match touch.phase {
            TouchPhase::Started => PointerEventKind::Down,
            TouchPhase::Moved => PointerEventKind::Move,
            TouchPhase::Ended => PointerEventKind::Up,
            TouchPhase::Cancelled => PointerEventKind::Cancel,
        };
        trace!(id = touch.id, ?kind, "touch");
        PointerEvent::new(kind, self.to_logical(touch.location))
            .with_pointer(PointerType::Touch, touch.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::DeviceId;

    fn device() -> DeviceId {
        unsafe { DeviceId::dummy() }
    }

    fn moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn button(state: ElementState, button: MouseButton) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button,
        }
    }

    fn touch(phase: TouchPhase, x: f64, y: f64) -> WindowEvent {
        WindowEvent::Touch(Touch {
            device_id: device(),
            phase,
            location: PhysicalPosition::new(x, y),
            force: None,
            id: 7,
        })
    }

    #[test]
    fn cursor_moves_are_logical() {
        let mut input = PointerTranslator::new(PhysicalSize::new(1600, 1200), 2.0);
        let event = input.handle_event(&moved(400.0, 300.0)).unwrap();
        assert_eq!(event.kind, PointerEventKind::Move);
        assert_eq!(event.offset, Vec2::new(200.0, 150.0));
        assert_eq!(event.pointer_type, PointerType::Mouse);
        assert_eq!(input.cursor(), Vec2::new(200.0, 150.0));
    }

    #[test]
    fn left_button_maps_to_down_and_up() {
        let mut input = PointerTranslator::default();
        input.handle_event(&moved(10.0, 20.0));

        let down = input
            .handle_event(&button(ElementState::Pressed, MouseButton::Left))
            .unwrap();
        assert_eq!(down.kind, PointerEventKind::Down);
        assert_eq!(down.offset, Vec2::new(10.0, 20.0));
        assert!(input.mouse_down());

        let up = input
            .handle_event(&button(ElementState::Released, MouseButton::Left))
            .unwrap();
        assert_eq!(up.kind, PointerEventKind::Up);
        assert!(!input.mouse_down());

        assert!(input
            .handle_event(&button(ElementState::Pressed, MouseButton::Right))
            .is_none());
    }

    #[test]
    fn cursor_left_is_leave() {
        let mut input = PointerTranslator::default();
        input.handle_event(&button(ElementState::Pressed, MouseButton::Left));
        let event = input
            .handle_event(&WindowEvent::CursorLeft { device_id: device() })
            .unwrap();
        assert_eq!(event.kind, PointerEventKind::Leave);
        assert!(!input.mouse_down());
    }

    #[test]
    fn touch_phases() {
        let mut input = PointerTranslator::new(PhysicalSize::new(800, 600), 1.0);
        let cases = [
            (TouchPhase::Started, PointerEventKind::Down),
            (TouchPhase::Moved, PointerEventKind::Move),
            (TouchPhase::Ended, PointerEventKind::Up),
            (TouchPhase::Cancelled, PointerEventKind::Cancel),
        ];
        for (phase, kind) in cases {
            let event = input.handle_event(&touch(phase, 5.0, 6.0)).unwrap();
            assert_eq!(event.kind, kind);
            assert_eq!(event.pointer_type, PointerType::Touch);
            assert_eq!(event.pointer_id, 7);
            assert_eq!(event.offset, Vec2::new(5.0, 6.0));
        }
    }

    #[test]
    fn canvas_tracks_resize_and_scale() {
        let mut input = PointerTranslator::new(PhysicalSize::new(800, 600), 1.0);
        assert!(input
            .handle_event(&WindowEvent::Resized(PhysicalSize::new(1000, 500)))
            .is_none());
        input.set_scale_factor(2.0);
        input.set_scale_factor(0.0);

        let canvas = input.canvas();
        assert_eq!(canvas.width, 500.0);
        assert_eq!(canvas.height, 250.0);
        assert_eq!(canvas.pixel_ratio, 2.0);
        assert_eq!(canvas.backing_size(), (1000, 500));
    }
}
