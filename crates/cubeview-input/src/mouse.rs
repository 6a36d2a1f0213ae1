//! Frame-coherent mouse state.
//!
//! [`MouseState`] accumulates winit mouse events between ticks and exposes
//! drag movement, held buttons and wheel for the orbit controls.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of a pixel-precise wheel that count as one line.
const PIXELS_PER_LINE: f64 = 40.0;

fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

/// Mouse state for one tick.
///
/// Forward events with the `on_*` methods, read them during the tick, then
/// call [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    held: [bool; 3],
    scroll: f32,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. The first event only sets the position.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if let Some(old) = self.position {
            self.delta += new_pos - old;
        }
        self.position = Some(new_pos);
    }

    /// Process a `MouseInput` event. Buttons other than left, right and
    /// middle are ignored.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(idx) = button_index(button) {
            self.held[idx] = state == ElementState::Pressed;
        }
    }

    /// Process a `MouseWheel` event. Positive is away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Leaving the window releases every button; the release event may never
    /// arrive. The next move after re-entering does not count as movement.
    pub fn on_cursor_left(&mut self) {
        self.position = None;
        self.held = [false; 3];
    }

    /// Reset movement and wheel at the end of a tick.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Movement this tick, in physical pixels, while `button` is held; zero
    /// otherwise.
    #[must_use]
    pub fn drag_delta(&self, button: MouseButton) -> Vec2 {
        if self.is_button_pressed(button) {
            self.delta
        } else {
            Vec2::ZERO
        }
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|idx| self.held[idx])
    }

    /// Wheel lines this tick.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }
}
