use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

use crate::layout::LayoutRect;

/// Mouse state tracking.
#[derive(Debug, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    /// False once the cursor has left the window.
    pub inside: bool,
}

/// Hit-test: index of the layout rectangle containing the given point.
/// Empty rectangles are never hit.
pub fn hit_test(layout_rects: &[LayoutRect], x: f32, y: f32) -> Option<usize> {
    let (px, py) = (x as f64, y as f64);
    layout_rects
        .iter()
        .rposition(|rect| rect.area() > 0.0 && rect.contains(px, py))
}

/// Input action produced from raw input events.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Show or hide the ID/value text inside boxes
    ToggleLabels,
    /// Re-read the data file and lay it out again
    Reload,
    Quit,
    /// No action
    None,
}

/// Process a keyboard event.
pub fn process_key(key: Key, state: ElementState) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match key.as_ref() {
        Key::Named(NamedKey::Escape) => InputAction::Quit,
        Key::Character(c) if c.eq_ignore_ascii_case("l") => InputAction::ToggleLabels,
        Key::Character(c) if c.eq_ignore_ascii_case("r") => InputAction::Reload,
        _ => InputAction::None,
    }
}
