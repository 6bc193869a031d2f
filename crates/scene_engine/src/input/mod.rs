//! Input events and sources
//!
//! The windowing layer is outside the core. Whatever polls the OS hands the
//! editor a per-frame batch of [`InputEvent`]s through an [`InputSource`].

pub mod bindings;
pub mod picking;
pub mod scripted;

pub use bindings::{Binding, EditorAction, KeyBindings};
pub use picking::{CoordinateMapper, PickingMode};
pub use scripted::ScriptedInput;

use serde::{Deserialize, Serialize};

/// A discrete input event delivered to the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// The user asked to close the session
    Quit,

    /// A key was pressed
    KeyDown(KeyCode),

    /// A mouse button was pressed
    MouseDown {
        /// The button that was pressed
        button: MouseButton,
        /// Screen X coordinate in pixels (from the left edge)
        x: f32,
        /// Screen Y coordinate in pixels (from the top edge)
        y: f32,
    },
}

/// Producer of per-frame input
pub trait InputSource {
    /// Drain every event that arrived since the previous call
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// C key
    C,
    /// D key
    D,
    /// L key
    L,
    /// P key
    P,
    /// R key
    R,
    /// S key
    S,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Page Up
    PageUp,
    /// Page Down
    PageDown,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Any other button, by platform id
    Other(u16),
}
