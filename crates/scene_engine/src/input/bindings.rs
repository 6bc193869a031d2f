//! Key → action table

use super::KeyCode;
use serde::{Deserialize, Serialize};

/// Editor command triggered by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorAction {
    /// Move the camera one step left
    PanLeft,
    /// Move the camera one step right
    PanRight,
    /// Move the camera one step up
    PanUp,
    /// Move the camera one step down
    PanDown,
    /// Move the camera one zoom step towards the scene
    ZoomIn,
    /// Move the camera one zoom step away from the scene
    ZoomOut,
    /// Restore the startup camera
    ResetCamera,
    /// Save the scene to a document
    SaveScene,
    /// Replace the scene with a document's contents
    LoadScene,
    /// Drop a cube at the configured spawn point
    SpawnCube,
    /// Remove the most recently placed cube
    RemoveLast,
    /// Remove every object
    ClearScene,
    /// Capture the presented frame to an image
    Screenshot,
    /// End the session
    Quit,
}

/// One key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Key that triggers the action
    pub key: KeyCode,
    /// Action to run
    pub action: EditorAction,
}

/// Key bindings, first match wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
}

impl KeyBindings {
    /// Create an empty binding table
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Bind `key` to `action`, replacing any previous binding for the key
    pub fn bind(&mut self, key: KeyCode, action: EditorAction) {
        self.bindings.retain(|b| b.key != key);
        self.bindings.push(Binding { key, action });
    }

    /// Builder-style [`bind`](Self::bind)
    #[must_use]
    pub fn with(mut self, key: KeyCode, action: EditorAction) -> Self {
        self.bind(key, action);
        self
    }

    /// Look up the action bound to `key`
    pub fn action_for(&self, key: KeyCode) -> Option<EditorAction> {
        self.bindings.iter().find(|b| b.key == key).map(|b| b.action)
    }

    /// All bindings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty()
            .with(KeyCode::Left, EditorAction::PanLeft)
            .with(KeyCode::Right, EditorAction::PanRight)
            .with(KeyCode::Up, EditorAction::PanUp)
            .with(KeyCode::Down, EditorAction::PanDown)
            .with(KeyCode::PageUp, EditorAction::ZoomIn)
            .with(KeyCode::PageDown, EditorAction::ZoomOut)
            .with(KeyCode::Home, EditorAction::ResetCamera)
            .with(KeyCode::S, EditorAction::SaveScene)
            .with(KeyCode::L, EditorAction::LoadScene)
            .with(KeyCode::Delete, EditorAction::ClearScene)
            .with(KeyCode::C, EditorAction::SpawnCube)
            .with(KeyCode::D, EditorAction::RemoveLast)
            .with(KeyCode::P, EditorAction::Screenshot)
            .with(KeyCode::Escape, EditorAction::Quit)
    }
}
