//! # Scene Engine
//!
//! Core of an interactive cube scene editor: the authoritative set of placed
//! cubes, the mapping from mouse clicks to ground positions, per-frame
//! synchronization with a rigid-body simulation, and XML persistence.
//!
//! ## Architecture
//!
//! ```text
//! InputSource ─→ Editor ─→ CameraController
//!                  │
//!                  ├─→ SceneStore ←─ sync_poses ─ PhysicsBridge ─→ PhysicsEngine
//!                  │       ↕
//!                  │   SceneDocument (XML)
//!                  └─→ RenderBackend
//! ```
//!
//! Windowing, GPU rendering and file dialogs stay outside the crate and are
//! reached through [`input::InputSource`], [`render::RenderBackend`] and
//! [`DocumentPaths`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EditorConfig::default();
//!     let mut editor = Editor::with_rapier(config.clone())?;
//!     let mut input = ScriptedInput::new(vec![vec![InputEvent::Quit]]);
//!     let mut renderer = HeadlessRenderer::default();
//!     let mut paths = FixedPaths::from_config(&config.files);
//!     editor.run(&mut input, &mut renderer, &mut paths);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

mod application;
mod engine;

#[cfg(test)]
mod tests;

pub use application::{DocumentPaths, FixedPaths};
pub use engine::{Editor, EditorError, FrameReport, LoopState, SessionSummary};

/// Common imports for editor users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EditorConfig},
        foundation::math::{Transform, Vec3},
        input::{EditorAction, InputEvent, InputSource, KeyBindings, KeyCode, MouseButton, PickingMode, ScriptedInput},
        physics::{PhysicsBridge, PhysicsEngine, PhysicsError, RapierPhysics},
        render::{CameraController, CameraRig, HeadlessRenderer, RenderBackend, RenderError},
        scene::{ObjectId, SceneDocument, SceneError, SceneObject, SceneStore},
        DocumentPaths, Editor, EditorError, FixedPaths, LoopState, SessionSummary,
    };
}
