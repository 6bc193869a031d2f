//! # Rendering Boundary
//!
//! The editor core does not issue GPU calls. Each frame it hands a
//! [`RenderBackend`] the view, the ground, and one world-space transform per
//! object, then asks it to present.
//!
//! ## Frame protocol
//!
//! ```text
//! begin_frame(view) → draw_ground(..) → draw_object(..)* → present()
//! ```
//!
//! The transforms borrowed during a frame come from the scene snapshot and
//! must be treated as immutable until `present` returns.

pub mod camera;
pub mod headless;

pub use camera::{CameraController, CameraRig, PanDirection, Projection, ZoomDirection};
pub use headless::{FrameRecord, HeadlessRenderer};

use crate::foundation::math::{Mat4, Transform};
use std::path::Path;
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// World-to-view transform
    pub view: Mat4,
    /// View-to-clip transform
    pub projection: Mat4,
}

/// Rendering backend consumed by the frame loop
pub trait RenderBackend {
    /// Start a frame with the given camera matrices
    fn begin_frame(&mut self, view: &FrameView) -> BackendResult<()>;

    /// Draw the ground quad spanning `[-half_extent, half_extent]` on X and Z at `height`
    fn draw_ground(&mut self, half_extent: f32, height: f32);

    /// Draw one unit cube with the given world transform
    fn draw_object(&mut self, transform: &Transform);

    /// Finish and present the frame
    fn present(&mut self) -> BackendResult<()>;

    /// Write the last presented frame to an image file
    fn capture(&mut self, path: &Path) -> BackendResult<()> {
        Err(RenderError::Unsupported(format!(
            "frame capture to {}",
            path.display()
        )))
    }

    /// Release backend resources. Called once when the session ends.
    fn release(&mut self) {}
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Drawing was requested outside `begin_frame` / `present`
    #[error("Frame protocol violated: {0}")]
    FrameProtocol(String),

    /// Nothing has been presented yet
    #[error("No frame has been presented")]
    NothingPresented,

    /// Backend does not support the operation
    #[error("Unsupported by this backend: {0}")]
    Unsupported(String),

    /// Image capture failed
    #[error("Capture failed: {0}")]
    Capture(String),
}
