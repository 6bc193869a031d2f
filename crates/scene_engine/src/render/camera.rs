//! # Editor Camera
//!
//! The camera is a plain value: input events mutate it in discrete steps and
//! the renderer asks it for matrices. There is no inertia and no smoothing;
//! one key press is one step.
//!
//! Two rigs are supported, chosen once by configuration:
//! - **Free-fly**: the view is a pure translation of the world by `offset`
//!   (the world moves, not the eye). Zoom changes `offset.z`.
//! - **Look-at**: an explicit eye/target/up triple. Panning moves eye and
//!   target together; zoom moves the eye along the view direction.
//!
//! Resulting positions are never validated. A look-at rig can be zoomed
//! through its target; the view becomes meaningless but stays finite.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use serde::{Deserialize, Serialize};

/// Camera configuration state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraRig {
    /// World translated by `offset`
    FreeFly {
        /// Translation applied to the world
        offset: Vec3,
    },
    /// Explicit eye / target / up
    LookAt {
        /// Camera position in world space
        eye: Vec3,
        /// Point the camera is looking at
        target: Vec3,
        /// Up vector (typically +Y)
        up: Vec3,
    },
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::FreeFly {
            offset: Vec3::new(0.0, -5.0, -20.0),
        }
    }
}

/// Direction of a pan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    /// Negative X
    Left,
    /// Positive X
    Right,
    /// Positive Y
    Up,
    /// Negative Y
    Down,
}

impl PanDirection {
    fn unit(self) -> Vec3 {
        match self {
            Self::Left => Vec3::new(-1.0, 0.0, 0.0),
            Self::Right => Vec3::new(1.0, 0.0, 0.0),
            Self::Up => Vec3::new(0.0, 1.0, 0.0),
            Self::Down => Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

/// Direction of a zoom step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Towards the scene
    In,
    /// Away from the scene
    Out,
}

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

/// Holds the camera state and applies discrete pan/zoom steps
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    rig: CameraRig,
    initial: CameraRig,
    projection: Projection,
    pan_step: f32,
    zoom_step: f32,
}

impl CameraController {
    /// Create a controller starting from `rig`
    pub fn new(rig: CameraRig, projection: Projection, pan_step: f32, zoom_step: f32) -> Self {
        Self {
            rig,
            initial: rig,
            projection,
            pan_step,
            zoom_step,
        }
    }

    /// Current rig state
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Projection parameters
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Move one pan step
    pub fn pan(&mut self, direction: PanDirection) {
        let delta = direction.unit() * self.pan_step;
        match &mut self.rig {
            CameraRig::FreeFly { offset } => *offset += delta,
            CameraRig::LookAt { eye, target, .. } => {
                *eye += delta;
                *target += delta;
            }
        }
        log::trace!("Camera pan {:?} -> {:?}", direction, self.rig);
    }

    /// Move one zoom step
    pub fn zoom(&mut self, direction: ZoomDirection) {
        let amount = match direction {
            ZoomDirection::In => self.zoom_step,
            ZoomDirection::Out => -self.zoom_step,
        };
        match &mut self.rig {
            // Positive offset.z brings the world towards a viewer looking down -Z
            CameraRig::FreeFly { offset } => offset.z += amount,
            CameraRig::LookAt { eye, target, .. } => {
                if let Some(forward) = (*target - *eye).try_normalize(f32::EPSILON) {
                    *eye += forward * amount;
                }
            }
        }
        log::trace!("Camera zoom {:?} -> {:?}", direction, self.rig);
    }

    /// Eye-to-target distance (look-at) or `-offset.z` (free-fly)
    pub fn distance(&self) -> f32 {
        match &self.rig {
            CameraRig::FreeFly { offset } => -offset.z,
            CameraRig::LookAt { eye, target, .. } => (target - eye).norm(),
        }
    }

    /// Restore the startup rig
    pub fn reset(&mut self) {
        self.rig = self.initial;
        log::debug!("Camera reset to {:?}", self.rig);
    }

    /// World-to-view transform derived from the current state
    pub fn view_matrix(&self) -> Mat4 {
        match &self.rig {
            CameraRig::FreeFly { offset } => Mat4::new_translation(offset),
            CameraRig::LookAt { eye, target, up } => Mat4::look_at(*eye, *target, *up),
        }
    }

    /// Perspective projection for a viewport with the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(
            utils::deg_to_rad(self.projection.fov_degrees),
            aspect,
            self.projection.near,
            self.projection.far,
        )
    }

    /// `projection * view`
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}
