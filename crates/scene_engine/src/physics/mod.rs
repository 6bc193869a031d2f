//! Physics boundary and synchronization
//!
//! The simulation itself lives behind [`PhysicsEngine`]; the editor only
//! creates and removes bodies, steps, and reads poses back. [`PhysicsBridge`]
//! owns the engine and copies poses into the scene store once per frame.

pub mod bridge;
pub mod rapier;
#[cfg(test)]
pub(crate) mod testing;

pub use bridge::{PhysicsBridge, SyncReport};
pub use rapier::RapierPhysics;

use crate::foundation::math::{Quat, Vec3};
use thiserror::Error;

/// Opaque handle to a body inside a physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Axis-aligned cube with the given half edge length
    Cube {
        /// Half of the cube's edge length
        half_extent: f32,
    },
}

/// Position plus optional orientation of a simulated body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space position
    pub position: Vec3,
    /// World-space rotation, if the engine reports one
    pub orientation: Option<Quat>,
}

impl Pose {
    /// Pose at `position` without orientation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: None,
        }
    }
}

/// Rigid-body simulation service
pub trait PhysicsEngine {
    /// Create a dynamic body
    ///
    /// # Errors
    /// [`PhysicsError::CapacityExceeded`] or [`PhysicsError::InvalidPose`] when
    /// the engine refuses the body. Nothing is created in that case.
    fn create_body(&mut self, shape: BodyShape, pose: Pose) -> Result<BodyHandle, PhysicsError>;

    /// Remove a body, returning whether it existed
    fn remove_body(&mut self, body: BodyHandle) -> bool;

    /// Advance the simulation by one fixed step
    fn step_simulation(&mut self);

    /// Current pose of a body, `None` if the handle is unknown
    fn pose(&self, body: BodyHandle) -> Option<Pose>;

    /// Number of live dynamic bodies
    fn body_count(&self) -> usize;
}

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The configured body limit was reached
    #[error("Body limit of {limit} reached")]
    CapacityExceeded {
        /// Maximum number of bodies
        limit: usize,
    },

    /// Position or orientation contains NaN or infinity
    #[error("Invalid pose: {0}")]
    InvalidPose(String),
}
