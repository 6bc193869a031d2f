//! Scene state
//!
//! ```text
//! SceneStore (identity, membership, cached poses)
//!      ↑ sync_poses
//! PhysicsBridge (authoritative simulated pose)
//!      ↕ save / load
//! SceneDocument (positions only)
//! ```
//!
//! The store is an explicit value owned by the editor and passed by
//! reference; there is no global scene list.

mod document;
mod object;
mod store;

pub use document::{CubeRecord, SceneDocument};
pub use object::{ObjectId, SceneObject};
pub use store::SceneStore;

use crate::physics::PhysicsError;
use thiserror::Error;

/// Scene errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// The physics engine refused to create a body
    #[error("Spawn failed: {0}")]
    SpawnFailed(#[source] PhysicsError),

    /// A scene document could not be parsed or has invalid coordinates
    #[error("Malformed scene document: {0}")]
    MalformedDocument(String),

    /// Reading or writing a scene file failed
    #[error("Scene file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
