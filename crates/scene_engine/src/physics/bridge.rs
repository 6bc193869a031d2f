//! Per-frame physics step and pose synchronization

use super::{BodyHandle, BodyShape, PhysicsEngine, PhysicsError, Pose};
use crate::foundation::math::Vec3;
use crate::scene::{ObjectId, SceneStore};
use std::fmt;

/// Outcome of one [`PhysicsBridge::sync_poses`] pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Objects whose pose was refreshed
    pub synced: usize,
    /// Objects whose body the engine no longer knows; their pose is stale
    pub missing: Vec<ObjectId>,
}

/// Owns the physics engine and keeps the scene store's poses current
pub struct PhysicsBridge {
    engine: Box<dyn PhysicsEngine>,
    cube_half_extent: f32,
    steps: u64,
}

impl fmt::Debug for PhysicsBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsBridge")
            .field("cube_half_extent", &self.cube_half_extent)
            .field("steps", &self.steps)
            .field("body_count", &self.engine.body_count())
            .finish()
    }
}

impl PhysicsBridge {
    /// Wrap an engine; cubes are created with `cube_half_extent`
    pub fn new(engine: Box<dyn PhysicsEngine>, cube_half_extent: f32) -> Self {
        Self {
            engine,
            cube_half_extent,
            steps: 0,
        }
    }

    /// Half edge length of spawned cubes
    pub fn cube_half_extent(&self) -> f32 {
        self.cube_half_extent
    }

    /// Create a cube body at `position`
    ///
    /// # Errors
    /// Whatever the engine refuses with; no body exists afterwards.
    pub fn create_cube(&mut self, position: Vec3) -> Result<BodyHandle, PhysicsError> {
        self.engine.create_body(
            BodyShape::Cube {
                half_extent: self.cube_half_extent,
            },
            Pose::at(position),
        )
    }

    /// Remove a body; `false` if the engine did not know it
    pub fn remove(&mut self, body: BodyHandle) -> bool {
        self.engine.remove_body(body)
    }

    /// Current pose of a body
    pub fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.engine.pose(body)
    }

    /// Live bodies in the engine
    pub fn body_count(&self) -> usize {
        self.engine.body_count()
    }

    /// Steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance the simulation by one fixed step
    pub fn step(&mut self) {
        self.engine.step_simulation();
        self.steps += 1;
    }

    /// Copy every tracked body's pose into `store`
    ///
    /// Membership of the store is never changed. An object whose body is
    /// unknown to the engine keeps its previous pose.
    pub fn sync_poses(&self, store: &mut SceneStore) -> SyncReport {
        let mut report = SyncReport::default();
        for object in store.objects_mut() {
            match self.engine.pose(object.body) {
                Some(pose) => {
                    object.position = pose.position;
                    if pose.orientation.is_some() {
                        object.orientation = pose.orientation;
                    }
                    report.synced += 1;
                }
                None => {
                    log::warn!(
                        "Body {:?} of object {:?} missing from physics; keeping stale pose",
                        object.body,
                        object.id
                    );
                    report.missing.push(object.id);
                }
            }
        }
        report
    }

    /// Remove every object in `store` together with its body
    pub(crate) fn release(&mut self, store: &mut SceneStore) {
        let removed = store.clear(self);
        log::debug!("Physics released: {} bodies removed after {} steps", removed, self.steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::MockPhysics;

    #[test]
    fn test_step_advances_engine() {
        let (engine, state) = MockPhysics::new();
        let mut bridge = PhysicsBridge::new(Box::new(engine), 0.5);
        bridge.step();
        bridge.step();
        assert_eq!(bridge.steps(), 2);
        assert_eq!(state.borrow().steps, 2);
    }

    #[test]
    fn test_create_cube_uses_configured_half_extent() {
        let (engine, state) = MockPhysics::new();
        let mut bridge = PhysicsBridge::new(Box::new(engine), 0.25);
        bridge.create_cube(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(state.borrow().shapes, vec![BodyShape::Cube { half_extent: 0.25 }]);
    }

    #[test]
    fn test_sync_pulls_engine_pose() {
        let (engine, state) = MockPhysics::new();
        state.borrow_mut().fall_per_step = 0.5;
        let mut bridge = PhysicsBridge::new(Box::new(engine), 0.5);
        let mut store = SceneStore::new();
        let id = store.spawn(&mut bridge, Vec3::new(0.0, 3.0, 0.0)).unwrap();

        bridge.step();
        let report = bridge.sync_poses(&mut store);

        assert_eq!(report.synced, 1);
        assert!(report.missing.is_empty());
        assert_eq!(store.get(id).unwrap().position, Vec3::new(0.0, 2.5, 0.0));
    }

    #[test]
    fn test_sync_never_changes_membership() {
        let (engine, state) = MockPhysics::new();
        let mut bridge = PhysicsBridge::new(Box::new(engine), 0.5);
        let mut store = SceneStore::new();
        let a = store.spawn(&mut bridge, Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let b = store.spawn(&mut bridge, Vec3::new(2.0, 1.0, 2.0)).unwrap();

        // The engine silently loses b's body
        let lost = store.get(b).unwrap().body;
        state.borrow_mut().forget(lost);

        let before: Vec<_> = store.list().iter().map(|o| o.id).collect();
        let report = bridge.sync_poses(&mut store);
        let after: Vec<_> = store.list().iter().map(|o| o.id).collect();

        assert_eq!(before, after);
        assert_eq!(report.synced, 1);
        assert_eq!(report.missing, vec![b]);
        assert_eq!(store.get(b).unwrap().position, Vec3::new(2.0, 1.0, 2.0));
        assert!(store.get(a).is_some());
    }
}
