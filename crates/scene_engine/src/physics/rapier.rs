//! Physics engine backed by `rapier3d`
//!
//! One static half-space forms the ground; every spawned cube is a dynamic
//! body with a cuboid collider. The world advances by a fixed timestep per
//! call to [`PhysicsEngine::step_simulation`].

use super::{BodyHandle, BodyShape, PhysicsEngine, PhysicsError, Pose};
use crate::config::PhysicsConfig;
use crate::foundation::math::{Quat, Quaternion, Vec3};
use rapier3d::na::{
    Isometry3, Quaternion as RapierQuaternion, Translation3, UnitQuaternion as RapierUnitQuaternion,
};
use rapier3d::prelude::*;
use std::collections::HashMap;
use std::fmt;

/// Rapier world plus the handle table exposed to the editor
pub struct RapierPhysics {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    bodies: HashMap<BodyHandle, RigidBodyHandle>,
    next_handle: u64,
    max_bodies: usize,
    frame: u64,
}

impl fmt::Debug for RapierPhysics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RapierPhysics")
            .field("frame", &self.frame)
            .field("body_count", &self.bodies.len())
            .field("max_bodies", &self.max_bodies)
            .field("gravity", &self.gravity)
            .finish_non_exhaustive()
    }
}

impl RapierPhysics {
    /// Create a world with a ground plane at `ground_height`
    pub fn new(config: &PhysicsConfig, ground_height: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: config.timestep,
            ..Default::default()
        };

        let mut collider_set = ColliderSet::new();
        let ground = ColliderBuilder::halfspace(Vector::y_axis())
            .translation(Vector::new(0.0, ground_height, 0.0))
            .build();
        collider_set.insert(ground);

        log::debug!(
            "Rapier world created: dt={}, gravity={:?}, ground at y={}",
            config.timestep,
            config.gravity,
            ground_height
        );

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(config.gravity.x, config.gravity.y, config.gravity.z),
            bodies: HashMap::new(),
            next_handle: 0,
            max_bodies: config.max_bodies,
            frame: 0,
        }
    }

    /// Number of simulation steps taken
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    fn validate_pose(pose: &Pose) -> Result<(), PhysicsError> {
        if !pose.position.iter().all(|v| v.is_finite()) {
            return Err(PhysicsError::InvalidPose(format!(
                "non-finite position {:?}",
                pose.position
            )));
        }
        if let Some(rotation) = pose.orientation {
            if !rotation.coords.iter().all(|v| v.is_finite()) {
                return Err(PhysicsError::InvalidPose("non-finite orientation".to_string()));
            }
        }
        Ok(())
    }

    fn isometry(pose: &Pose) -> Isometry3<Real> {
        let translation = Translation3::new(pose.position.x, pose.position.y, pose.position.z);
        let rotation = pose.orientation.map_or_else(RapierUnitQuaternion::identity, |q| {
            RapierUnitQuaternion::from_quaternion(RapierQuaternion::new(q.w, q.i, q.j, q.k))
        });
        Isometry3::from_parts(translation, rotation)
    }
}

impl PhysicsEngine for RapierPhysics {
    fn create_body(&mut self, shape: BodyShape, pose: Pose) -> Result<BodyHandle, PhysicsError> {
        if self.bodies.len() >= self.max_bodies {
            return Err(PhysicsError::CapacityExceeded {
                limit: self.max_bodies,
            });
        }
        Self::validate_pose(&pose)?;

        let body = RigidBodyBuilder::dynamic()
            .position(Self::isometry(&pose))
            .build();
        let rapier_handle = self.rigid_body_set.insert(body);

        let collider = match shape {
            BodyShape::Cube { half_extent } => {
                ColliderBuilder::cuboid(half_extent, half_extent, half_extent).build()
            }
        };
        self.collider_set
            .insert_with_parent(collider, rapier_handle, &mut self.rigid_body_set);

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(handle, rapier_handle);
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        let Some(rapier_handle) = self.bodies.remove(&body) else {
            return false;
        };
        self.rigid_body_set
            .remove(
                rapier_handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    fn step_simulation(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.frame += 1;
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        let rapier_handle = self.bodies.get(&body)?;
        let rigid_body = self.rigid_body_set.get(*rapier_handle)?;

        let t = rigid_body.translation();
        let r = rigid_body.rotation();
        Some(Pose {
            position: Vec3::new(t.x, t.y, t.z),
            orientation: Some(Quat::from_quaternion(Quaternion::new(r.w, r.i, r.j, r.k))),
        })
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE: BodyShape = BodyShape::Cube { half_extent: 0.5 };

    fn world() -> RapierPhysics {
        RapierPhysics::new(&PhysicsConfig::default(), 0.0)
    }

    #[test]
    fn test_cube_falls_and_rests_on_ground() {
        let mut physics = world();
        let body = physics.create_body(CUBE, Pose::at(Vec3::new(2.0, 3.0, -1.0))).unwrap();

        for _ in 0..240 {
            physics.step_simulation();
        }

        let pose = physics.pose(body).unwrap();
        assert!(pose.position.y < 3.0, "cube did not fall: {:?}", pose.position);
        assert!(pose.position.y > 0.3, "cube fell through the ground: {:?}", pose.position);
        assert!((pose.position.x - 2.0).abs() < 0.05);
        assert!((pose.position.z + 1.0).abs() < 0.05);
        assert!(pose.orientation.is_some());
        assert_eq!(physics.current_frame(), 240);
    }

    #[test]
    fn test_remove_body() {
        let mut physics = world();
        let body = physics.create_body(CUBE, Pose::at(Vec3::new(0.0, 1.0, 0.0))).unwrap();
        assert_eq!(physics.body_count(), 1);

        assert!(physics.remove_body(body));
        assert!(!physics.remove_body(body));
        assert!(physics.pose(body).is_none());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut physics = world();
        let first = physics.create_body(CUBE, Pose::at(Vec3::zeros())).unwrap();
        physics.remove_body(first);
        let second = physics.create_body(CUBE, Pose::at(Vec3::zeros())).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_capacity_limit_refuses_body() {
        let config = PhysicsConfig {
            max_bodies: 1,
            ..PhysicsConfig::default()
        };
        let mut physics = RapierPhysics::new(&config, 0.0);
        physics.create_body(CUBE, Pose::at(Vec3::zeros())).unwrap();

        let refused = physics.create_body(CUBE, Pose::at(Vec3::zeros()));
        assert_eq!(refused, Err(PhysicsError::CapacityExceeded { limit: 1 }));
        assert_eq!(physics.body_count(), 1);
    }

    #[test]
    fn test_non_finite_position_is_refused() {
        let mut physics = world();
        let refused = physics.create_body(CUBE, Pose::at(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(matches!(refused, Err(PhysicsError::InvalidPose(_))));
        assert_eq!(physics.body_count(), 0);
    }
}
