//! In-memory physics engine for tests
//!
//! Bodies fall straight down by `fall_per_step` per step and never collide.
//! The shared state handle lets a test inspect or sabotage the engine after
//! it has been boxed into a [`PhysicsBridge`](super::PhysicsBridge).

use super::{BodyHandle, BodyShape, PhysicsEngine, PhysicsError, Pose};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub bodies: BTreeMap<BodyHandle, Pose>,
    pub shapes: Vec<BodyShape>,
    pub next: u64,
    pub limit: Option<usize>,
    pub fall_per_step: f32,
    pub steps: u64,
}

impl MockState {
    /// Drop a body without telling the scene
    pub fn forget(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }
}

#[derive(Debug)]
pub(crate) struct MockPhysics {
    state: Rc<RefCell<MockState>>,
}

impl MockPhysics {
    pub fn new() -> (Self, Rc<RefCell<MockState>>) {
        let state = Rc::new(RefCell::new(MockState::default()));
        (Self { state: Rc::clone(&state) }, state)
    }

    pub fn with_limit(limit: usize) -> (Self, Rc<RefCell<MockState>>) {
        let (engine, state) = Self::new();
        state.borrow_mut().limit = Some(limit);
        (engine, state)
    }
}

impl PhysicsEngine for MockPhysics {
    fn create_body(&mut self, shape: BodyShape, pose: Pose) -> Result<BodyHandle, PhysicsError> {
        let mut state = self.state.borrow_mut();
        if let Some(limit) = state.limit {
            if state.bodies.len() >= limit {
                return Err(PhysicsError::CapacityExceeded { limit });
            }
        }
        if !pose.position.iter().all(|v| v.is_finite()) {
            return Err(PhysicsError::InvalidPose("non-finite".to_string()));
        }
        let handle = BodyHandle(state.next);
        state.next += 1;
        state.bodies.insert(handle, pose);
        state.shapes.push(shape);
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.state.borrow_mut().bodies.remove(&body).is_some()
    }

    fn step_simulation(&mut self) {
        let mut state = self.state.borrow_mut();
        let fall = state.fall_per_step;
        for pose in state.bodies.values_mut() {
            pose.position.y -= fall;
        }
        state.steps += 1;
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.state.borrow().bodies.get(&body).copied()
    }

    fn body_count(&self) -> usize {
        self.state.borrow().bodies.len()
    }
}
