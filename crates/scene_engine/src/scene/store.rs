//! Authoritative collection of placed objects

use super::{ObjectId, SceneError, SceneObject};
use crate::foundation::math::{utils, Vec3};
use crate::physics::PhysicsBridge;
use slotmap::SlotMap;

/// Objects in the scene, kept in insertion order
///
/// Every object maps to exactly one live physics body. Spawning and removal
/// go through the [`PhysicsBridge`] so store entry and body appear and
/// disappear together.
#[derive(Debug, Default)]
pub struct SceneStore {
    objects: SlotMap<ObjectId, SceneObject>,
    order: Vec<ObjectId>,
}

impl SceneStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cube at `position` and start tracking it
    ///
    /// # Errors
    /// [`SceneError::SpawnFailed`] when the physics engine refuses the body.
    /// The store is unchanged in that case.
    pub fn spawn(&mut self, bridge: &mut PhysicsBridge, position: Vec3) -> Result<ObjectId, SceneError> {
        let body = bridge.create_cube(position).map_err(SceneError::SpawnFailed)?;
        let id = self
            .objects
            .insert_with_key(|id| SceneObject::new(id, body, position));
        self.order.push(id);
        log::debug!("Spawned object {:?} (body {:?}) at {:?}", id, body, position);
        Ok(id)
    }

    /// Remove a known object and its body
    pub fn remove(&mut self, bridge: &mut PhysicsBridge, id: ObjectId) -> Option<SceneObject> {
        let object = self.objects.remove(id)?;
        self.order.retain(|other| *other != id);
        if !bridge.remove(object.body) {
            log::warn!("Body {:?} of object {:?} was already gone from physics", object.body, id);
        }
        log::debug!("Removed object {:?}", id);
        Some(object)
    }

    /// Object closest to `point` on the ground plane (X/Z)
    ///
    /// Ties go to the object inserted first. With `max_radius`, objects
    /// farther than the radius are not candidates.
    pub fn nearest(&self, point: Vec3, max_radius: Option<f32>) -> Option<ObjectId> {
        let mut best: Option<(ObjectId, f32)> = None;
        for object in self.iter() {
            let distance = utils::planar_distance_squared(&object.position, &point);
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((object.id, distance));
            }
        }

        let (id, distance) = best?;
        match max_radius {
            Some(radius) if distance > radius * radius => None,
            _ => Some(id),
        }
    }

    /// Remove the object nearest to `point`, see [`SceneStore::nearest`]
    pub fn remove_nearest(
        &mut self,
        bridge: &mut PhysicsBridge,
        point: Vec3,
        max_radius: Option<f32>,
    ) -> Option<ObjectId> {
        let Some(id) = self.nearest(point, max_radius) else {
            log::debug!("No object near {:?} to remove", point);
            return None;
        };
        self.remove(bridge, id).map(|object| object.id)
    }

    /// Remove the most recently spawned object
    pub fn remove_last(&mut self, bridge: &mut PhysicsBridge) -> Option<ObjectId> {
        let id = *self.order.last()?;
        self.remove(bridge, id).map(|object| object.id)
    }

    /// Remove every object and its body, returning how many were removed
    pub fn clear(&mut self, bridge: &mut PhysicsBridge) -> usize {
        let ids = std::mem::take(&mut self.order);
        for id in &ids {
            if let Some(object) = self.objects.remove(*id) {
                bridge.remove(object.body);
            }
        }
        if !ids.is_empty() {
            log::info!("Cleared {} objects", ids.len());
        }
        ids.len()
    }

    /// Snapshot of all objects in insertion order
    pub fn list(&self) -> Vec<&SceneObject> {
        self.iter().collect()
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.order.iter().filter_map(|id| self.objects.get(*id))
    }

    /// Ids in insertion order
    pub fn ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    /// Positions in insertion order
    pub fn positions(&self) -> Vec<Vec3> {
        self.iter().map(|object| object.position).collect()
    }

    /// Look up one object
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Whether `id` is tracked
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the scene is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> + '_ {
        self.objects.values_mut()
    }
}
