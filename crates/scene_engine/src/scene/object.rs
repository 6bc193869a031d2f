//! Scene objects

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::BodyHandle;

slotmap::new_key_type! {
    /// Generational identity of a scene object
    ///
    /// A removed object's key is never handed out again for a later object.
    pub struct ObjectId;
}

/// One cube in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Identity, assigned at spawn
    pub id: ObjectId,
    /// Physics body backing this object
    pub body: BodyHandle,
    /// Last position pulled from physics, or the spawn position before the first sync
    pub position: Vec3,
    /// Last orientation reported by physics, if any
    pub orientation: Option<Quat>,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, body: BodyHandle, position: Vec3) -> Self {
        Self {
            id,
            body,
            position,
            orientation: None,
        }
    }

    /// World transform of a unit cube scaled by `scale`
    ///
    /// Identity rotation is used until physics reports an orientation.
    pub fn transform(&self, scale: f32) -> Transform {
        Transform::from_position_rotation(self.position, self.orientation.unwrap_or_else(Quat::identity))
            .with_uniform_scale(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_transform_defaults_to_identity_rotation() {
        let mut keys: SlotMap<ObjectId, ()> = SlotMap::with_key();
        let object = SceneObject::new(keys.insert(()), BodyHandle(7), Vec3::new(1.0, 2.0, 3.0));

        let transform = object.transform(2.0);
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.rotation, Quat::identity());
        assert_eq!(transform.scale, Vec3::new(2.0, 2.0, 2.0));
    }
}
