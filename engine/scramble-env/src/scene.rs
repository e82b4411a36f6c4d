//! In-memory scene graph
//!
//! [`MemoryScene`] is a small object tree with a parent-local pose per
//! object. It implements [`SceneAdapter`] for hosts that have no scene graph
//! of their own, such as tests and the command line simulator.

use std::collections::BTreeMap;

use glam::{Affine3A, Vec3};
use scramble_pose::Pose;

use crate::adapter::SceneAdapter;
use crate::error::{Result, ScrambleError};
use crate::ids::{NodeId, ObjectId};

#[derive(Debug, Clone)]
struct SceneObject {
    name: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    local: Pose,
    persisted_id: Option<NodeId>,
}

/// Object tree with local transforms, rooted at the manager's object
#[derive(Debug, Clone)]
pub struct MemoryScene {
    objects: BTreeMap<ObjectId, SceneObject>,
    root: ObjectId,
    next_object: u64,
}

impl MemoryScene {
    /// Create a scene whose root sits at the world origin
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::with_root_pose(root_name, Pose::IDENTITY)
    }

    /// Create a scene whose root has the given world pose
    pub fn with_root_pose(root_name: impl Into<String>, pose: Pose) -> Self {
        let root = ObjectId(0);
        let mut objects = BTreeMap::new();
        objects.insert(
            root,
            SceneObject {
                name: root_name.into(),
                parent: None,
                children: Vec::new(),
                local: pose,
                persisted_id: None,
            },
        );

        Self {
            objects,
            root,
            next_object: 1,
        }
    }

    fn get(&self, object: ObjectId) -> Result<&SceneObject> {
        self.objects
            .get(&object)
            .ok_or(ScrambleError::UnknownObject(object))
    }

    fn get_mut(&mut self, object: ObjectId) -> Result<&mut SceneObject> {
        self.objects
            .get_mut(&object)
            .ok_or(ScrambleError::UnknownObject(object))
    }

    /// Number of objects, root included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds only its root
    pub fn is_empty(&self) -> bool {
        self.objects.len() <= 1
    }

    /// Add a new object as the last child of `parent`
    pub fn spawn(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
        local: Pose,
    ) -> Result<ObjectId> {
        let object = ObjectId(self.next_object);
        self.get_mut(parent)?.children.push(object);
        self.next_object += 1;

        self.objects.insert(
            object,
            SceneObject {
                name: name.into(),
                parent: Some(parent),
                children: Vec::new(),
                local,
                persisted_id: None,
            },
        );
        Ok(object)
    }

    /// Remove an object and its whole subtree
    ///
    /// Returns the removed objects, `object` first. The root cannot be
    /// removed.
    pub fn despawn(&mut self, object: ObjectId) -> Result<Vec<ObjectId>> {
        let parent = self
            .get(object)?
            .parent
            .ok_or_else(|| ScrambleError::Scene(format!("cannot despawn root {object}")))?;
        self.get_mut(parent)?.children.retain(|child| *child != object);

        let mut removed = Vec::new();
        let mut pending = vec![object];
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.objects.remove(&next) {
                pending.extend(entry.children.iter().rev());
                removed.push(next);
            }
        }
        Ok(removed)
    }

    /// Copy an object and its subtree under the same parent
    ///
    /// Persisted ids are copied too, like an editor copy-paste.
    pub fn duplicate(&mut self, object: ObjectId) -> Result<ObjectId> {
        let parent = self
            .get(object)?
            .parent
            .ok_or_else(|| ScrambleError::Scene(format!("cannot duplicate root {object}")))?;
        self.copy_subtree(object, parent)
    }

    fn copy_subtree(&mut self, source: ObjectId, parent: ObjectId) -> Result<ObjectId> {
        let entry = self.get(source)?.clone();
        let copy = self.spawn(parent, entry.name, entry.local)?;
        self.get_mut(copy)?.persisted_id = entry.persisted_id;

        for child in entry.children {
            self.copy_subtree(child, copy)?;
        }
        Ok(copy)
    }

    /// Object name
    pub fn name(&self, object: ObjectId) -> Result<&str> {
        Ok(&self.get(object)?.name)
    }

    /// Parent of an object, `None` for the root
    pub fn parent(&self, object: ObjectId) -> Result<Option<ObjectId>> {
        Ok(self.get(object)?.parent)
    }

    /// First object with the given name, in creation order
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, entry)| entry.name == name)
            .map(|(object, _)| *object)
    }

    /// Composed transform from the object's local space to world space
    pub fn local_to_world(&self, object: ObjectId) -> Result<Affine3A> {
        let mut transform = Affine3A::IDENTITY;
        let mut cursor = Some(object);
        while let Some(current) = cursor {
            let entry = self.get(current)?;
            transform = entry.local.to_affine() * transform;
            cursor = entry.parent;
        }
        Ok(transform)
    }

    /// World position of an object
    pub fn world_position(&self, object: ObjectId) -> Result<Vec3> {
        Ok(self.local_to_world(object)?.translation.into())
    }

    /// Move the root, and with it the manager's frame
    pub fn set_root_pose(&mut self, pose: Pose) {
        if let Some(root) = self.objects.get_mut(&self.root) {
            root.local = pose;
        }
    }
}

impl SceneAdapter for MemoryScene {
    fn root(&self) -> ObjectId {
        self.root
    }

    fn children(&self, object: ObjectId) -> Result<Vec<ObjectId>> {
        Ok(self.get(object)?.children.clone())
    }

    fn parent_to_world(&self, object: ObjectId) -> Result<Affine3A> {
        match self.get(object)?.parent {
            Some(parent) => self.local_to_world(parent),
            None => Ok(Affine3A::IDENTITY),
        }
    }

    fn manager_to_world(&self) -> Result<Affine3A> {
        self.local_to_world(self.root)
    }

    fn current_position(&self, object: ObjectId) -> Result<Vec3> {
        self.world_position(object)
    }

    fn local_pose(&self, object: ObjectId) -> Result<Pose> {
        Ok(self.get(object)?.local)
    }

    fn set_local_pose(&mut self, object: ObjectId, pose: &Pose) -> Result<()> {
        self.get_mut(object)?.local = *pose;
        Ok(())
    }

    fn persisted_id(&self, object: ObjectId) -> Result<Option<NodeId>> {
        Ok(self.get(object)?.persisted_id.clone())
    }

    fn persist_id(&mut self, object: ObjectId, id: &NodeId) -> Result<()> {
        self.get_mut(object)?.persisted_id = Some(id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_world_position_composes_parent_chain() {
        let mut scene = MemoryScene::with_root_pose(
            "root",
            Pose::IDENTITY.with_position(Vec3::new(10.0, 0.0, 0.0)),
        );
        let root = scene.root();
        let parent = scene
            .spawn(
                root,
                "parent",
                Pose::new(
                    Vec3::new(0.0, 5.0, 0.0),
                    Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                    Vec3::splat(2.0),
                ),
            )
            .unwrap();
        let child = scene
            .spawn(parent, "child", Pose::IDENTITY.with_position(Vec3::X))
            .unwrap();

        let world = scene.world_position(child).unwrap();
        assert!(world.abs_diff_eq(Vec3::new(10.0, 7.0, 0.0), 1e-5), "{world}");

        let back = scene
            .world_to_parent(child)
            .unwrap()
            .transform_point3(world);
        assert!(back.abs_diff_eq(Vec3::X, 1e-5), "{back}");
    }

    #[test]
    fn test_unknown_object_fails() {
        let scene = MemoryScene::new("root");
        assert_eq!(
            scene.local_pose(ObjectId(42)),
            Err(ScrambleError::UnknownObject(ObjectId(42)))
        );
    }

    #[test]
    fn test_despawn_removes_subtree() {
        let mut scene = MemoryScene::new("root");
        let root = scene.root();
        let a = scene.spawn(root, "a", Pose::IDENTITY).unwrap();
        let b = scene.spawn(a, "b", Pose::IDENTITY).unwrap();
        let c = scene.spawn(root, "c", Pose::IDENTITY).unwrap();

        let removed = scene.despawn(a).unwrap();
        assert_eq!(removed, vec![a, b]);
        assert_eq!(scene.children(root).unwrap(), vec![c]);
        assert!(scene.despawn(root).is_err());
    }

    #[test]
    fn test_duplicate_copies_persisted_ids() {
        let mut scene = MemoryScene::new("root");
        let root = scene.root();
        let a = scene.spawn(root, "a", Pose::IDENTITY).unwrap();
        scene.spawn(a, "b", Pose::IDENTITY).unwrap();
        scene.persist_id(a, &NodeId::from("a-id")).unwrap();

        let copy = scene.duplicate(a).unwrap();
        assert_eq!(
            scene.persisted_id(copy).unwrap(),
            Some(NodeId::from("a-id"))
        );
        assert_eq!(scene.children(copy).unwrap().len(), 1);
        assert_eq!(scene.len(), 5);
    }
}
