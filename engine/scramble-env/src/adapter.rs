//! Boundary between the engine and the host's scene graph
//!
//! The engine never stores transforms of its own beyond the three poses kept
//! per node. Everything it needs to know about the live scene, and every
//! write to a visible transform, goes through [`SceneAdapter`].

use glam::{Affine3A, Vec3};
use scramble_pose::Pose;

use crate::error::Result;
use crate::ids::{NodeId, ObjectId};

/// Host-side access to the scene graph
///
/// Every method that takes an [`ObjectId`] must fail with
/// [`ScrambleError::UnknownObject`](crate::ScrambleError::UnknownObject) for
/// objects the host does not know instead of returning a placeholder.
pub trait SceneAdapter {
    /// Object the manager is attached to
    fn root(&self) -> ObjectId;

    /// Direct children of `object` in the host's child order
    fn children(&self, object: ObjectId) -> Result<Vec<ObjectId>>;

    /// Transform from the parent space of `object` into world space
    fn parent_to_world(&self, object: ObjectId) -> Result<Affine3A>;

    /// Transform from world space into the parent space of `object`
    fn world_to_parent(&self, object: ObjectId) -> Result<Affine3A> {
        Ok(self.parent_to_world(object)?.inverse())
    }

    /// Transform from the manager's own frame into world space
    fn manager_to_world(&self) -> Result<Affine3A>;

    /// World-space position of the visible transform
    fn current_position(&self, object: ObjectId) -> Result<Vec3>;

    /// Visible transform relative to the parent
    fn local_pose(&self, object: ObjectId) -> Result<Pose>;

    /// Overwrite the visible transform relative to the parent
    fn set_local_pose(&mut self, object: ObjectId, pose: &Pose) -> Result<()>;

    /// Node identifier previously stored on the object, if any
    fn persisted_id(&self, object: ObjectId) -> Result<Option<NodeId>>;

    /// Store a node identifier on the object so later scans find it again
    fn persist_id(&mut self, object: ObjectId, id: &NodeId) -> Result<()>;
}
