//! Per-object pose state
//!
//! A [`Node`] keeps three parent-local poses for one scene object:
//!
//! - `initial`: the rest pose, captured on registration or set explicitly
//! - `target`: the randomized scramble destination
//! - `start`: the pose the current motion segment began from
//!
//! World-space values are derived from the parent transform every time they
//! are read, so reparenting or moving an ancestor never leaves stale data.

use glam::{Quat, Vec3};
use log::trace;
use rand::Rng;
use scramble_pose::{Pose, RotationBlend, ScalarRange, euler_degrees_to_quat, lerp_pose_with};
use scramble_pose::{sample_offset, sample_rotation, sample_uniform_scale};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::adapter::SceneAdapter;
use crate::error::Result;
use crate::ids::{ManagerId, NodeId, ObjectId};
use crate::state::MoveKind;

/// One animated scene object
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    id: NodeId,
    object: ObjectId,
    owner: ManagerId,
    priority: u32,
    initial: Pose,
    start: Pose,
    target: Pose,
    target_rotation_axis: Vec3,
    accumulated_progress: f32,
}

impl Node {
    pub(crate) fn new(id: NodeId, object: ObjectId, owner: ManagerId, priority: u32) -> Self {
        Self {
            id,
            object,
            owner,
            priority,
            initial: Pose::IDENTITY,
            start: Pose::IDENTITY,
            target: Pose::IDENTITY,
            target_rotation_axis: Vec3::ZERO,
            accumulated_progress: 0.0,
        }
    }

    /// Stable identifier
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Scene object this node animates
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Manager that created the node
    pub fn owner(&self) -> ManagerId {
        self.owner
    }

    /// Traversal priority (hierarchy depth below the manager)
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Rest pose, parent-local
    pub fn initial(&self) -> &Pose {
        &self.initial
    }

    /// Pose the current motion segment started from, parent-local
    pub fn start(&self) -> &Pose {
        &self.start
    }

    /// Scramble destination, parent-local
    pub fn target(&self) -> &Pose {
        &self.target
    }

    /// Axis of the last target rotation draw, in the parent frame
    pub fn target_rotation_axis(&self) -> Vec3 {
        self.target_rotation_axis
    }

    /// Sum of the progress deltas applied since the last realign
    pub fn accumulated_progress(&self) -> f32 {
        self.accumulated_progress
    }

    pub(crate) fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    /// Capture the visible transform as the rest pose and start from it
    pub fn initialize<S: SceneAdapter + ?Sized>(&mut self, scene: &S) -> Result<()> {
        self.initial = scene.local_pose(self.object)?;
        self.reset_start();
        Ok(())
    }

    /// Restart from the rest pose without touching the visible transform
    pub fn reset_start(&mut self) {
        self.start = self.initial;
        self.accumulated_progress = 0.0;
    }

    /// Draw a new target pose
    ///
    /// The position is drawn inside `zone` around the manager and converted
    /// into the parent frame. The drawn rotation is applied on top of the
    /// current local rotation.
    pub fn randomize_target<S, R>(
        &mut self,
        scene: &S,
        rng: &mut R,
        zone: Vec3,
        rotation_range: ScalarRange,
        scale_range: ScalarRange,
    ) -> Result<()>
    where
        S: SceneAdapter + ?Sized,
        R: Rng + ?Sized,
    {
        let position = self.zone_point_in_parent(scene, rng, zone)?;
        let current = scene.local_pose(self.object)?.rotation;
        let drawn = sample_rotation(rng, rotation_range);

        self.target = Pose::new(
            position,
            current * drawn.rotation,
            sample_uniform_scale(rng, scale_range),
        );
        self.target_rotation_axis = current * drawn.axis;

        trace!("node {} target {:?}", self.id, self.target);
        Ok(())
    }

    /// Draw a new rest pose and show it immediately
    pub fn randomize_initial<S, R>(
        &mut self,
        scene: &mut S,
        rng: &mut R,
        zone: Vec3,
        rotation_range: ScalarRange,
        scale_range: ScalarRange,
    ) -> Result<()>
    where
        S: SceneAdapter + ?Sized,
        R: Rng + ?Sized,
    {
        let position = self.zone_point_in_parent(&*scene, rng, zone)?;
        let drawn = sample_rotation(rng, rotation_range);

        self.initial = Pose::new(
            position,
            drawn.rotation,
            sample_uniform_scale(rng, scale_range),
        );
        scene.set_local_pose(self.object, &self.initial)
    }

    fn zone_point_in_parent<S, R>(&self, scene: &S, rng: &mut R, zone: Vec3) -> Result<Vec3>
    where
        S: SceneAdapter + ?Sized,
        R: Rng + ?Sized,
    {
        let offset = sample_offset(rng, zone);
        let world = scene.manager_to_world()?.transform_point3(offset);
        Ok(scene.world_to_parent(self.object)?.transform_point3(world))
    }

    /// Endpoints of the motion segment for `kind`, parent-local
    pub fn segment(&self, kind: MoveKind) -> (&Pose, &Pose) {
        match kind {
            MoveKind::Target => (&self.start, &self.target),
            MoveKind::Initial => (&self.target, &self.initial),
        }
    }

    /// Endpoints of the motion segment for `kind`, in world space
    pub fn segment_world<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        kind: MoveKind,
    ) -> Result<(Vec3, Vec3)> {
        let parent = scene.parent_to_world(self.object)?;
        let (from, to) = self.segment(kind);
        Ok((
            parent.transform_point3(from.position),
            parent.transform_point3(to.position),
        ))
    }

    /// Advance along the `kind` segment by `delta` and show the result
    ///
    /// Progress is not clamped; the caller stops calling once the segment is
    /// complete.
    pub fn move_by<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        delta: f32,
        kind: MoveKind,
        blend: RotationBlend,
    ) -> Result<Pose> {
        self.accumulated_progress += delta;

        let (from, to) = self.segment(kind);
        let pose = lerp_pose_with(from, to, self.accumulated_progress, blend);
        scene.set_local_pose(self.object, &pose)?;

        trace!(
            "node {} {:?} progress {:.4}",
            self.id, kind, self.accumulated_progress
        );
        Ok(pose)
    }

    /// Make the destination of `kind` the new start pose and snap to it
    pub fn realign<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, kind: MoveKind) -> Result<()> {
        self.accumulated_progress = 0.0;
        self.start = match kind {
            MoveKind::Target => self.target,
            MoveKind::Initial => self.initial,
        };
        scene.set_local_pose(self.object, &self.start)
    }

    /// Override the rest position, given in world space
    pub fn set_initial_position<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        world: Vec3,
    ) -> Result<()> {
        let local = scene.world_to_parent(self.object)?.transform_point3(world);
        self.initial.position = local;
        self.start.position = local;

        let current = scene.local_pose(self.object)?;
        scene.set_local_pose(self.object, &current.with_position(local))
    }

    /// Override the rest rotation from Euler angles in degrees
    pub fn set_initial_rotation<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        euler_degrees: Vec3,
    ) -> Result<()> {
        let rotation = euler_degrees_to_quat(euler_degrees);
        self.initial.rotation = rotation;
        self.start.rotation = rotation;

        let current = scene.local_pose(self.object)?;
        scene.set_local_pose(self.object, &current.with_rotation(rotation))
    }

    /// Override the rest scale
    pub fn set_initial_scale<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        scale: Vec3,
    ) -> Result<()> {
        self.initial.scale = scale;
        self.start.scale = scale;

        let current = scene.local_pose(self.object)?;
        scene.set_local_pose(self.object, &current.with_scale(scale))
    }

    /// Start position in world space
    pub fn start_world_position<S: SceneAdapter + ?Sized>(&self, scene: &S) -> Result<Vec3> {
        Ok(scene
            .parent_to_world(self.object)?
            .transform_point3(self.start.position))
    }

    /// Target position in world space
    pub fn target_world_position<S: SceneAdapter + ?Sized>(&self, scene: &S) -> Result<Vec3> {
        Ok(scene
            .parent_to_world(self.object)?
            .transform_point3(self.target.position))
    }

    /// Rest position in world space
    pub fn initial_world_position<S: SceneAdapter + ?Sized>(&self, scene: &S) -> Result<Vec3> {
        Ok(scene
            .parent_to_world(self.object)?
            .transform_point3(self.initial.position))
    }

    /// Target rotation in world space
    pub fn target_world_rotation<S: SceneAdapter + ?Sized>(&self, scene: &S) -> Result<Quat> {
        let (_, parent_rotation, _) = scene
            .parent_to_world(self.object)?
            .to_scale_rotation_translation();
        Ok(parent_rotation * self.target.rotation)
    }
}
