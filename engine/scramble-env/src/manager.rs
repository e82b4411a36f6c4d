//! Node collection and the shared control state machine
//!
//! A [`Manager`] owns every [`Node`] under one scene subtree and drives them
//! through the NONE → SCRAMBLE → STOP → REVERT → NONE cycle, one fixed tick
//! at a time.
//!
//! Progress is never derived from elapsed time. Each tick the node's current
//! world position is pushed along its segment by `|segment| / travel_time * dt`
//! and both points are projected back onto the segment; the difference is the
//! progress delta. Completion is decided from where the node actually is, so
//! a node pushed past its destination from outside finishes on the next tick.

use std::collections::HashMap;

use glam::Vec3;
use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scramble_pose::{Pose, ScalarRange, inverse_lerp_along_segment, is_degenerate_segment};

use crate::adapter::SceneAdapter;
use crate::config::ScrambleConfig;
use crate::error::{Result, ScrambleError};
use crate::ids::{ManagerId, NodeId, ObjectId};
use crate::node::Node;
use crate::state::{ControlState, MoveKind};

/// Projected progress at or above `1 - COMPLETION_EPSILON` completes a segment
pub const COMPLETION_EPSILON: f32 = 1e-5;

/// Outcome of a single [`Manager::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// State after the tick
    pub state: ControlState,
    /// Nodes whose segment was complete this tick
    pub completed: usize,
    /// Nodes that were moved this tick
    pub moved: usize,
    /// State entered at the end of the tick, if any
    pub transition: Option<ControlState>,
}

impl TickReport {
    fn idle(state: ControlState) -> Self {
        Self {
            state,
            completed: 0,
            moved: 0,
            transition: None,
        }
    }
}

/// Owner of the nodes of one animated subtree
#[derive(Debug)]
pub struct Manager {
    id: ManagerId,
    config: ScrambleConfig,
    state: ControlState,
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
    objects: HashMap<ObjectId, NodeId>,
    rng: StdRng,
    epoch: u64,
}

impl Manager {
    /// Create a manager over the scene's root and register its subtree
    pub fn enable<S: SceneAdapter + ?Sized>(config: ScrambleConfig, scene: &mut S) -> Result<Self> {
        config.validate()?;

        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let mut manager = Self {
            id: ManagerId::next(),
            config,
            state: ControlState::None,
            nodes: HashMap::new(),
            order: Vec::new(),
            objects: HashMap::new(),
            rng,
            epoch: 0,
        };

        manager.populate(scene)?;

        info!(
            "{} enabled on {} with {} nodes",
            manager.id,
            scene.root(),
            manager.len()
        );
        Ok(manager)
    }

    /// Manager identity
    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// Current control state
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Active configuration
    pub fn config(&self) -> &ScrambleConfig {
        &self.config
    }

    /// Replace the configuration; applies to the next draw and tick
    pub fn set_config(&mut self, config: ScrambleConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Box target positions are drawn from
    pub fn random_zone(&self) -> Vec3 {
        self.config.random_zone
    }

    /// Range of each rotation axis component
    pub fn rotation_range(&self) -> ScalarRange {
        self.config.rotation_range
    }

    /// Range of the uniform target scale
    pub fn scale_range(&self) -> ScalarRange {
        self.config.scale_range
    }

    /// Seconds per full segment
    pub fn travel_time(&self) -> f32 {
        self.config.travel_time
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no node is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in priority order, ties in registration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Look up a node by id
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node for mutation, failing if this manager does not own it
    pub fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        let manager = self.id;
        self.nodes
            .get_mut(id)
            .ok_or_else(|| ScrambleError::NotRegistered {
                node: id.clone(),
                manager,
            })
    }

    /// Counter bumped whenever node progress is reset to 0
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Node registered for a scene object
    pub fn node_for_object(&self, object: ObjectId) -> Option<&NodeId> {
        self.objects.get(&object)
    }

    /// Scan the subtree and register every object that has no node yet
    ///
    /// Known objects only get their priority refreshed. Returns the number of
    /// nodes added. Nodes are never removed here.
    pub fn populate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> Result<usize> {
        let before = self.order.len();
        let root = scene.root();
        self.populate_from(scene, root, 0)?;

        let nodes = &self.nodes;
        self.order
            .sort_by_key(|id| nodes.get(id).map_or(u32::MAX, Node::priority));

        let added = self.order.len() - before;
        if added > 0 {
            debug!("{} registered {} new nodes", self.id, added);
        }
        Ok(added)
    }

    fn populate_from<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        parent: ObjectId,
        depth: u32,
    ) -> Result<()> {
        for child in scene.children(parent)? {
            if let Some(id) = self.objects.get(&child) {
                if let Some(node) = self.nodes.get_mut(id) {
                    node.set_priority(depth);
                }
            } else {
                self.register(scene, child, depth)?;
            }

            self.populate_from(scene, child, depth + 1)?;
        }
        Ok(())
    }

    fn register<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        object: ObjectId,
        priority: u32,
    ) -> Result<()> {
        let id = match scene.persisted_id(object)? {
            Some(id) if self.nodes.contains_key(&id) => {
                let fresh = NodeId::generate();
                info!("duplicate node id {id} on {object}, reassigned to {fresh}");
                fresh
            }
            Some(id) => id,
            None => NodeId::generate(),
        };
        scene.persist_id(object, &id)?;

        let mut node = Node::new(id.clone(), object, self.id, priority);
        node.initialize(&*scene)?;
        node.randomize_target(
            &*scene,
            &mut self.rng,
            self.config.random_zone,
            self.config.rotation_range,
            self.config.scale_range,
        )?;

        trace!("{} registered node {id} for {object} at depth {priority}", self.id);
        self.objects.insert(object, id.clone());
        self.nodes.insert(id.clone(), node);
        self.order.push(id);
        Ok(())
    }

    /// Host notification that the subtree's children changed
    pub fn notify_children_changed<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<usize> {
        self.populate(scene)
    }

    /// Host notification that a node's object was destroyed
    ///
    /// Returns the dropped node, or `None` if it was not registered.
    pub fn notify_destroyed(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.objects.remove(&node.object());
        self.order.retain(|entry| entry != id);

        info!("{} dropped node {id}", self.id);
        Some(node)
    }

    /// Ask for a state change
    ///
    /// Ignored while SCRAMBLE or REVERT is running; returns whether the
    /// request was honored.
    pub fn request_state<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        state: ControlState,
    ) -> Result<bool> {
        if self.state.is_busy() {
            debug!(
                "{} ignoring request for {state} while {}",
                self.id, self.state
            );
            return Ok(false);
        }

        self.enter(scene, state)?;
        Ok(true)
    }

    /// Jump to STOP or NONE immediately, cancelling any motion
    pub fn force_state<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        state: ControlState,
    ) -> Result<()> {
        match state {
            ControlState::Stop | ControlState::None => self.enter(scene, state),
            ControlState::Scramble | ControlState::Revert => {
                Err(ScrambleError::NotForceable(state))
            }
        }
    }

    fn enter<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, state: ControlState) -> Result<()> {
        match state {
            ControlState::Scramble => self.randomize_all_targets(&*scene)?,
            ControlState::Stop => self.realign_all(scene, MoveKind::Target)?,
            ControlState::None => self.realign_all(scene, MoveKind::Initial)?,
            ControlState::Revert => {}
        }

        debug!("{} {} -> {}", self.id, self.state, state);
        self.state = state;
        Ok(())
    }

    fn realign_all<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, kind: MoveKind) -> Result<()> {
        self.epoch += 1;
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                node.realign(scene, kind)?;
            }
        }
        Ok(())
    }

    /// Advance every node by one fixed step of `dt` seconds
    ///
    /// Only SCRAMBLE and REVERT move anything. When every node is complete
    /// the resting state is entered before returning, so a manager with no
    /// nodes finishes on its first tick. A non-positive or non-finite `dt`
    /// does nothing.
    pub fn tick<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, dt: f32) -> Result<TickReport> {
        let Some(kind) = self.state.motion() else {
            return Ok(TickReport::idle(self.state));
        };
        if !(dt.is_finite() && dt > 0.0) {
            return Ok(TickReport::idle(self.state));
        }

        let travel_time = self.config.travel_time;
        let blend = self.config.rotation_blend;
        let mut completed = 0;
        let mut moved = 0;

        for id in &self.order {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };

            match project_step(&*scene, node, kind, dt, travel_time)? {
                Some(delta) => {
                    node.move_by(scene, delta, kind, blend)?;
                    moved += 1;
                }
                None => completed += 1,
            }
        }

        let mut transition = None;
        if completed >= self.order.len() {
            if let Some(next) = self.state.completion() {
                self.enter(scene, next)?;
                transition = Some(next);
            }
        }

        Ok(TickReport {
            state: self.state,
            completed,
            moved,
            transition,
        })
    }

    /// Draw a new target pose for every node
    pub fn randomize_all_targets<S: SceneAdapter + ?Sized>(&mut self, scene: &S) -> Result<()> {
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                node.randomize_target(
                    scene,
                    &mut self.rng,
                    self.config.random_zone,
                    self.config.rotation_range,
                    self.config.scale_range,
                )?;
            }
        }
        Ok(())
    }

    /// Draw a new rest pose for every node, show it, and restart from it
    pub fn randomize_all_initial<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> Result<()> {
        self.epoch += 1;
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                node.randomize_initial(
                    scene,
                    &mut self.rng,
                    self.config.random_zone,
                    self.config.rotation_range,
                    self.config.scale_range,
                )?;
                node.reset_start();
            }
        }
        Ok(())
    }

    /// Give every node the same rest pose
    ///
    /// `position` is in world space and `euler_degrees` in degrees.
    pub fn set_all_initial<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        position: Vec3,
        euler_degrees: Vec3,
        scale: Vec3,
    ) -> Result<()> {
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_initial_position(scene, position)?;
                node.set_initial_rotation(scene, euler_degrees)?;
                node.set_initial_scale(scene, scale)?;
            }
        }
        Ok(())
    }

    /// Move one node along `kind` by `delta`
    pub fn move_node<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        id: &NodeId,
        delta: f32,
        kind: MoveKind,
    ) -> Result<Pose> {
        let blend = self.config.rotation_blend;
        self.node_mut(id)?.move_by(scene, delta, kind, blend)
    }

    /// Realign one node to the destination of `kind`
    pub fn realign_node<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        id: &NodeId,
        kind: MoveKind,
    ) -> Result<()> {
        self.node_mut(id)?.realign(scene, kind)?;
        self.epoch += 1;
        Ok(())
    }

    /// Apply a scrub delta to every node, never letting progress go below 0
    pub(crate) fn scrub_nodes<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        delta: f32,
    ) -> Result<()> {
        let blend = self.config.rotation_blend;
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                let clamped = delta.max(-node.accumulated_progress());
                node.move_by(scene, clamped, MoveKind::Target, blend)?;
            }
        }
        Ok(())
    }
}

/// Progress delta for one tick, or `None` once the segment is complete
fn project_step<S: SceneAdapter + ?Sized>(
    scene: &S,
    node: &Node,
    kind: MoveKind,
    dt: f32,
    travel_time: f32,
) -> Result<Option<f32>> {
    let (from, to) = node.segment_world(scene, kind)?;
    if is_degenerate_segment(from, to) {
        return Ok(None);
    }
    let current = scene.current_position(node.object())?;

    let span = to - from;
    let step = span.normalize_or_zero() * (span.length() / travel_time) * dt;

    // Project the step as an offset; `current + step` loses it to rounding
    // far from the world origin.
    let previous = inverse_lerp_along_segment(from, to, current);
    let next = previous + step.dot(span) / span.length_squared();

    if next >= 1.0 - COMPLETION_EPSILON {
        Ok(None)
    } else {
        Ok(Some(next - previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    fn fixed_config() -> ScrambleConfig {
        ScrambleConfig::default()
            .with_random_zone(Vec3::ZERO)
            .with_rotation_range(ScalarRange::fixed(0.0))
            .with_scale_range(ScalarRange::fixed(1.0))
            .with_seed(1)
    }

    #[test]
    fn test_enable_rejects_invalid_config() {
        let mut scene = MemoryScene::new("root");
        let config = ScrambleConfig::default().with_travel_time(-1.0);
        assert!(matches!(
            Manager::enable(config, &mut scene),
            Err(ScrambleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut scene = MemoryScene::new("root");
        let root = scene.root();
        scene.spawn(root, "a", Pose::IDENTITY).unwrap();
        let mut manager = Manager::enable(fixed_config(), &mut scene).unwrap();

        let report = manager.tick(&mut scene, 1.0).unwrap();
        assert_eq!(report, TickReport::idle(ControlState::None));
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut scene = MemoryScene::new("root");
        let root = scene.root();
        let a = scene
            .spawn(root, "a", Pose::IDENTITY.with_position(Vec3::X))
            .unwrap();
        let mut manager = Manager::enable(fixed_config(), &mut scene).unwrap();
        manager
            .request_state(&mut scene, ControlState::Scramble)
            .unwrap();

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let report = manager.tick(&mut scene, dt).unwrap();
            assert_eq!(report.moved, 0);
            assert_eq!(report.state, ControlState::Scramble);
        }
        assert_eq!(scene.local_pose(a).unwrap().position, Vec3::X);
    }

    #[test]
    fn test_node_mut_unknown_id() {
        let mut scene = MemoryScene::new("root");
        let mut manager = Manager::enable(fixed_config(), &mut scene).unwrap();
        let missing = NodeId::from("missing");

        let err = manager.node_mut(&missing).unwrap_err();
        assert_eq!(
            err,
            ScrambleError::NotRegistered {
                node: missing.clone(),
                manager: manager.id(),
            }
        );
        assert!(
            manager
                .realign_node(&mut scene, &missing, MoveKind::Target)
                .is_err()
        );
    }

    #[test]
    fn test_degenerate_segment_completes_immediately() {
        let mut scene = MemoryScene::new("root");
        let root = scene.root();
        scene.spawn(root, "a", Pose::IDENTITY).unwrap();
        let mut manager = Manager::enable(fixed_config(), &mut scene).unwrap();

        manager
            .request_state(&mut scene, ControlState::Scramble)
            .unwrap();
        let report = manager.tick(&mut scene, 0.02).unwrap();

        assert_eq!(report.completed, 1);
        assert_eq!(report.transition, Some(ControlState::Stop));
    }

    #[test]
    fn test_set_config_validates() {
        let mut scene = MemoryScene::new("root");
        let mut manager = Manager::enable(fixed_config(), &mut scene).unwrap();

        assert!(
            manager
                .set_config(fixed_config().with_travel_time(0.0))
                .is_err()
        );
        manager
            .set_config(fixed_config().with_travel_time(2.0))
            .unwrap();
        assert_eq!(manager.travel_time(), 2.0);
    }
}
