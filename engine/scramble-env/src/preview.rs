//! Scrub slider over the scramble motion
//!
//! Lets an inspection tool drag every node along its start → target segment
//! without running the state machine. Each call feeds the difference between
//! the previous and the new slider value into the regular move path.
//! Whenever the manager resets node progress (a realign or a new rest pose)
//! the slider is treated as back at 0.

use log::debug;

use crate::adapter::SceneAdapter;
use crate::error::Result;
use crate::manager::Manager;

/// Slider state for previewing the scramble segment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrubPreview {
    previous: f32,
    epoch: u64,
}

impl ScrubPreview {
    /// Slider at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied slider value
    pub fn value(&self) -> f32 {
        self.previous
    }

    /// Move the slider to `value`, clamped to `[0, 1]`
    ///
    /// Does nothing while the manager is in a motion state. Returns whether
    /// the nodes were moved.
    pub fn scrub_to<S: SceneAdapter + ?Sized>(
        &mut self,
        manager: &mut Manager,
        scene: &mut S,
        value: f32,
    ) -> Result<bool> {
        if manager.state().is_busy() || !value.is_finite() {
            return Ok(false);
        }

        if self.epoch != manager.epoch() {
            self.previous = 0.0;
            self.epoch = manager.epoch();
        }

        let value = value.clamp(0.0, 1.0);
        let delta = value - self.previous;
        self.previous = value;

        manager.scrub_nodes(scene, delta)?;
        debug!("{} scrubbed to {value:.3}", manager.id());
        Ok(true)
    }

    /// Return the slider to 0 without moving anything
    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}
