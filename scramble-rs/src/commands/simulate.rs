//! Tick-by-tick simulation of a scene document

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use glam::Vec3;
use log::{info, warn};
use serde::Serialize;

use scramble_env::{ControlState, Manager, MemoryScene, ObjectId};

use crate::document::SceneDocument;
use crate::utils::{OutputFormat, add_table_row, create_table, format_vec3};

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to the scene document (YAML or JSON)
    pub scene: PathBuf,

    /// Maximum number of ticks per motion phase
    #[arg(long, default_value_t = 10_000)]
    pub ticks: usize,

    /// Fixed tick duration in seconds
    #[arg(long, default_value_t = 0.02)]
    pub tick_duration: f32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Revert back to the rest poses after the scramble finishes
    #[arg(long)]
    pub revert: bool,

    /// Override the random seed of the document
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only record every Nth tick (transitions are always recorded)
    #[arg(long, default_value_t = 1)]
    pub every: usize,
}

#[derive(Debug, Serialize)]
struct NodeFrame {
    name: String,
    id: String,
    position: Vec3,
}

#[derive(Debug, Serialize)]
struct Frame {
    tick: usize,
    time: f32,
    state: ControlState,
    nodes: Vec<NodeFrame>,
}

struct Recorder<'a> {
    names: &'a HashMap<ObjectId, String>,
    tick_duration: f32,
    every: usize,
    tick: usize,
    frames: Vec<Frame>,
}

impl Recorder<'_> {
    fn record(&mut self, manager: &Manager, scene: &MemoryScene) -> Result<()> {
        let mut nodes = Vec::with_capacity(manager.len());
        for node in manager.nodes() {
            nodes.push(NodeFrame {
                name: self
                    .names
                    .get(&node.object())
                    .cloned()
                    .unwrap_or_else(|| node.object().to_string()),
                id: node.id().to_string(),
                position: scene.world_position(node.object())?,
            });
        }

        self.frames.push(Frame {
            tick: self.tick,
            time: self.tick as f32 * self.tick_duration,
            state: manager.state(),
            nodes,
        });
        Ok(())
    }

    /// Tick until the manager leaves `phase` or `limit` ticks have passed
    fn run_phase(
        &mut self,
        manager: &mut Manager,
        scene: &mut MemoryScene,
        phase: ControlState,
        limit: usize,
    ) -> Result<bool> {
        for _ in 0..limit {
            let report = manager
                .tick(scene, self.tick_duration)
                .with_context(|| format!("Tick {} failed", self.tick + 1))?;
            self.tick += 1;

            if report.transition.is_some() || self.tick % self.every == 0 {
                self.record(manager, scene)?;
            }
            if manager.state() != phase {
                info!("{phase} finished after tick {}", self.tick);
                return Ok(true);
            }
        }

        warn!("{phase} did not finish within {limit} ticks");
        Ok(false)
    }
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    if !(args.tick_duration.is_finite() && args.tick_duration > 0.0) {
        bail!("Tick duration must be positive, got {}", args.tick_duration);
    }
    if args.every == 0 {
        bail!("--every must be at least 1");
    }

    let mut document = SceneDocument::load(&args.scene)?;
    if let Some(seed) = args.seed {
        document.config.seed = Some(seed);
    }

    let (mut scene, names) = document.build_scene()?;
    let mut manager =
        Manager::enable(document.config, &mut scene).context("Failed to enable manager")?;

    let mut recorder = Recorder {
        names: &names,
        tick_duration: args.tick_duration,
        every: args.every,
        tick: 0,
        frames: Vec::new(),
    };
    recorder.record(&manager, &scene)?;

    manager.request_state(&mut scene, ControlState::Scramble)?;
    let mut finished = recorder.run_phase(&mut manager, &mut scene, ControlState::Scramble, args.ticks)?;

    if args.revert && finished {
        manager.request_state(&mut scene, ControlState::Revert)?;
        finished = recorder.run_phase(&mut manager, &mut scene, ControlState::Revert, args.ticks)?;
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recorder.frames)?);
        }
        OutputFormat::Table => {
            print_table(&recorder.frames);
            println!();
            println!(
                "Final state: {} after {} ticks ({:.2}s)",
                manager.state(),
                recorder.tick,
                recorder.tick as f32 * args.tick_duration
            );
        }
    }

    if !finished {
        bail!(
            "Simulation stopped in {} after reaching the tick limit ({})",
            manager.state(),
            args.ticks
        );
    }
    Ok(())
}

fn print_table(frames: &[Frame]) {
    let mut table = create_table(&["Tick", "Time", "State", "Node", "Position"]);
    for frame in frames {
        for node in &frame.nodes {
            add_table_row(
                &mut table,
                vec![
                    frame.tick.to_string(),
                    format!("{:.2}", frame.time),
                    frame.state.to_string(),
                    node.name.clone(),
                    format_vec3(node.position),
                ],
            );
        }
    }
    table.printstd();
}
