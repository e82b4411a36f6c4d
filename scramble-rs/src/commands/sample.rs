//! Target pose sampling

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use glam::{EulerRot, Vec3};
use serde::Serialize;

use scramble_env::Manager;

use crate::document::SceneDocument;
use crate::utils::{OutputFormat, add_table_row, create_table, format_component, format_vec3};

#[derive(Args)]
pub struct SampleArgs {
    /// Path to the scene document (YAML or JSON)
    pub scene: PathBuf,

    /// Number of draws per node
    #[arg(short, long, default_value_t = 5)]
    pub count: usize,

    /// Override the random seed of the document
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct TargetSample {
    draw: usize,
    name: String,
    position: Vec3,
    rotation: Vec3,
    scale: f32,
    axis: Vec3,
}

pub fn execute(args: SampleArgs) -> Result<()> {
    let mut document = SceneDocument::load(&args.scene)?;
    if let Some(seed) = args.seed {
        document.config.seed = Some(seed);
    }

    let (mut scene, names) = document.build_scene()?;
    let mut manager =
        Manager::enable(document.config, &mut scene).context("Failed to enable manager")?;

    let mut samples = Vec::with_capacity(args.count * manager.len());
    for draw in 1..=args.count {
        manager.randomize_all_targets(&scene)?;

        for node in manager.nodes() {
            let (y, x, z) = node
                .target_world_rotation(&scene)?
                .normalize()
                .to_euler(EulerRot::YXZ);
            samples.push(TargetSample {
                draw,
                name: names.get(&node.object()).cloned().unwrap_or_default(),
                position: node.target_world_position(&scene)?,
                rotation: Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees()),
                scale: node.target().scale.x,
                axis: node.target_rotation_axis(),
            });
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&samples)?),
        OutputFormat::Table => {
            let mut table = create_table(&["Draw", "Node", "Position", "Rotation", "Scale"]);
            for sample in &samples {
                add_table_row(
                    &mut table,
                    vec![
                        sample.draw.to_string(),
                        sample.name.clone(),
                        format_vec3(sample.position),
                        format_vec3(sample.rotation),
                        format_component(sample.scale),
                    ],
                );
            }
            table.printstd();
        }
    }

    Ok(())
}
