//! Scene documents
//!
//! A document describes the manager's configuration and the object tree it
//! animates. Rotations are Euler angles in degrees.
//!
//! ```yaml
//! config:
//!   random_zone: [10.0, 10.0, 10.0]
//!   travel_time: 5.0
//!   seed: 42
//! root:
//!   name: environment
//!   children:
//!     - name: crate
//!       position: [-2.0, 0.0, 0.0]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use scramble_env::{MemoryScene, NodeId, ObjectId, Pose, SceneAdapter, ScrambleConfig};

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// One object of the scene tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Node id persisted from an earlier session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Vec<ObjectSpec>,
}

impl ObjectSpec {
    fn pose(&self) -> Pose {
        Pose::from_euler_degrees(self.position, self.rotation, self.scale)
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ObjectSpec)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Configuration plus object tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub config: ScrambleConfig,
    pub root: ObjectSpec,
}

impl SceneDocument {
    /// Read a document, choosing the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene document: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => serde_yaml_ng::from_str(&text)
                .with_context(|| format!("Invalid YAML scene document: {}", path.display())),
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON scene document: {}", path.display())),
            _ => bail!(
                "Unsupported scene document extension (expected .yaml, .yml or .json): {}",
                path.display()
            ),
        }
    }

    /// Build the in-memory scene
    ///
    /// Returns the scene together with the name of every object.
    pub fn build_scene(&self) -> Result<(MemoryScene, HashMap<ObjectId, String>)> {
        let mut scene = MemoryScene::with_root_pose(self.root.name.clone(), self.root.pose());
        let mut names = HashMap::new();
        let root = scene.root();
        names.insert(root, self.root.name.clone());

        for child in &self.root.children {
            spawn_spec(&mut scene, &mut names, root, child)?;
        }
        Ok((scene, names))
    }

    /// Every problem found in the document; empty when it is usable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Err(err) = self.config.validate() {
            problems.push(err.to_string());
        }

        let mut objects = 0;
        self.root.walk(&mut |spec| {
            objects += 1;
            if spec.name.trim().is_empty() {
                problems.push("object with an empty name".to_string());
            }
            if !(spec.position.is_finite() && spec.rotation.is_finite() && spec.scale.is_finite()) {
                problems.push(format!("object '{}' has a non-finite transform", spec.name));
            }
            if spec.scale.min_element() <= 0.0 {
                problems.push(format!(
                    "object '{}' has a non-positive scale {}",
                    spec.name, spec.scale
                ));
            }
        });

        if objects == 1 {
            problems.push("scene has no objects below the root".to_string());
        }

        problems
    }

    /// Observations that do not make the document unusable
    ///
    /// Objects sharing a persisted node id are listed here: the manager gives
    /// every duplicate after the first a fresh id when it registers them.
    pub fn notes(&self) -> Vec<String> {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        self.root.walk(&mut |spec| {
            if let Some(id) = &spec.id {
                *ids.entry(id.as_str()).or_default() += 1;
            }
        });

        let mut duplicates: Vec<&str> = ids
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect();
        duplicates.sort_unstable();
        duplicates
            .into_iter()
            .map(|id| format!("node id '{id}' is shared and will be reassigned on load"))
            .collect()
    }
}

fn spawn_spec(
    scene: &mut MemoryScene,
    names: &mut HashMap<ObjectId, String>,
    parent: ObjectId,
    spec: &ObjectSpec,
) -> Result<()> {
    let object = scene.spawn(parent, spec.name.clone(), spec.pose())?;
    names.insert(object, spec.name.clone());

    if let Some(id) = &spec.id {
        scene.persist_id(object, &NodeId::from(id.as_str()))?;
    }

    for child in &spec.children {
        spawn_spec(scene, names, object, child)?;
    }
    Ok(())
}
