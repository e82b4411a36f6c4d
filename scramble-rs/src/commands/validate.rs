//! Scene document validation

use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::document::SceneDocument;

pub fn execute(path: PathBuf) -> Result<()> {
    println!("Validating scene document: {}", path.display());
    let document = SceneDocument::load(&path)?;

    for note in document.notes() {
        println!("  note: {note}");
    }

    let problems = document.problems();
    if problems.is_empty() {
        println!("✓ Scene document is valid");
        return Ok(());
    }

    println!("✗ Found {} problem(s):", problems.len());
    for problem in &problems {
        println!("  - {problem}");
    }
    bail!("Scene document is invalid")
}
