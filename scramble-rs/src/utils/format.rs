//! Formatting utilities

use clap::ValueEnum;
use glam::Vec3;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Format a vector with fixed precision
pub fn format_vec3(value: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", value.x, value.y, value.z)
}

/// Format a single component with fixed precision
pub fn format_component(value: f32) -> String {
    format!("{value:.3}")
}
