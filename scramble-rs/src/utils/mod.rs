//! Shared utilities for the scramble-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
