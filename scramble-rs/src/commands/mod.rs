//! Command implementations

pub mod sample;
pub mod simulate;
pub mod validate;
