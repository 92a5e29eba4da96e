//! CLI command implementations.

pub mod kernel;
pub mod patch;
pub mod render;
