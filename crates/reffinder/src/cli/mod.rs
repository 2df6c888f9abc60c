//! CLI command implementations.

mod display;

pub mod cycles;
pub mod index;
pub mod stats;
pub mod tree;
