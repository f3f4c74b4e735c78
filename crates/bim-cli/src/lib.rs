//! CLI library components for bim-sync.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
