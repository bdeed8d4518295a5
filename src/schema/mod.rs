//! Schema module - Configuration types for pattern breeding.

mod config;

pub use config::*;
