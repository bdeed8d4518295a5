//! Compute module - Pattern network evaluation and evolution.

mod activation;
mod colour;
mod network;

pub mod evolution;

pub use activation::*;
pub use colour::*;
pub use network::*;
