//! watchrun CLI library
//!
//! Argument parsing, config file loading, shell command execution and the
//! watch session loop. `main.rs` wires these together.

pub mod args;
pub mod exec;
pub mod session;
pub mod settings;
