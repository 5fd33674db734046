//! CLI command implementations for the local-server binary.

pub mod install_cmd;
pub mod start;
