//! termtutor CLI Library Crate
//!
//! Configuration, command parsing, terminal rendering and the interactive
//! shell. The `termtutor` binary is a thin wrapper around this library.

pub mod command;
pub mod config;
pub mod render;
pub mod shell;
