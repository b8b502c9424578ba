//! Toggl CLI library.
//!
//! This crate provides the command-line interface for starting and stopping
//! Toggl time entries against locally aliased projects.

mod cli;
pub mod commands;
mod config;
pub mod menu;
pub mod store;

pub use cli::{Cli, Commands};
pub use config::Config;
