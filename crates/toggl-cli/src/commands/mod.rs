//! CLI subcommand implementations.

pub mod end;
pub mod init;
pub mod projects;
pub mod start;
pub mod status;
pub mod util;
