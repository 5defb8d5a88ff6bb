//! Subcommand implementations.

pub mod check;
pub mod components;
pub mod init;
pub mod output;
