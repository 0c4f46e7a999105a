//! CLI subcommand implementations.

pub mod session;
