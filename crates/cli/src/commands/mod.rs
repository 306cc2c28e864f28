//! Subcommand implementations.

pub mod cart;
pub mod catalog;
pub mod shell;
