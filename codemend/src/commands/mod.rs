// codemend/src/commands/mod.rs
//! Subcommand implementations.

pub mod rewrite;
pub mod rules;
