//! CLI subcommands.

pub mod keygen;
pub mod migrate;
