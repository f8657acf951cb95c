//! Local message I/O.

pub mod cli;

pub use cli::CliChannel;
