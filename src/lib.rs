//! Haul library
//!
//! Core functionality for the Haul development server.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod console;
pub mod messages;
pub mod server;
pub mod utils;

pub use cli::Cli;
pub use compiler::Compiler;
pub use config::ResolvedConfig;
