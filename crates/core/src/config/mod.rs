//! Configuration loading and schema definitions
//!
//! TOML configuration for the verifier and the command-line tool.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
