//! Configuration module for mdx-preflight
//!
//! This module handles the command-line defaults, including
//! serialization/deserialization to/from JSON and persistent storage
//! in platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
