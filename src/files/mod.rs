//! File operations module for mdx-preflight
//!
//! This module finds the markdown files to process under the paths given on
//! the command line and rewrites them in place.

mod discovery;
mod rewrite;

pub use discovery::collect_files;
pub use rewrite::{process_file, FileOutcome};
