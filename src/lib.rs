//! mdx-preflight
//!
//! Repairs Markdown/MDX documents before they reach a strict MDX parser.
//! Prose such as "<5 minutes" or ">90% uptime" is escaped so the parser does
//! not read it as a JSX tag, and code fence language tags the highlighter
//! would reject are normalized. Code is never touched.
//!
//! # Example
//! ```ignore
//! use mdx_preflight::{preprocess_with_stats, PreprocessOptions};
//!
//! let result = preprocess_with_stats("- >90% completion rate", &PreprocessOptions::default());
//! assert_eq!(result.text, "- &gt;90% completion rate");
//! assert_eq!(result.stats.total_fixes, 1);
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod preprocess;

pub use error::{Error, Result, RuleError};
pub use preprocess::{
    default_rules, list_default_rules, preprocess, preprocess_default, preprocess_with_stats,
    FixStats, Preprocessed, PreprocessOptions, Rule, RuleDescriptor, RuleScope,
};
