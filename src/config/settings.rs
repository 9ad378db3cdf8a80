//! User settings for mdx-preflight
//!
//! This module defines the `Settings` struct that holds the defaults the
//! command-line front end uses, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

use crate::preprocess::PreprocessOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// File extensions processed when a directory is given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// Directory or file names skipped while walking directories.
pub const DEFAULT_IGNORED: &[&str] = &["node_modules", ".git", "target"];

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted preprocessing defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When set, only these rules run
    pub enable: Option<Vec<String>>,

    /// Rules that never run
    pub disable: Vec<String>,

    /// Keep code fences and inline code out of prose rewriting
    pub preserve_code_blocks: bool,

    /// Log per-rule fix counts
    pub debug: bool,

    /// Extensions (without dot) processed when walking directories
    pub extensions: Vec<String>,

    /// Names skipped when walking directories (exact name or `*suffix`)
    pub ignored: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable: None,
            disable: Vec::new(),
            preserve_code_blocks: true,
            debug: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Normalize values that may have been hand-edited.
    ///
    /// - Rule names are trimmed; empty and repeated names are dropped.
    /// - Extensions are lowercased and stripped of a leading dot. An empty
    ///   extension list falls back to the defaults.
    /// - Empty ignore patterns are dropped.
    pub fn sanitize(&mut self) {
        if let Some(enable) = self.enable.as_mut() {
            clean_names(enable);
        }
        clean_names(&mut self.disable);

        for ext in &mut self.extensions {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
        clean_names(&mut self.extensions);
        if self.extensions.is_empty() {
            self.extensions = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        }

        clean_names(&mut self.ignored);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Build preprocessing options from these settings.
    pub fn to_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            enable: self.enable.clone(),
            disable: self.disable.clone(),
            preserve_code_blocks: self.preserve_code_blocks,
            debug: self.debug,
            ..PreprocessOptions::default()
        }
    }

    /// Whether `ext` (any case, with or without dot) is a processed extension.
    pub fn handles_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

/// Trim entries, then drop empty and duplicate ones keeping first occurrence.
fn clean_names(names: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names.drain(..) {
        let name = name.trim().to_string();
        if !name.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }
    *names = seen;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.enable.is_none());
        assert!(settings.disable.is_empty());
        assert!(settings.preserve_code_blocks);
        assert!(!settings.debug);
        assert_eq!(settings.extensions, vec!["md", "mdx", "markdown"]);
        assert!(settings.ignored.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_settings_roundtrip() {
        let settings = Settings {
            enable: Some(vec!["less-than-digit".to_string()]),
            disable: vec!["greater-than-digit".to_string()],
            preserve_code_blocks: false,
            debug: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(settings.debug);
        assert!(settings.preserve_code_blocks);
        assert_eq!(settings.extensions.len(), 3);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let result: Result<Settings, _> =
            serde_json::from_str(r#"{"disable": ["x"], "future_option": 1}"#);
        assert_eq!(result.unwrap().disable, vec!["x"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sanitization tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_sanitize_extensions() {
        let mut settings = Settings {
            extensions: vec![".MDX".to_string(), "md".to_string(), " mdx ".to_string()],
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.extensions, vec!["mdx", "md"]);
    }

    #[test]
    fn test_sanitize_empty_extensions_restores_defaults() {
        let mut settings = Settings {
            extensions: vec!["".to_string(), ".".to_string()],
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.extensions, vec!["md", "mdx", "markdown"]);
    }

    #[test]
    fn test_sanitize_rule_names() {
        let mut settings = Settings {
            enable: Some(vec![
                " less-than-digit ".to_string(),
                "".to_string(),
                "less-than-digit".to_string(),
            ]),
            disable: vec!["  ".to_string()],
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.enable, Some(vec!["less-than-digit".to_string()]));
        assert!(settings.disable.is_empty());
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"extensions": []}"#).unwrap();
        assert_eq!(settings.extensions.len(), 3);
    }

    #[test]
    fn test_to_options() {
        let settings = Settings {
            disable: vec!["less-than-digit".to_string()],
            preserve_code_blocks: false,
            ..Settings::default()
        };
        let options = settings.to_options();
        assert_eq!(options.disable, vec!["less-than-digit"]);
        assert!(!options.preserve_code_blocks);
        assert!(options.enable.is_none());
        assert!(options.rules.is_none());
    }

    #[test]
    fn test_handles_extension() {
        let settings = Settings::default();
        assert!(settings.handles_extension("MDX"));
        assert!(settings.handles_extension(".md"));
        assert!(!settings.handles_extension("txt"));
    }
}
