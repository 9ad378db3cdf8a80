//! Code fence language tag normalization
//!
//! Decides what language tag an opening code fence should carry so that the
//! downstream syntax highlighter does not reject it. Only empty tags and a
//! short list of known-bad tags are rewritten; anything else the highlighter
//! might still understand is left alone.

use regex::Captures;

use crate::error::RuleError;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Tag written onto fences that have no language.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Language identifiers the highlighter is known to accept.
pub const KNOWN_LANGUAGES: &[&str] = &[
    // Plain
    "text",
    "plaintext",
    "txt",
    // Markup / docs
    "markdown",
    "md",
    "mdx",
    "html",
    "xml",
    "svg",
    "latex",
    "tex",
    "rst",
    // Web
    "javascript",
    "js",
    "jsx",
    "typescript",
    "ts",
    "tsx",
    "css",
    "scss",
    "sass",
    "less",
    "vue",
    "svelte",
    "graphql",
    "gql",
    // Data / config
    "json",
    "jsonc",
    "json5",
    "yaml",
    "yml",
    "toml",
    "ini",
    "csv",
    "env",
    "dotenv",
    "properties",
    "proto",
    "protobuf",
    "hcl",
    "terraform",
    "nginx",
    "dockerfile",
    "docker",
    "makefile",
    "make",
    // Shell
    "bash",
    "sh",
    "shell",
    "zsh",
    "fish",
    "console",
    "powershell",
    "ps1",
    "bat",
    "cmd",
    // Systems / general purpose
    "rust",
    "rs",
    "c",
    "cpp",
    "c++",
    "h",
    "csharp",
    "cs",
    "fsharp",
    "go",
    "golang",
    "zig",
    "java",
    "kotlin",
    "kt",
    "scala",
    "swift",
    "objectivec",
    "dart",
    "python",
    "py",
    "ruby",
    "rb",
    "php",
    "perl",
    "lua",
    "r",
    "julia",
    "haskell",
    "hs",
    "elixir",
    "erlang",
    "clojure",
    "ocaml",
    "nix",
    "sql",
    "wasm",
    // Tooling
    "diff",
    "patch",
    "git",
    "http",
    "log",
    "regex",
    "mermaid",
];

/// Tags the highlighter chokes on, with the tag to use instead.
pub const LANGUAGE_REWRITES: &[(&str, &str)] = &[
    ("argdown", "markdown"),
    ("n/a", FALLBACK_LANGUAGE),
    ("none", FALLBACK_LANGUAGE),
    ("null", FALLBACK_LANGUAGE),
    ("undefined", FALLBACK_LANGUAGE),
    ("plain", FALLBACK_LANGUAGE),
];

// ─────────────────────────────────────────────────────────────────────────────
// Tag Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// True if `tag` is on the known-language list (case-insensitive, trimmed).
pub fn is_known_language(tag: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    KNOWN_LANGUAGES.contains(&tag.as_str())
}

/// Resolve the tag an opening fence should carry.
///
/// Returns `Some(replacement)` when the tag must change:
/// 1. known languages are kept,
/// 2. empty or whitespace-only tags become [`FALLBACK_LANGUAGE`],
/// 3. tags in [`LANGUAGE_REWRITES`] become their mapped tag,
/// 4. anything else is passed through.
pub fn resolve_language(tag: &str) -> Option<&'static str> {
    let normalized = tag.trim().to_lowercase();

    if KNOWN_LANGUAGES.contains(&normalized.as_str()) {
        return None;
    }
    if normalized.is_empty() {
        return Some(FALLBACK_LANGUAGE);
    }
    LANGUAGE_REWRITES
        .iter()
        .find(|(bad, _)| *bad == normalized)
        .map(|(_, replacement)| *replacement)
}

/// Replacement function for the fence-opening rule.
///
/// Expects the named groups of the built-in fence pattern. Indent, fence
/// characters and line ending are kept as-is.
pub(crate) fn rewrite_fence_opening(caps: &Captures<'_>) -> Result<String, RuleError> {
    let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());
    let (fence, tag) = match caps.name("ticks") {
        Some(ticks) => (ticks.as_str(), group("tick_tag")),
        None => (group("tildes"), group("tilde_tag")),
    };

    match resolve_language(tag) {
        Some(language) => Ok(format!(
            "{}{}{}{}",
            group("indent"),
            fence,
            language,
            group("eol")
        )),
        None => Ok(caps.get(0).map_or("", |m| m.as_str()).to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::rules::FENCE_LINE_PATTERN;
    use regex::Regex;

    fn rewrite_line(line: &str) -> String {
        let re = Regex::new(FENCE_LINE_PATTERN).unwrap();
        let caps = re.captures(line).unwrap();
        rewrite_fence_opening(&caps).unwrap()
    }

    #[test]
    fn test_known_languages_are_kept() {
        assert_eq!(resolve_language("rust"), None);
        assert_eq!(resolve_language("TypeScript"), None);
        assert_eq!(resolve_language("  json  "), None);
        assert_eq!(resolve_language("text"), None);
        assert_eq!(resolve_language("plaintext"), None);
    }

    #[test]
    fn test_empty_tag_uses_fallback() {
        assert_eq!(resolve_language(""), Some(FALLBACK_LANGUAGE));
        assert_eq!(resolve_language("   "), Some(FALLBACK_LANGUAGE));
    }

    #[test]
    fn test_known_bad_tags_are_mapped() {
        assert_eq!(resolve_language("argdown"), Some("markdown"));
        assert_eq!(resolve_language("ArgDown"), Some("markdown"));
        assert_eq!(resolve_language("N/A"), Some("text"));
        assert_eq!(resolve_language("none"), Some("text"));
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        assert_eq!(resolve_language("cobol-85"), None);
        assert_eq!(resolve_language("rust title=main.rs"), None);
    }

    #[test]
    fn test_is_known_language() {
        assert!(is_known_language("Python"));
        assert!(!is_known_language("argdown"));
    }

    #[test]
    fn test_rewrite_keeps_indent_fence_and_line_ending() {
        assert_eq!(rewrite_line("  ````argdown\r\n"), "  ````markdown\r\n");
        assert_eq!(rewrite_line("\t```\n"), "\t```text\n");
        assert_eq!(rewrite_line("```rust\n"), "```rust\n");
    }

    #[test]
    fn test_rewrite_tilde_fence() {
        assert_eq!(rewrite_line("~~~\n"), "~~~text\n");
        assert_eq!(rewrite_line("~~~~ n/a\n"), "~~~~text\n");
        assert_eq!(rewrite_line("~~~ `odd`\n"), "~~~ `odd`\n");
    }

    #[test]
    fn test_fallback_is_stable() {
        // A rewritten tag must not be rewritten again on a second pass.
        assert!(is_known_language(FALLBACK_LANGUAGE));
        for (_, replacement) in LANGUAGE_REWRITES {
            assert!(is_known_language(replacement));
        }
    }
}
