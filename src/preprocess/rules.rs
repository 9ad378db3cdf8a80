//! Rewrite rule definitions
//!
//! A [`Rule`] pairs a compiled pattern with a replacement. Rules are plain
//! immutable values: the built-in table is compiled once and every call
//! selects its own active subset with [`select_rules`].
//!
//! # Built-in rules (in application order)
//!
//! | Name | Scope | Rewrite |
//! |------|-------|---------|
//! | `normalize-code-block-language` | fence opening | unknown/empty fence tags |
//! | `less-than-digit` | prose | `<5` → `&lt;5` |
//! | `less-than-space-digit` | prose | `< 5` → `&lt; 5` |
//! | `greater-than-digit` | prose | `>90` → `&gt;90` |
//! | `invalid-tag-names` | prose | `</5x>` → `&lt;/5x>` |

use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, LazyLock};

use super::language;
use crate::error::{Error, Result, RuleError};

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Rule Names
// ─────────────────────────────────────────────────────────────────────────────

pub const NORMALIZE_CODE_BLOCK_LANGUAGE: &str = "normalize-code-block-language";
pub const LESS_THAN_DIGIT: &str = "less-than-digit";
pub const LESS_THAN_SPACE_DIGIT: &str = "less-than-space-digit";
pub const GREATER_THAN_DIGIT: &str = "greater-than-digit";
pub const INVALID_TAG_NAMES: &str = "invalid-tag-names";

/// Opening or closing fence line: indent, backtick or tilde run, tag, line
/// ending. A backtick fence's tag cannot contain backticks.
pub(crate) const FENCE_LINE_PATTERN: &str =
    r"(?m)^(?P<indent>[ \t]*)(?:(?P<ticks>`{3,})(?P<tick_tag>[^`\r\n]*)|(?P<tildes>~{3,})(?P<tilde_tag>[^\r\n]*))(?P<eol>\r?\n)";

const LESS_THAN_DIGIT_PATTERN: &str = r"<([0-9])";

const LESS_THAN_SPACE_DIGIT_PATTERN: &str = r"<( +[0-9])";

// The character before `>` is captured and re-emitted instead of using a
// look-behind. Every match ends in a digit, which is itself excluded by the
// guard, so consuming the context character never hides a later match.
const GREATER_THAN_DIGIT_PATTERN: &str = r"(^|[^A-Za-z0-9_\-])>( ?[0-9])";

const INVALID_TAG_NAMES_PATTERN: &str = r"<(/?[0-9][^>\s]*)";

// ─────────────────────────────────────────────────────────────────────────────
// Replacement
// ─────────────────────────────────────────────────────────────────────────────

/// Signature of a custom replacement function.
pub type ReplaceFn =
    dyn Fn(&Captures<'_>) -> std::result::Result<String, RuleError> + Send + Sync;

/// How a rule rewrites each match.
#[derive(Clone)]
pub enum Replacement {
    /// Fixed text with `$1` / `${name}` capture expansion
    Template(String),
    /// Computed from the match; an `Err` makes the engine skip the rule
    Function(Arc<ReplaceFn>),
}

impl Replacement {
    pub fn kind(&self) -> ReplacementKind {
        match self {
            Replacement::Template(_) => ReplacementKind::Template,
            Replacement::Function(_) => ReplacementKind::Function,
        }
    }

    /// Produce the replacement text for one match.
    pub(crate) fn render(&self, caps: &Captures<'_>) -> std::result::Result<String, RuleError> {
        match self {
            Replacement::Template(template) => {
                let mut out = String::new();
                caps.expand(template, &mut out);
                Ok(out)
            }
            Replacement::Function(f) => f(caps),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Replacement::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Replacement kind, exposed for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementKind {
    Template,
    Function,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule Scope
// ─────────────────────────────────────────────────────────────────────────────

/// Which phase of preprocessing a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleScope {
    /// Applied to every rewritable (non-code) span
    #[default]
    Prose,
    /// Applied once over the whole document, to fence-opening matches only.
    /// A match opens a fence when none is open; while one is open, only a
    /// bare run of the same character at least as long closes it and every
    /// other match is left alone.
    FenceOpening,
}

impl RuleScope {
    pub fn label(&self) -> &'static str {
        match self {
            RuleScope::Prose => "prose",
            RuleScope::FenceOpening => "fence-opening",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule
// ─────────────────────────────────────────────────────────────────────────────

/// A named pattern + replacement pair.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    pattern: Regex,
    replacement: Replacement,
    scope: RuleScope,
    default_enabled: bool,
}

impl Rule {
    /// Build a rule, compiling `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if the pattern is not a valid regex.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        replacement: Replacement,
    ) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            rule: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            description: description.into(),
            pattern,
            replacement,
            scope: RuleScope::Prose,
            default_enabled: true,
        })
    }

    /// Build a prose rule with a template replacement.
    pub fn template(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        template: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            name,
            description,
            pattern,
            Replacement::Template(template.into()),
        )
    }

    /// Build a prose rule with a function replacement.
    pub fn function<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        f: F,
    ) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> std::result::Result<String, RuleError> + Send + Sync + 'static,
    {
        Self::new(name, description, pattern, Replacement::Function(Arc::new(f)))
    }

    pub fn with_scope(mut self, scope: RuleScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_default_enabled(mut self, enabled: bool) -> Self {
        self.default_enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    pub fn default_enabled(&self) -> bool {
        self.default_enabled
    }

    /// Serializable summary of this rule.
    pub fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            pattern: self.pattern.as_str().to_string(),
            replacement_kind: self.replacement.kind(),
            scope: self.scope,
            default_enabled: self.default_enabled,
        }
    }

    fn builtin(
        name: &str,
        description: &str,
        pattern: &str,
        replacement: Replacement,
        scope: RuleScope,
    ) -> Self {
        Self::new(name, description, pattern, replacement)
            .expect("built-in rule patterns are valid")
            .with_scope(scope)
    }
}

/// Introspection record returned by [`list_default_rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    pub name: String,
    pub description: String,
    pub pattern: String,
    pub replacement_kind: ReplacementKind,
    pub scope: RuleScope,
    pub default_enabled: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Rule Table
// ─────────────────────────────────────────────────────────────────────────────

static DEFAULT_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::builtin(
            NORMALIZE_CODE_BLOCK_LANGUAGE,
            "Rewrite empty or known-bad code fence language tags to ones the highlighter accepts",
            FENCE_LINE_PATTERN,
            Replacement::Function(Arc::new(language::rewrite_fence_opening)),
            RuleScope::FenceOpening,
        ),
        Rule::builtin(
            LESS_THAN_DIGIT,
            "Escape `<` directly before a digit (e.g. <5 minutes)",
            LESS_THAN_DIGIT_PATTERN,
            Replacement::Template("&lt;${1}".to_string()),
            RuleScope::Prose,
        ),
        Rule::builtin(
            LESS_THAN_SPACE_DIGIT,
            "Escape `<` followed by spaces and a digit (e.g. < 5 minutes)",
            LESS_THAN_SPACE_DIGIT_PATTERN,
            Replacement::Template("&lt;${1}".to_string()),
            RuleScope::Prose,
        ),
        Rule::builtin(
            GREATER_THAN_DIGIT,
            "Escape `>` before an optional space and a digit unless it follows a word character or hyphen (e.g. >90%)",
            GREATER_THAN_DIGIT_PATTERN,
            Replacement::Template("${1}&gt;${2}".to_string()),
            RuleScope::Prose,
        ),
        Rule::builtin(
            INVALID_TAG_NAMES,
            "Escape the `<` of tag-like sequences whose name starts with a digit (e.g. <3rd>, </5>)",
            INVALID_TAG_NAMES_PATTERN,
            Replacement::Template("&lt;${1}".to_string()),
            RuleScope::Prose,
        ),
    ]
});

/// The built-in rules, compiled once for the process.
pub(crate) fn builtin_rules() -> &'static [Rule] {
    &DEFAULT_RULES
}

/// A copy of the built-in rules in application order, for custom composition.
pub fn default_rules() -> Vec<Rule> {
    DEFAULT_RULES.clone()
}

/// Describe the built-in rules in application order.
pub fn list_default_rules() -> Vec<RuleDescriptor> {
    DEFAULT_RULES.iter().map(Rule::descriptor).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Pick the active rules for one call.
///
/// - With `enable`, exactly the named rules are active, regardless of
///   `default_enabled`; otherwise every `default_enabled` rule is.
/// - `disable` then removes names from that set.
/// - Unknown names are ignored. The result keeps the order of `rules`.
pub fn select_rules<'r>(
    rules: &'r [Rule],
    enable: Option<&[String]>,
    disable: &[String],
) -> Vec<&'r Rule> {
    let named = |list: &[String], name: &str| list.iter().any(|n| n == name);

    rules
        .iter()
        .filter(|rule| match enable {
            Some(list) => named(list, rule.name()),
            None => rule.default_enabled(),
        })
        .filter(|rule| !named(disable, rule.name()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
