//! MDX preflight preprocessing
//!
//! Repairs prose that a strict MDX parser would reject, without touching code.
//! `<` and `>` next to numbers ("<5 minutes", ">90% uptime") are read by MDX
//! as the start of JSX tags; these are escaped to `&lt;` / `&gt;`. Code fence
//! language tags the highlighter does not accept are rewritten too.
//!
//! # Phases
//! 1. Fence-opening rules run over the whole document. Language tags live on
//!    the fence line itself, which phase 2 would protect.
//! 2. The text is split into code and prose spans; prose rules run over each
//!    prose span in rule order and code spans are copied verbatim.
//!
//! # Example
//! ```ignore
//! use mdx_preflight::{preprocess, PreprocessOptions};
//!
//! let fixed = preprocess("- <5 minutes to complete", &PreprocessOptions::default());
//! assert_eq!(fixed, "- &lt;5 minutes to complete");
//! ```

mod engine;
pub mod language;
pub mod rules;
pub mod segment;
mod stats;

pub use language::{is_known_language, resolve_language, FALLBACK_LANGUAGE};
pub use rules::{
    default_rules, list_default_rules, select_rules, Replacement, ReplacementKind, Rule,
    RuleDescriptor, RuleScope,
};
pub use segment::{reassemble, segment, Span, SpanKind};
pub use stats::FixStats;

use log::{debug, info};
use std::fmt;
use std::sync::Arc;

use rules::builtin_rules;

/// Prefix used for debug log lines.
const LOG_PREFIX: &str = "[mdx-preflight]";

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Callback receiving the statistics of a call that fixed something.
pub type StatsCallback = Arc<dyn Fn(&FixStats) + Send + Sync>;

/// Per-call preprocessing options.
#[derive(Clone)]
pub struct PreprocessOptions {
    /// Replaces the built-in rule list when set
    pub rules: Option<Vec<Rule>>,
    /// When set, exactly these rules are active
    pub enable: Option<Vec<String>>,
    /// Rules removed from the active set (applied after `enable`)
    pub disable: Vec<String>,
    /// Keep fenced and inline code out of prose rewriting
    pub preserve_code_blocks: bool,
    /// Called once per call, only if at least one fix was made
    pub on_stats: Option<StatsCallback>,
    /// Log one line per rule that fired plus a total
    pub debug: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            rules: None,
            enable: None,
            disable: Vec::new(),
            preserve_code_blocks: true,
            on_stats: None,
            debug: false,
        }
    }
}

impl PreprocessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn enable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enable = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn disable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disable = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn preserve_code_blocks(mut self, preserve: bool) -> Self {
        self.preserve_code_blocks = preserve;
        self
    }

    pub fn on_stats<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FixStats) + Send + Sync + 'static,
    {
        self.on_stats = Some(Arc::new(callback));
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The rule list this call draws from.
    fn rule_list(&self) -> &[Rule] {
        self.rules.as_deref().unwrap_or_else(|| builtin_rules())
    }
}

impl fmt::Debug for PreprocessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessOptions")
            .field(
                "rules",
                &self
                    .rules
                    .as_ref()
                    .map(|rules| rules.iter().map(Rule::name).collect::<Vec<_>>()),
            )
            .field("enable", &self.enable)
            .field("disable", &self.disable)
            .field("preserve_code_blocks", &self.preserve_code_blocks)
            .field("on_stats", &self.on_stats.as_ref().map(|_| ".."))
            .field("debug", &self.debug)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Output of [`preprocess_with_stats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub text: String,
    pub stats: FixStats,
}

impl Preprocessed {
    pub fn changed(&self) -> bool {
        !self.stats.is_empty()
    }
}

/// Repair `text` for a strict MDX parser.
///
/// Text that no rule matches comes back byte-for-byte identical.
pub fn preprocess(text: &str, options: &PreprocessOptions) -> String {
    preprocess_with_stats(text, options).text
}

/// [`preprocess`] with the built-in rules and default options.
pub fn preprocess_default(text: &str) -> String {
    preprocess(text, &PreprocessOptions::default())
}

/// Like [`preprocess`], also returning the fix statistics.
///
/// `on_stats` is still invoked when set.
pub fn preprocess_with_stats(text: &str, options: &PreprocessOptions) -> Preprocessed {
    let active = select_rules(
        options.rule_list(),
        options.enable.as_deref(),
        &options.disable,
    );
    let (fence_rules, prose_rules): (Vec<&Rule>, Vec<&Rule>) = active
        .into_iter()
        .partition(|rule| rule.scope() == RuleScope::FenceOpening);

    let mut stats = FixStats::new();

    // Phase 1: whole document, before code regions are protected.
    let normalized = engine::apply_fence_rules(text, &fence_rules, &mut stats);

    // Phase 2: prose spans only.
    let output = if prose_rules.is_empty() {
        normalized.into_owned()
    } else if options.preserve_code_blocks {
        let spans = segment(&normalized);
        debug!(
            "Segmented {} bytes into {} spans ({} protected)",
            normalized.len(),
            spans.len(),
            spans.iter().filter(|s| s.is_protected()).count()
        );

        let mut out = String::with_capacity(normalized.len());
        for span in &spans {
            match span.kind {
                SpanKind::Protected => out.push_str(span.content),
                SpanKind::Rewritable => {
                    out.push_str(&engine::apply_prose_rules(
                        span.content,
                        &prose_rules,
                        &mut stats,
                    ));
                }
            }
        }
        out
    } else {
        engine::apply_prose_rules(&normalized, &prose_rules, &mut stats).into_owned()
    };

    if options.debug {
        log_stats(&stats);
    }

    if !stats.is_empty() {
        if let Some(callback) = &options.on_stats {
            callback(&stats);
        }
    }

    Preprocessed {
        text: output,
        stats,
    }
}

fn log_stats(stats: &FixStats) {
    for line in stats_log_lines(stats) {
        info!("{}", line);
    }
}

/// One line per rule that fired plus a total; nothing when no rule fired.
fn stats_log_lines(stats: &FixStats) -> Vec<String> {
    if stats.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = stats
        .by_rule
        .iter()
        .map(|(rule, count)| format!("{} {}: {} fix(es)", LOG_PREFIX, rule, count))
        .collect();
    lines.push(format!("{} total: {} fix(es)", LOG_PREFIX, stats.total_fixes));
    lines
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
