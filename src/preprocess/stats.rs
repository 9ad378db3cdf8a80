//! Fix statistics for a single preprocessing call
//!
//! A fresh [`FixStats`] is created per call, filled in while rules run and
//! handed back once at the end. Nothing accumulates across calls.

use serde::Serialize;
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// FixStats
// ─────────────────────────────────────────────────────────────────────────────

/// Number of replacements made, in total and per rule name.
///
/// # Example
///
/// ```ignore
/// let mut stats = FixStats::new();
/// stats.record("less-than-digit", 2);
/// assert_eq!(stats.total_fixes, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixStats {
    /// Sum of all replacements across every rule
    pub total_fixes: usize,
    /// Replacements keyed by rule name
    #[serde(rename = "byRuleName")]
    pub by_rule: BTreeMap<String, usize>,
}

impl FixStats {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` fixes for `rule`. A zero count leaves the record untouched
    /// so rules that never fired do not show up in `by_rule`.
    pub fn record(&mut self, rule: &str, count: usize) {
        if count == 0 {
            return;
        }
        self.total_fixes += count;
        *self.by_rule.entry(rule.to_string()).or_insert(0) += count;
    }

    /// Fold another record into this one.
    pub fn merge(&mut self, other: &FixStats) {
        for (rule, count) in &other.by_rule {
            self.record(rule, *count);
        }
    }

    /// Fixes recorded for `rule`, or zero.
    pub fn count_for(&self, rule: &str) -> usize {
        self.by_rule.get(rule).copied().unwrap_or(0)
    }

    /// True when no rule fired.
    pub fn is_empty(&self) -> bool {
        self.total_fixes == 0
    }

    /// Format the statistics for a one-line summary.
    ///
    /// Returns a compact string like "3 fixes (less-than-digit: 2, greater-than-digit: 1)"
    pub fn format_compact(&self) -> String {
        if self.by_rule.is_empty() {
            return "0 fixes".to_string();
        }
        let parts: Vec<String> = self
            .by_rule
            .iter()
            .map(|(rule, count)| format!("{}: {}", rule, count))
            .collect();
        let noun = if self.total_fixes == 1 { "fix" } else { "fixes" };
        format!("{} {} ({})", self.total_fixes, noun, parts.join(", "))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_empty() {
        let stats = FixStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.total_fixes, 0);
        assert!(stats.by_rule.is_empty());
    }

    #[test]
    fn test_record_accumulates_per_rule() {
        let mut stats = FixStats::new();
        stats.record("less-than-digit", 2);
        stats.record("greater-than-digit", 1);
        stats.record("less-than-digit", 3);

        assert_eq!(stats.total_fixes, 6);
        assert_eq!(stats.count_for("less-than-digit"), 5);
        assert_eq!(stats.count_for("greater-than-digit"), 1);
        assert_eq!(stats.count_for("invalid-tag-names"), 0);
    }

    #[test]
    fn test_record_zero_is_ignored() {
        let mut stats = FixStats::new();
        stats.record("less-than-digit", 0);
        assert!(stats.is_empty());
        assert!(!stats.by_rule.contains_key("less-than-digit"));
    }

    #[test]
    fn test_merge() {
        let mut a = FixStats::new();
        a.record("less-than-digit", 1);
        let mut b = FixStats::new();
        b.record("less-than-digit", 2);
        b.record("normalize-code-block-language", 1);

        a.merge(&b);
        assert_eq!(a.total_fixes, 4);
        assert_eq!(a.count_for("less-than-digit"), 3);
        assert_eq!(a.count_for("normalize-code-block-language"), 1);
    }

    #[test]
    fn test_format_compact() {
        let mut stats = FixStats::new();
        assert_eq!(stats.format_compact(), "0 fixes");

        stats.record("less-than-digit", 1);
        assert_eq!(stats.format_compact(), "1 fix (less-than-digit: 1)");

        stats.record("greater-than-digit", 2);
        assert_eq!(
            stats.format_compact(),
            "3 fixes (greater-than-digit: 2, less-than-digit: 1)"
        );
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let mut stats = FixStats::new();
        stats.record("less-than-digit", 1);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"totalFixes":1,"byRuleName":{"less-than-digit":1}}"#);
    }
}
