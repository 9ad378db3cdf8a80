//! Rule application
//!
//! Runs rules over text one at a time, in list order. Each rule makes one
//! left-to-right pass over all of its non-overlapping matches before the next
//! rule sees the result. A rule whose replacement fails is logged and skipped
//! for that text; the remaining rules still run.

use log::warn;
use regex::Captures;
use std::borrow::Cow;

use super::rules::Rule;
use super::stats::FixStats;
use crate::error::RuleError;

// ─────────────────────────────────────────────────────────────────────────────
// Phase Drivers
// ─────────────────────────────────────────────────────────────────────────────

/// Apply prose-scoped rules to one rewritable span.
pub(crate) fn apply_prose_rules<'t>(
    text: &'t str,
    rules: &[&Rule],
    stats: &mut FixStats,
) -> Cow<'t, str> {
    let mut current = Cow::Borrowed(text);

    for rule in rules {
        match apply_rule(rule, &current, |_| true) {
            Ok(Some((rewritten, fixes))) => {
                stats.record(rule.name(), fixes);
                current = Cow::Owned(rewritten);
            }
            Ok(None) => {}
            Err(err) => warn_rule_failure(rule, &err),
        }
    }

    current
}

/// Apply fence-opening rules across the whole document.
///
/// Each match is a fence line. With no fence open the line is an opener and
/// may be rewritten. Inside a fence only a bare run of the opener's character,
/// at least as long, closes it; every other fence line is body text and is
/// left alone. Tracking restarts for every rule.
pub(crate) fn apply_fence_rules<'t>(
    text: &'t str,
    rules: &[&Rule],
    stats: &mut FixStats,
) -> Cow<'t, str> {
    let mut current = Cow::Borrowed(text);

    for rule in rules {
        let mut tracker = FenceTracker::default();
        let opener_only = |caps: &Captures<'_>| {
            caps.get(0)
                .is_some_and(|whole| tracker.is_opener(whole.as_str()))
        };

        match apply_rule(rule, &current, opener_only) {
            Ok(Some((rewritten, fixes))) => {
                stats.record(rule.name(), fixes);
                current = Cow::Owned(rewritten);
            }
            Ok(None) => {}
            Err(err) => warn_rule_failure(rule, &err),
        }
    }

    current
}

/// Open fence state while scanning fence lines in document order.
#[derive(Debug, Default)]
struct FenceTracker {
    /// Fence character and run length of the open fence
    open: Option<(char, usize)>,
}

impl FenceTracker {
    /// Feed one fence line; returns true if it opens a fence.
    fn is_opener(&mut self, line: &str) -> bool {
        let fence = line.trim_start_matches([' ', '\t']);
        let Some(ch) = fence.chars().next() else {
            return false;
        };
        let run = fence.len() - fence.trim_start_matches(ch).len();

        match self.open {
            None => {
                self.open = Some((ch, run));
                true
            }
            Some((open_ch, open_run)) => {
                if ch == open_ch && run >= open_run && fence[run..].trim().is_empty() {
                    self.open = None;
                }
                false
            }
        }
    }
}

fn warn_rule_failure(rule: &Rule, err: &RuleError) {
    warn!(
        "Rule '{}' failed and was skipped: {}",
        rule.name(),
        err.message()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Single Rule Pass
// ─────────────────────────────────────────────────────────────────────────────

/// Run one rule over `text`.
///
/// `accept` is consulted for every match in order; rejected matches are
/// copied through unchanged. Returns `Ok(None)` when nothing changed,
/// otherwise the rewritten text and the number of matches whose text actually
/// changed.
///
/// # Errors
///
/// Propagates the first failure from a function replacement. The partially
/// built output is discarded.
fn apply_rule<F>(
    rule: &Rule,
    text: &str,
    mut accept: F,
) -> Result<Option<(String, usize)>, RuleError>
where
    F: FnMut(&Captures<'_>) -> bool,
{
    let mut out: Option<String> = None;
    let mut last_end = 0;
    let mut fixes = 0;

    for caps in rule.pattern().captures_iter(text) {
        if !accept(&caps) {
            continue;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let replacement = rule.replacement().render(&caps)?;
        if replacement == whole.as_str() {
            continue;
        }

        let buf = out.get_or_insert_with(|| String::with_capacity(text.len() + 16));
        buf.push_str(&text[last_end..whole.start()]);
        buf.push_str(&replacement);
        last_end = whole.end();
        fixes += 1;
    }

    Ok(out.map(|mut buf| {
        buf.push_str(&text[last_end..]);
        (buf, fixes)
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
