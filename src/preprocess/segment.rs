//! Code region segmentation
//!
//! Splits text into protected spans (fenced code blocks and inline code) and
//! rewritable spans (everything else). Spans borrow from the input, and
//! concatenating them in order always gives back the input exactly.
//!
//! # Rules
//! - A line-initial run of three or more backticks or tildes (after optional
//!   spaces or tabs) opens a fenced block. It ends at the first later line
//!   that holds only a run of the same character at least as long, optionally
//!   indented and followed by whitespace. A backtick opener whose info string
//!   contains a backtick is not a fence.
//! - Any other backtick run opens an inline span that ends at the next run of
//!   the same length on the same line.
//! - A run with no closing delimiter is ordinary text; it never protects the
//!   rest of the document.

// ─────────────────────────────────────────────────────────────────────────────
// Span Types
// ─────────────────────────────────────────────────────────────────────────────

/// Whether rules may touch a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Code: passed through verbatim
    Protected,
    /// Prose: rules apply
    Rewritable,
}

/// A contiguous slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub content: &'a str,
}

impl<'a> Span<'a> {
    pub fn protected(content: &'a str) -> Self {
        Self {
            kind: SpanKind::Protected,
            content,
        }
    }

    pub fn rewritable(content: &'a str) -> Self {
        Self {
            kind: SpanKind::Rewritable,
            content,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.kind == SpanKind::Protected
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Segmentation
// ─────────────────────────────────────────────────────────────────────────────

/// Split `text` into alternating rewritable and protected spans.
///
/// Empty spans are never produced, so empty input gives an empty list.
pub fn segment(text: &str) -> Vec<Span<'_>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut prose_start = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(['`', '~']) {
        let start = pos + offset;
        let fence = bytes[start];
        let run = fence_run(bytes, start, fence);
        let after_run = start + run;

        let end = if is_fence_opener(bytes, start, run) {
            find_fence_close(bytes, after_run, fence, run)
        } else if fence == b'`' {
            find_inline_close(bytes, after_run, run)
        } else {
            None
        };

        match end {
            Some(end) => {
                if prose_start < start {
                    spans.push(Span::rewritable(&text[prose_start..start]));
                }
                spans.push(Span::protected(&text[start..end]));
                prose_start = end;
                pos = end;
            }
            None => pos = after_run,
        }
    }

    if prose_start < text.len() {
        spans.push(Span::rewritable(&text[prose_start..]));
    }

    spans
}

/// Concatenate spans back into a single string.
pub fn reassemble(spans: &[Span<'_>]) -> String {
    let len = spans.iter().map(|s| s.content.len()).sum();
    let mut out = String::with_capacity(len);
    for span in spans {
        out.push_str(span.content);
    }
    out
}

/// Length of the run of `fence` bytes starting at `start`.
fn fence_run(bytes: &[u8], start: usize, fence: u8) -> usize {
    bytes[start..].iter().take_while(|&&b| b == fence).count()
}

fn is_indent(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Rest of the line starting at `from`, without the line break.
fn rest_of_line(bytes: &[u8], from: usize) -> &[u8] {
    let rest = &bytes[from..];
    let len = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    &rest[..len]
}

/// Whether the run of `run` fence characters at `start` opens a fenced block.
fn is_fence_opener(bytes: &[u8], start: usize, run: usize) -> bool {
    if run < 3 {
        return false;
    }
    let line_initial = bytes[..start]
        .iter()
        .rev()
        .take_while(|&&b| b != b'\n')
        .all(|&b| is_indent(b));
    if !line_initial {
        return false;
    }
    bytes[start] != b'`' || !rest_of_line(bytes, start + run).contains(&b'`')
}

/// End offset of the closing fence for a block opened by `min_len` `fence`
/// characters, searching the lines after `from`.
fn find_fence_close(bytes: &[u8], from: usize, fence: u8, min_len: usize) -> Option<usize> {
    let mut line_start = next_line_start(bytes, from)?;
    loop {
        if let Some(end) = closing_fence_end(bytes, line_start, fence, min_len) {
            return Some(end);
        }
        line_start = next_line_start(bytes, line_start)?;
    }
}

fn next_line_start(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| from + i + 1)
}

/// End offset of the fence run if the line at `line_start` is a closing fence.
fn closing_fence_end(bytes: &[u8], line_start: usize, fence: u8, min_len: usize) -> Option<usize> {
    let indent = bytes[line_start..]
        .iter()
        .take_while(|&&b| is_indent(b))
        .count();
    let start = line_start + indent;
    let run = fence_run(bytes, start, fence);
    if run < min_len {
        return None;
    }
    let end = start + run;
    rest_of_line(bytes, end)
        .iter()
        .all(|&b| is_indent(b) || b == b'\r')
        .then_some(end)
}

/// End offset of the next run of exactly `len` backticks before a line break.
fn find_inline_close(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => return None,
            b'`' => {
                let run = fence_run(bytes, i, b'`');
                if run == len {
                    return Some(i + run);
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
