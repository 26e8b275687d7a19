//! Line-scanning fallback for finding the function around a cursor when no
//! syntax tree is available.
//!
//! This is a best-effort heuristic. Tabs and spaces each count as one column
//! of indentation, so files mixing both can be over- or under-captured.

use once_cell::sync::Lazy;
use regex::Regex;

/// A definition keyword at the start of a statement, after any modifiers
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?:(?:pub(?:\([^)]*\))?|async|export|default|local|static|public|private|protected|internal|final|abstract|override|unsafe|const|extern(?:\s+"[^"]*")?)\s+)*(?:fn|def|function|func|class|sub|procedure)\b"#,
    )
    .expect("header pattern is valid")
});

/// A line that closes the block it dedents out of
static CLOSER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[}\])]|end\b)").expect("closer pattern is valid"));

/// 1-indexed inclusive line span of the function around `cursor_line`.
///
/// Scans upward from the cursor for a definition header, then downward
/// while lines stay indented at least as deep as the body. The first line
/// that dedents ends the function; it is kept only when it is a closing
/// token such as `}` or `end`.
pub(crate) fn enclosing_function(lines: &[String], cursor_line: usize) -> Option<(usize, usize)> {
    if lines.is_empty() {
        return None;
    }
    let cursor_idx = cursor_line.saturating_sub(1).min(lines.len() - 1);
    let header = (0..=cursor_idx).rev().find(|&idx| HEADER.is_match(&lines[idx]))?;
    let header_indent = indent_width(&lines[header]);

    let body_indent = lines[header + 1..]
        .iter()
        .find(|line| !is_blank(line))
        .map(|line| indent_width(line))
        .filter(|indent| *indent > header_indent)
        .unwrap_or(header_indent + 1);

    let mut end = header;
    for (idx, line) in lines.iter().enumerate().skip(header + 1) {
        if is_blank(line) {
            continue;
        }
        if indent_width(line) < body_indent {
            if CLOSER.is_match(line.trim_start()) {
                end = idx;
            }
            break;
        }
        end = idx;
    }

    log::debug!(
        "indent scan: header line {}, body indent {}, end line {}",
        header + 1,
        body_indent,
        end + 1
    );
    Some((header + 1, end + 1))
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
