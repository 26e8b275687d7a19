//! # Codeprompt Blocks
//!
//! Finds the code in an assistant reply.
//!
//! The scanner is language-agnostic and purely textual:
//!
//! 1. Every fenced region (` ``` ` + optional tag ... ` ``` `) is one
//!    candidate, in order of appearance. The marker lines are not part of
//!    the candidate.
//! 2. Only when there are no fences, a line-classifier looks for the first
//!    line opening with a statement keyword and keeps going while lines are
//!    blank or start with a word character.
//!
//! ```rust
//! use codeprompt_blocks::extract;
//!
//! let blocks = extract("Here:\n```go\nfunc f() {}\n```\nDone");
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].code, "func f() {}");
//! assert_eq!(blocks[0].language.as_deref(), Some("go"));
//! ```

use once_cell::sync::Lazy;
use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};

/// Opening fence with optional tag, lazily matched body, closing fence
static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([^\s`]*)[ \t]*\r?\n(.*?)(?:\r?\n)?```").expect("fence pattern is valid")
});

/// Statement-opening keywords that switch the fallback scan into code
static CODE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:function|def|class|fn|func|pub|public|private|protected|static|const|let|var|local|struct|enum|impl|trait|interface|type|import|from|package|module|async|export|if|for|while|return)\b",
    )
    .expect("keyword pattern is valid")
});

/// A line whose first non-blank character is a word character
static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\w").expect("word pattern is valid"));

/// How a block was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Inside a fenced region
    Fenced,
    /// Guessed by the line classifier
    Heuristic,
}

/// One candidate snippet from a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Tag on the opening fence, if any
    pub language: Option<String>,
    /// Text between the markers, without the marker lines
    pub code: String,
    pub kind: BlockKind,
}

impl CodeBlock {
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// Lazy iterator over the fenced regions of a reply
pub struct FencedBlocks<'t> {
    inner: CaptureMatches<'static, 't>,
}

impl Iterator for FencedBlocks<'_> {
    type Item = CodeBlock;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.inner.next()?;
        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string);
        let code = caps.get(2).map_or("", |m| m.as_str()).to_string();
        Some(CodeBlock {
            language,
            code,
            kind: BlockKind::Fenced,
        })
    }
}

/// Scan `text` for fenced regions without collecting them
pub fn fenced_blocks(text: &str) -> FencedBlocks<'_> {
    FencedBlocks {
        inner: FENCE.captures_iter(text),
    }
}

/// Line-classifier fallback for replies without fences.
///
/// Starts at the first line opening with a statement keyword; afterwards
/// blank lines and lines starting with a word character are kept, and the
/// first other line ends the block.
pub fn heuristic_block(text: &str) -> Option<CodeBlock> {
    let mut lines = text.lines().skip_while(|line| !CODE_START.is_match(line));
    let first = lines.next()?;

    let mut kept = vec![first];
    for line in lines {
        if line.trim().is_empty() || WORD_START.is_match(line) {
            kept.push(line);
        } else {
            break;
        }
    }

    Some(CodeBlock {
        language: None,
        code: kept.join("\n"),
        kind: BlockKind::Heuristic,
    })
}

/// Every candidate in `text`, in order of appearance.
///
/// Fenced regions when there are any; otherwise at most one heuristic
/// block; otherwise nothing.
pub fn extract(text: &str) -> Vec<CodeBlock> {
    let fenced: Vec<CodeBlock> = fenced_blocks(text).collect();
    if !fenced.is_empty() {
        log::debug!("found {} fenced code blocks", fenced.len());
        return fenced;
    }

    let fallback: Vec<CodeBlock> = heuristic_block(text).into_iter().collect();
    log::debug!(
        "no fenced code blocks; heuristic scan found {}",
        fallback.len()
    );
    fallback
}
