use crate::error::{ContextError, Result};
use crate::language::Language;
use codeprompt_editor::Position;
use tree_sitter::{Node, Parser, Point};

/// Node kinds containing any of these may be a function boundary
const FUNCTION_KIND_MARKERS: &[&str] = &["function", "method", "definition"];

/// Suffixes of declaration-level kinds. Signature fragments such as
/// `function_modifiers` or `function_type` carry none of them.
const DECLARATION_SUFFIXES: &[&str] = &[
    "_item",
    "_definition",
    "_declaration",
    "_expression",
    "_signature",
];

/// Whole-node kinds that match no suffix
const BARE_FUNCTION_KINDS: &[&str] = &["function", "arrow_function", "method"];

/// Byte and line span of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeSpan {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-indexed
    pub start_line: usize,
    /// 1-indexed, inclusive
    pub end_line: usize,
    pub kind: &'static str,
}

/// Tree-sitter lookup of the function enclosing a cursor
pub(crate) struct AstLocator {
    parser: Parser,
    language: Language,
}

impl AstLocator {
    /// Create a locator for a language with a wired grammar
    pub fn new(language: Language) -> Result<Self> {
        if !language.supports_ast() {
            return Err(ContextError::unsupported_language(language.as_str()));
        }

        let ts_language = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| ContextError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser, language })
    }

    /// Parse `content` and walk upward from the node under `cursor` to the
    /// nearest function-like ancestor.
    ///
    /// `Ok(None)` means the tree was built but the cursor is not inside a
    /// function.
    pub fn enclosing_function(&mut self, content: &str, cursor: Position) -> Result<Option<NodeSpan>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| ContextError::tree_sitter("Failed to parse source code"))?;

        let root = tree.root_node();
        let point = Point::new(cursor.line.saturating_sub(1), cursor.col);
        let Some(start) = root.descendant_for_point_range(point, point) else {
            return Ok(None);
        };

        let found = Self::walk_up(start);
        if let Some(span) = &found {
            log::debug!(
                "{} cursor {}:{} is inside {} (lines {}-{})",
                self.language.as_str(),
                cursor.line,
                cursor.col,
                span.kind,
                span.start_line,
                span.end_line
            );
        }
        Ok(found)
    }

    fn walk_up(start: Node) -> Option<NodeSpan> {
        let mut node = Some(start);
        while let Some(current) = node {
            if is_function_kind(current.kind()) {
                return Some(NodeSpan {
                    start_byte: current.start_byte(),
                    end_byte: current.end_byte(),
                    start_line: current.start_position().row + 1,
                    end_line: current.end_position().row + 1,
                    kind: current.kind(),
                });
            }
            node = current.parent();
        }
        None
    }
}

fn is_function_kind(kind: &str) -> bool {
    if BARE_FUNCTION_KINDS.contains(&kind) {
        return true;
    }
    FUNCTION_KIND_MARKERS.iter().any(|marker| kind.contains(marker))
        && DECLARATION_SUFFIXES.iter().any(|suffix| kind.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(language: Language, code: &str, line: usize, col: usize) -> Option<String> {
        let mut locator = AstLocator::new(language).unwrap();
        locator
            .enclosing_function(code, Position::new(line, col))
            .unwrap()
            .map(|span| code[span.start_byte..span.end_byte].to_string())
    }

    #[test]
    fn finds_rust_function() {
        let code = "use std::fmt;\n\nfn main() {\n    let x = 1;\n    println!(\"{x}\");\n}\n";
        let text = locate(Language::Rust, code, 4, 8).unwrap();
        assert!(text.starts_with("fn main()"));
        assert!(text.ends_with('}'));
    }

    #[test]
    fn finds_python_method_not_class() {
        let code = "class A:\n    def go(self):\n        return 1\n";
        let text = locate(Language::Python, code, 3, 10).unwrap();
        assert_eq!(text, "def go(self):\n        return 1");
    }

    #[test]
    fn span_starts_at_node_column() {
        let code = "const x = 1; function f() {\n  return 2;\n}\n";
        let text = locate(Language::JavaScript, code, 2, 4).unwrap();
        assert_eq!(text, "function f() {\n  return 2;\n}");
    }

    #[test]
    fn signature_fragments_resolve_to_the_whole_function() {
        let code = "pub async fn run(f: fn(u8) -> u8) {\n    go();\n}\n";
        let whole = "pub async fn run(f: fn(u8) -> u8) {\n    go();\n}";
        // on `async`
        assert_eq!(locate(Language::Rust, code, 1, 5).as_deref(), Some(whole));
        // on the `fn` of the parameter type
        assert_eq!(locate(Language::Rust, code, 1, 21).as_deref(), Some(whole));
    }

    #[test]
    fn arrow_function_in_typescript() {
        let code = "const add = (a: number, b: number): number => {\n  return a + b;\n};\n";
        let text = locate(Language::TypeScript, code, 2, 4).unwrap();
        assert!(text.starts_with("(a: number"), "{text}");
        assert!(text.ends_with('}'), "{text}");
    }

    #[test]
    fn outside_any_function_is_none() {
        let code = "use std::fmt;\n\nfn main() {}\n";
        assert_eq!(locate(Language::Rust, code, 1, 2), None);
    }

    #[test]
    fn test_unsupported_language() {
        assert!(AstLocator::new(Language::Go).is_err());
    }

    #[test]
    fn kind_markers() {
        assert!(is_function_kind("function_item"));
        assert!(is_function_kind("method_definition"));
        assert!(is_function_kind("class_definition"));
        assert!(is_function_kind("function_declaration"));
        assert!(is_function_kind("function_signature_item"));
        assert!(is_function_kind("arrow_function"));
        assert!(!is_function_kind("call_expression"));
        assert!(!is_function_kind("function_modifiers"));
        assert!(!is_function_kind("function_type"));
    }
}
