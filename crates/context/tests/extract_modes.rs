use codeprompt_context::{ContextError, ContextExtractor, ContextMode, ExtensionTable, Language};
use codeprompt_editor::{MemoryBuffer, Position, ScriptedHost, Selection, SelectionKind};
use pretty_assertions::assert_eq;

fn host(text: &str) -> ScriptedHost {
    ScriptedHost::new(MemoryBuffer::from_text(text))
}

#[test]
fn line_range_every_boundary_combination() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let lines: Vec<String> = (1..=5).map(|n| format!("line {n}")).collect();
    let host = host(&lines.join("\n"));

    for start in 1..=5 {
        for end in start..=5 {
            let snippet = extractor.line_range(&host, start, end).unwrap();
            assert_eq!(snippet.text, lines[start - 1..end].join("\n"));
            assert_eq!((snippet.start_line, snippet.end_line), (start, end));
        }
    }
}

#[test]
fn line_range_rejects_bad_bounds() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let host = host("a\nb\nc");

    for (start, end) in [(0, 2), (3, 2), (0, 0), (4, 5)] {
        let err = extractor.line_range(&host, start, end).unwrap_err();
        assert!(
            matches!(err, ContextError::InvalidRange { .. }),
            "{start}-{end} gave {err:?}"
        );
        assert!(err.is_missing_context());
    }
}

#[test]
fn line_range_end_is_clamped() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let snippet = extractor.line_range(&host("a\nb\nc"), 2, 99).unwrap();
    assert_eq!(snippet.text, "b\nc");
    assert_eq!(snippet.mode, ContextMode::Range { start: 2, end: 3 });
}

#[test]
fn backwards_selection_reads_forwards() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let backwards = Selection {
        start: Position::new(3, 2),
        end: Position::new(1, 4),
        kind: SelectionKind::Charwise,
    };
    let buffer =
        MemoryBuffer::from_text("let a = 1;\nlet b = 2;\nlet c = 3;").with_selection(backwards);
    let snippet = extractor.selection(&ScriptedHost::new(buffer)).unwrap();
    assert_eq!(snippet.text, "a = 1;\nlet b = 2;\nlet");
    assert_eq!((snippet.start_line, snippet.end_line), (1, 3));
}

#[test]
fn charwise_selection_honours_columns() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let buffer = MemoryBuffer::from_text("let a = 1;\nlet b = 2;\nlet c = 3;").with_selection(
        Selection::new(Position::new(1, 4), Position::new(2, 4), SelectionKind::Charwise),
    );
    let snippet = extractor.selection(&ScriptedHost::new(buffer)).unwrap();
    assert_eq!(snippet.text, "a = 1;\nlet b");
}

#[test]
fn single_line_charwise_selection() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let buffer = MemoryBuffer::from_text("print(1)").with_selection(Selection::new(
        Position::new(1, 0),
        Position::new(1, 7),
        SelectionKind::Charwise,
    ));
    let snippet = extractor.selection(&ScriptedHost::new(buffer)).unwrap();
    assert_eq!(snippet.text, "print(1)");
}

#[test]
fn linewise_selection_takes_whole_lines() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let buffer = MemoryBuffer::from_text("a\nbb\nccc\nd").with_selection(Selection::lines(2, 3));
    let snippet = extractor.selection(&ScriptedHost::new(buffer)).unwrap();
    assert_eq!(snippet.text, "bb\nccc");
    assert_eq!((snippet.start_line, snippet.end_line), (2, 3));
}

#[test]
fn missing_selection_is_missing_context() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let err = extractor.selection(&host("abc")).unwrap_err();
    assert!(matches!(err, ContextError::NoSelection));
    assert!(err.is_missing_context());
}

#[test]
fn function_via_syntax_tree() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let buffer = MemoryBuffer::from_text("import os\n\ndef area(r):\n    pi = 3.14\n    return pi * r * r\n")
        .with_filetype("python")
        .with_cursor(Position::new(4, 6));
    let snippet = extractor
        .extract(&ScriptedHost::new(buffer), ContextMode::Function)
        .unwrap();
    assert_eq!(snippet.text, "def area(r):\n    pi = 3.14\n    return pi * r * r");
    assert_eq!(snippet.language, Language::Python);
    assert_eq!(snippet.extension, "py");
    assert_eq!((snippet.start_line, snippet.end_line), (3, 5));
}

#[test]
fn function_via_indentation_scan_for_lua() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let buffer = MemoryBuffer::from_text("local M = {}\n\nfunction M.hi()\n  print('hi')\nend\n\nreturn M")
        .with_path("/tmp/mod.lua")
        .with_cursor(Position::new(4, 2));
    let snippet = extractor
        .extract(&ScriptedHost::new(buffer), ContextMode::Function)
        .unwrap();
    assert_eq!(snippet.text, "function M.hi()\n  print('hi')\nend");
    assert_eq!(snippet.filetype, "lua");
    assert_eq!(snippet.extension, "lua");
}

#[test]
fn no_function_around_cursor() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    let buffer = MemoryBuffer::from_text("x = 1\ny = 2")
        .with_filetype("python")
        .with_cursor(Position::new(2, 0));
    let err = extractor
        .extract(&ScriptedHost::new(buffer), ContextMode::Function)
        .unwrap_err();
    assert!(matches!(err, ContextError::NoFunction { line: 2 }));
}

#[test]
fn entire_file_needs_a_path() {
    let table = ExtensionTable::default();
    let extractor = ContextExtractor::new(&table);
    assert!(matches!(
        extractor.entire_file(&host("a")).unwrap_err(),
        ContextError::NoPath
    ));

    let buffer = MemoryBuffer::from_text("fn a() {}\n").with_path("/src/lib.rs");
    let snippet = extractor.entire_file(&ScriptedHost::new(buffer)).unwrap();
    assert_eq!(snippet.text, "fn a() {}");
    assert_eq!(snippet.filetype, "rust");
    assert!(snippet.mode.is_whole_file());
}

#[test]
fn unknown_filetype_uses_default_extension() {
    let table = ExtensionTable::new("txt", Default::default());
    let extractor = ContextExtractor::new(&table);
    let snippet = extractor.line_range(&host("hello"), 1, 1).unwrap();
    assert_eq!(snippet.filetype, "text");
    assert_eq!(snippet.extension, "txt");
    assert_eq!(extractor.infer_extension("ruby"), "rb");
}
