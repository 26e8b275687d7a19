use codeprompt_blocks::{extract, BlockKind};
use pretty_assertions::assert_eq;

fn reply_with(bodies: &[&str], tags: &[&str]) -> String {
    let mut text = String::from("Intro paragraph.\n");
    for (i, body) in bodies.iter().enumerate() {
        let tag = tags[i % tags.len()];
        text.push_str(&format!("Step {i}:\n```{tag}\n{body}\n```\n\n"));
    }
    text.push_str("Let me know if that helps.");
    text
}

#[test]
fn n_fences_give_n_candidates_in_order() {
    let bodies = [
        "print('a')",
        "fn b() {\n    todo!()\n}",
        "  indented\n\n  with blank",
        "SELECT 1;",
        "<div>\n</div>",
    ];
    for n in 0..=bodies.len() {
        let text = reply_with(&bodies[..n], &["", "rust", "c++", "sh"]);
        let blocks = extract(&text);
        if n == 0 {
            // "Let me know" / "Intro" do not open code
            assert!(blocks.is_empty(), "{blocks:?}");
            continue;
        }
        let codes: Vec<&str> = blocks.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, bodies[..n].to_vec());
        assert!(blocks.iter().all(|b| b.kind == BlockKind::Fenced));
    }
}

#[test]
fn fallback_starts_at_first_keyword_line() {
    let text = "The fix:\n\nconst total = sum(items)\nconsole.log(total)\n\nreturn total\n* end of list\nok";
    let blocks = extract(text);
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].code,
        "const total = sum(items)\nconsole.log(total)\n\nreturn total"
    );
}

#[test]
fn fallback_runs_to_end_without_terminator() {
    let text = "class Point:\n    x: int\n\n    y: int";
    let blocks = extract(text);
    assert_eq!(blocks[0].code, text);
    assert_eq!(blocks[0].kind, BlockKind::Heuristic);
}
