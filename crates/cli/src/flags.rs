use clap::ValueEnum;
use codeprompt_editor::{Key, Position, Selection, SelectionKind};

/// `--context` values of `ask`, in the order the picker lists them
#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum ContextFlag {
    Selection,
    Function,
    File,
    Range,
}

impl ContextFlag {
    /// Index into the "Analyze:" picker
    pub(crate) const fn choice(self) -> usize {
        match self {
            ContextFlag::Selection => 0,
            ContextFlag::Function => 1,
            ContextFlag::File => 2,
            ContextFlag::Range => 3,
        }
    }
}

/// `--accept` values: answer the preview panel up front
#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum AcceptFlag {
    Cursor,
    End,
    NewFile,
    Cancel,
}

impl AcceptFlag {
    pub(crate) const fn key(self) -> Key {
        match self {
            AcceptFlag::Cursor => Key::Char('i'),
            AcceptFlag::End => Key::Char('a'),
            AcceptFlag::NewFile => Key::Char('n'),
            AcceptFlag::Cancel => Key::Char('q'),
        }
    }
}

/// `LINE[:COL]`, both 1-based
pub(crate) fn parse_position(text: &str) -> Result<Position, String> {
    let (line, col) = match text.split_once(':') {
        Some((line, col)) => (line, Some(col)),
        None => (text, None),
    };
    let line = parse_one_based(line, "line")?;
    let col = match col {
        Some(col) => parse_one_based(col, "column")? - 1,
        None => 0,
    };
    Ok(Position::new(line, col))
}

/// `START[:COL]-END[:COL]`; line-wise unless a column is given
pub(crate) fn parse_selection(text: &str) -> Result<Selection, String> {
    let (start, end) = text
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got `{text}`"))?;
    let kind = if start.contains(':') || end.contains(':') {
        SelectionKind::Charwise
    } else {
        SelectionKind::Linewise
    };
    Ok(Selection::new(parse_position(start)?, parse_position(end)?, kind))
}

/// `START-END` line numbers, kept as typed
pub(crate) fn parse_line_range(text: &str) -> Result<(String, String), String> {
    let (start, end) = text
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got `{text}`"))?;
    Ok((start.trim().to_string(), end.trim().to_string()))
}

fn parse_one_based(text: &str, what: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(0) => Err(format!("{what} numbers start at 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid {what} `{text}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn positions() {
        assert_eq!(parse_position("12"), Ok(Position::new(12, 0)));
        assert_eq!(parse_position("3:5"), Ok(Position::new(3, 4)));
        assert!(parse_position("0").is_err());
        assert!(parse_position("2:0").is_err());
        assert!(parse_position("x").is_err());
    }

    #[test]
    fn selections() {
        assert_eq!(parse_selection("4-2"), Ok(Selection::lines(2, 4)));
        assert_eq!(
            parse_selection("1:3-1:7"),
            Ok(Selection::new(
                Position::new(1, 2),
                Position::new(1, 6),
                SelectionKind::Charwise
            ))
        );
        assert!(parse_selection("5").is_err());
    }

    #[test]
    fn line_ranges_are_left_for_the_flow_to_check() {
        assert_eq!(
            parse_line_range("2-x"),
            Ok(("2".to_string(), "x".to_string()))
        );
    }
}
