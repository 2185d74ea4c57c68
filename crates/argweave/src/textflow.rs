//! Fixed-width text layout for help output.
//!
//! A [`Column`] wraps one string to a width, preferring to break at
//! whitespace or punctuation; [`Columns`] lays several of them side by side.

use std::fmt;
use std::ops::Add;

use crate::config::DEFAULT_CONSOLE_WIDTH;

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_breakable_before(c: char) -> bool {
    matches!(c, '[' | '(' | '{' | '<' | '|')
}

fn is_breakable_after(c: char) -> bool {
    matches!(
        c,
        ']' | ')' | '}' | '>' | '.' | ',' | ':' | ';' | '*' | '+' | '-' | '=' | '&' | '/' | '\\'
    )
}

/// A block of text wrapped to a fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    text: String,
    width: usize,
    indent: usize,
    initial_indent: Option<usize>,
}

impl Column {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: DEFAULT_CONSOLE_WIDTH,
            indent: 0,
            initial_indent: None,
        }
    }

    /// An empty column that only contributes padding.
    pub fn spacer(width: usize) -> Self {
        Self::new("").width(width)
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Indent for the very first line only; later lines use [`Column::indent`].
    pub fn initial_indent(mut self, indent: usize) -> Self {
        self.initial_indent = Some(indent);
        self
    }

    pub fn line_width(&self) -> usize {
        self.width
    }

    /// The wrapped lines, each including its indent.
    pub fn lines(&self) -> Vec<String> {
        let chars: Vec<char> = self.text.chars().collect();
        let mut lines = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            let indent = match self.initial_indent {
                Some(initial) if pos == 0 => initial,
                _ => self.indent,
            };
            // At least two columns so an unbreakable word still advances.
            let avail = self.width.saturating_sub(indent).max(2);
            let end = chars[pos..]
                .iter()
                .position(|&c| c == '\n')
                .map_or(chars.len(), |offset| pos + offset);

            let (len, suffix) = if end < pos + avail {
                (end - pos, false)
            } else {
                let is_boundary = |at: usize| {
                    at == chars.len()
                        || (is_whitespace(chars[at]) && !is_whitespace(chars[at - 1]))
                        || is_breakable_before(chars[at])
                        || is_breakable_after(chars[at - 1])
                };
                let mut len = avail;
                while len > 0 && !is_boundary(pos + len) {
                    len -= 1;
                }
                while len > 0 && is_whitespace(chars[pos + len - 1]) {
                    len -= 1;
                }
                if len > 0 { (len, false) } else { (avail - 1, true) }
            };

            let mut line = " ".repeat(indent);
            line.extend(&chars[pos..pos + len]);
            if suffix {
                line.push('-');
            }
            lines.push(line);

            pos += len;
            if chars.get(pos) == Some(&'\n') {
                pos += 1;
            } else {
                while chars.get(pos).is_some_and(|&c| is_whitespace(c)) {
                    pos += 1;
                }
            }
        }
        lines
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

impl Add for Column {
    type Output = Columns;

    fn add(self, other: Column) -> Columns {
        Columns::new(vec![self, other])
    }
}

/// Columns printed side by side, each padded to its own width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    columns: Vec<Column>,
}

impl Columns {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// One string per output row; a column that ran out of lines is
    /// replaced by blank padding, and trailing padding is never emitted.
    pub fn rows(&self) -> Vec<String> {
        let wrapped: Vec<Vec<String>> = self.columns.iter().map(Column::lines).collect();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(0);

        (0..height)
            .map(|idx| {
                let mut row = String::new();
                let mut padding = String::new();
                for (column, lines) in self.columns.iter().zip(&wrapped) {
                    match lines.get(idx) {
                        Some(line) => {
                            row.push_str(&padding);
                            row.push_str(line);
                            let used = line.chars().count();
                            padding = " ".repeat(column.width.saturating_sub(used));
                        }
                        None => padding.push_str(&" ".repeat(column.width)),
                    }
                }
                row
            })
            .collect()
    }
}

impl Add<Column> for Columns {
    type Output = Columns;

    fn add(mut self, column: Column) -> Columns {
        self.push(column);
        self
    }
}

impl fmt::Display for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rows().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_line() {
        assert_eq!(Column::new("hello").lines(), ["hello"]);
        assert!(Column::new("").lines().is_empty());
    }

    #[test]
    fn wraps_at_whitespace() {
        let column = Column::new("The quick brown fox jumps over the lazy dog").width(20);
        assert_eq!(column.lines(), ["The quick brown fox", "jumps over the lazy", "dog"]);
    }

    #[test]
    fn wraps_after_and_before_punctuation() {
        let path = Column::new("path/to/some/deeply/nested/file").width(12);
        assert_eq!(path.lines(), ["path/to/", "some/deeply/", "nested/file"]);

        let call = Column::new("call(foo) or [bar]").width(10);
        assert_eq!(call.lines(), ["call(foo)", "or [bar]"]);
    }

    #[test]
    fn unbreakable_words_are_hyphenated() {
        let column = Column::new("supercalifragilistic").width(8);
        assert_eq!(column.lines(), ["superca-", "lifragi-", "listic"]);
    }

    #[test]
    fn newlines_force_breaks() {
        assert_eq!(Column::new("one\n\ntwo").lines(), ["one", "", "two"]);
        assert_eq!(Column::new("\nfoo bar").lines(), ["", "foo bar"]);
    }

    #[test]
    fn indents_apply_per_line() {
        let column = Column::new("alpha beta gamma").width(12).indent(2).initial_indent(0);
        assert_eq!(column.lines(), ["alpha beta", "  gamma"]);
        assert_eq!(column.to_string(), "alpha beta\n  gamma");
    }

    #[test]
    fn columns_pad_and_fill_missing_lines() {
        let columns = Column::new("left").width(10)
            + Column::spacer(4)
            + Column::new("right side text wraps here").width(12);

        assert_eq!(
            columns.rows(),
            [
                "left          right side",
                "              text wraps",
                "              here",
            ]
        );
    }

    #[test]
    fn empty_trailing_column_adds_no_padding() {
        let columns = Column::new("-f").width(6).indent(2)
            + Column::spacer(4)
            + Column::new("").width(40);
        assert_eq!(columns.to_string(), "  -f");
    }
}
