//! Line cursor over the text format
//!
//! Rows are whitespace-separated fields; text after `#` is a comment and
//! lines that are empty after stripping it are skipped. A line starting with
//! `#` directly after a count line declares the column order of its block.

use crate::constants::COMMENT_MARKER;

/// Cursor over the lines of a file's content
#[derive(Debug)]
pub struct LineReader<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineReader<'a> {
    /// Create a cursor at the first line
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().collect(),
            position: 0,
        }
    }

    /// 1-based number of the line consumed last
    pub fn line_number(&self) -> usize {
        self.position
    }

    /// Number of lines not consumed yet
    pub fn remaining_lines(&self) -> usize {
        self.lines.len().saturating_sub(self.position)
    }

    /// Next row with at least one field
    pub fn next_row(&mut self) -> Option<Vec<&'a str>> {
        while let Some(line) = self.lines.get(self.position) {
            self.position += 1;
            let fields = split_fields(line);
            if !fields.is_empty() {
                return Some(fields);
            }
        }
        None
    }

    /// Consume the very next line if it declares a column order
    ///
    /// The line must start with `#` in its first character.
    pub fn take_format_line(&mut self) -> Option<Vec<&'a str>> {
        let line = self.lines.get(self.position)?;
        let rest = line.strip_prefix(COMMENT_MARKER)?;
        self.position += 1;
        Some(split_fields(rest))
    }

    /// Skip blank lines, then consume a column-order line if one follows
    ///
    /// When no order line follows, the blank lines are left in place.
    pub fn take_format_line_after_blanks(&mut self) -> Option<Vec<&'a str>> {
        let next = self.lines[self.position.min(self.lines.len())..]
            .iter()
            .position(|line| !line.trim().is_empty())?;
        let rest = self.lines[self.position + next]
            .trim_start()
            .strip_prefix(COMMENT_MARKER)?;
        self.position += next + 1;
        Some(split_fields(rest))
    }
}

/// Whitespace-separated fields of a line with its comment removed
pub fn split_fields(line: &str) -> Vec<&str> {
    let content = match line.find(COMMENT_MARKER) {
        Some(index) => &line[..index],
        None => line,
    };
    content.split_whitespace().collect()
}
