use std::fmt::Display;

/// A point in the source text. `index` is a byte offset, `line` and `column`
/// are zero-based and `column` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub index: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(index: u32, line: u32, column: u32) -> Self {
        Self { index, line, column }
    }

    /// Steps over `ch`. A newline moves to the start of the next line.
    pub fn advance(&mut self, ch: char) -> &mut Self {
        self.index += ch.len_utf8() as u32;
        self.column += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        }

        self
    }

    /// The position one column further on the same line, used to give the
    /// end-of-input marker a visible width.
    pub fn next_column(&self) -> Self {
        Self {
            index: self.index + 1,
            line: self.line,
            column: self.column + 1,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrcSpan {
    pub start: Position,
    pub end: Position,
}

impl SrcSpan {
    pub fn from(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: SrcSpan) -> Self {
        Self {
            start: std::cmp::min(self.start, other.start),
            end: std::cmp::max(self.end, other.end),
        }
    }
}

impl Display for SrcSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
