use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TuckError;

/// A 1-based (line, column) location. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position immediately to the right of this one on the same line.
    pub const fn next_column(self) -> Self {
        Self {
            line: self.line,
            column: self.column + 1,
        }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl FromStr for Position {
    type Err = TuckError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || TuckError::InvalidRequest {
            message: format!("Position '{value}' must be formatted as LINE:COLUMN"),
        };

        let (line, column) = value.trim().split_once(':').ok_or_else(invalid)?;
        let line = line.parse::<usize>().map_err(|_| invalid())?;
        let column = column.parse::<usize>().map_err(|_| invalid())?;

        if line == 0 || column == 0 {
            return Err(TuckError::InvalidRequest {
                message: format!("Position '{value}' is 1-based; line and column must be >= 1"),
            });
        }

        Ok(Self { line, column })
    }
}

/// Inclusive range of positions: `end` is the last character covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
