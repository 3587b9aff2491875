//! Tokens of the cythonic language, along with the keyword classifier and the symbol table
//! format used to dump and reload token lists.

use std::fmt::{Display, Formatter};

pub mod keyword;
pub mod symbol_table;
pub mod token;

/// A 1-based line and column pointing at a character in some source text
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    line: usize,
    column: usize,
}

impl Position {
    /// The position of the first character of any source
    pub const START: Position = Position { line: 1, column: 1 };

    /// Creates a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The line of this position
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column of this position
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An error with a location
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct PositionedError<E> {
    error: E,
    position: Position,
}

impl<E> PositionedError<E> {
    pub fn new(error: E, position: Position) -> Self {
        Self { error, position }
    }

    /// The error kind
    pub fn kind(&self) -> &E {
        &self.error
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

impl<E: Display> Display for PositionedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.position)
    }
}
