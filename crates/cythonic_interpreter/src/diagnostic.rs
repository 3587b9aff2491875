//! Syntax errors reported while interpreting

use cythonic_tokens::token::{Token, TokenKind};
use cythonic_tokens::Position;
use std::fmt::{Display, Formatter};

/// Where a diagnostic was raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// At a token, named by its raw text
    Token(String),
    /// At the end of the token stream
    End,
    /// At a token the lexer could not make sense of
    Invalid,
}

/// A syntax error with the position it occurred at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    position: Position,
    location: Location,
}

impl Diagnostic {
    /// Creates a diagnostic pointing at the given token
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        let location = match token.kind() {
            TokenKind::Eof => Location::End,
            TokenKind::Invalid => Location::Invalid,
            _ => Location::Token(token.raw().to_string()),
        };
        Self {
            message: message.into(),
            position: token.position(),
            location,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn line(&self) -> usize {
        self.position.line()
    }

    pub fn column(&self) -> usize {
        self.position.column()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}:{}] Error", self.line(), self.column())?;
        match &self.location {
            Location::Token(raw) => write!(f, " at '{raw}'")?,
            Location::End => write!(f, " at end")?,
            Location::Invalid => {}
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_display() {
        let token = Token::new(TokenKind::Identifier, "x", "X", Position::new(4, 2));
        assert_eq!(
            Diagnostic::at(&token, "Expect ';' after assignment.").to_string(),
            "[line 4:2] Error at 'X': Expect ';' after assignment."
        );

        let eof = Token::eof(Position::new(9, 1));
        assert_eq!(
            Diagnostic::at(&eof, "Expect '}' after block.").to_string(),
            "[line 9:1] Error at end: Expect '}' after block."
        );

        let invalid = Token::new(TokenKind::Invalid, "@", "@", Position::new(1, 3));
        let diagnostic = Diagnostic::at(&invalid, "Expect expression.");
        assert_eq!(diagnostic.location(), &Location::Invalid);
        assert_eq!(diagnostic.to_string(), "[line 1:3] Error: Expect expression.");
    }
}
