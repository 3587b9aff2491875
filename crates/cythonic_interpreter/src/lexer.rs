//! Responsible for converting source text into a token list

use crate::lexer::cursor::Cursor;
use cythonic_tokens::keyword::KeywordTrie;
use cythonic_tokens::token::{Token, TokenKind};
use cythonic_tokens::{Position, PositionedError};
use thiserror::Error;
use tracing::{debug, trace};

mod cursor;
mod literal;

/// The maximum number of characters kept in an identifier's normalized text
pub const MAX_IDENTIFIER_LENGTH: usize = 31;

/// What the lexer does when it encounters malformed input
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LexMode {
    /// The first error is returned and lexing stops
    #[default]
    Fatal,
    /// Each error is recorded and replaced by an [`Invalid`](TokenKind::Invalid) token
    Recovering,
}

/// Converts source text into tokens, one at a time.
///
/// The last token produced is always an end of stream token positioned at the end of the source.
#[derive(Debug)]
pub struct Lexer<'s> {
    cursor: Cursor<'s>,
    mode: LexMode,
    errors: Vec<LexError>,
    start: usize,
    start_position: Position,
    finished: bool,
}

impl<'s> Lexer<'s> {
    /// Creates a new lexer that stops at the first error
    pub fn new(source: &'s str) -> Self {
        Self::with_mode(source, LexMode::Fatal)
    }

    /// Creates a new lexer that keeps going after errors
    pub fn recovering(source: &'s str) -> Self {
        Self::with_mode(source, LexMode::Recovering)
    }

    pub fn with_mode(source: &'s str, mode: LexMode) -> Self {
        Self {
            cursor: Cursor::new(source),
            mode,
            errors: vec![],
            start: 0,
            start_position: Position::START,
            finished: false,
        }
    }

    /// Errors recorded while in [`LexMode::Recovering`]
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    fn next_token(&mut self) -> LexResult<Token> {
        self.cursor.eat_while(char::is_whitespace);
        self.start = self.cursor.index();
        self.start_position = self.cursor.position();

        let Some(c) = self.cursor.peek() else {
            return Ok(Token::eof(self.start_position));
        };

        match (c, self.cursor.peek_nth(1)) {
            ('/', Some('/')) => Ok(self.line_comment()),
            ('/', Some('*')) => self.block_comment(),
            (c, _) if c.is_ascii_alphabetic() || c == '_' => Ok(self.word()),
            (c, _) if c.is_ascii_digit() => self.number(),
            ('.', Some(next)) if next.is_ascii_digit() => self.number(),
            ('\'', _) => {
                self.cursor.bump();
                let value = literal::character(&mut self.cursor).map_err(|e| self.error(e))?;
                Ok(self.token(TokenKind::CharLiteral, value.to_string()))
            }
            ('"', _) => {
                self.cursor.bump();
                let value = literal::string(&mut self.cursor).map_err(|e| self.error(e))?;
                Ok(self.token(TokenKind::StringLiteral, value))
            }
            _ => self.punctuation(),
        }
    }

    fn token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(
            kind,
            lexeme,
            self.cursor.slice_from(self.start),
            self.start_position,
        )
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.start_position)
    }

    fn line_comment(&mut self) -> Token {
        self.cursor.bump();
        self.cursor.bump();
        self.cursor.eat_while(|c| !cursor::is_newline(c));
        let raw = self.cursor.slice_from(self.start);
        self.token(TokenKind::Comment, &raw[2..])
    }

    fn block_comment(&mut self) -> LexResult<Token> {
        self.cursor.bump();
        self.cursor.bump();
        let mut depth = 1_usize;
        while depth > 0 {
            match (self.cursor.bump(), self.cursor.peek()) {
                (None, _) => return Err(self.error(LexErrorKind::UnterminatedComment)),
                (Some('/'), Some('*')) => {
                    self.cursor.bump();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.cursor.bump();
                    depth -= 1;
                }
                _ => {}
            }
        }
        let raw = self.cursor.slice_from(self.start);
        Ok(self.token(TokenKind::Comment, &raw[2..raw.len() - 2]))
    }

    /// Scans an identifier or keyword, stepping the keyword trie alongside the scan
    fn word(&mut self) -> Token {
        let trie = KeywordTrie::global();
        let mut state = Some(KeywordTrie::ROOT);
        while let Some(c) = self.cursor.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            state = state.and_then(|state| trie.step(state, c));
            self.cursor.bump();
        }

        let raw = self.cursor.slice_from(self.start);
        match state.and_then(|state| trie.accepting(state)) {
            Some(keyword) => self.token(TokenKind::Keyword(keyword), keyword.as_str()),
            None => {
                let lexeme = raw
                    .chars()
                    .take(MAX_IDENTIFIER_LENGTH)
                    .map(|c| c.to_ascii_lowercase())
                    .collect::<String>();
                self.token(TokenKind::Identifier, lexeme)
            }
        }
    }

    fn number(&mut self) -> LexResult<Token> {
        let text = literal::number(&mut self.cursor, self.start).map_err(|e| self.error(e))?;
        Ok(self.token(TokenKind::Number, text))
    }

    /// Longest match over the operators and delimiters
    fn punctuation(&mut self) -> LexResult<Token> {
        let first = self.cursor.peek();
        let second = self.cursor.peek_nth(1);
        if let (Some(first), Some(second)) = (first, second) {
            let pair = String::from_iter([first, second]);
            if let Some(kind) = TokenKind::punctuation(&pair) {
                self.cursor.bump();
                self.cursor.bump();
                return Ok(self.token(kind, pair));
            }
        }

        let Some(first) = self.cursor.bump() else {
            return Ok(Token::eof(self.start_position));
        };
        match TokenKind::punctuation(first.encode_utf8(&mut [0; 4])) {
            Some(kind) => Ok(self.token(kind, first.to_string())),
            None => Err(self.error(LexErrorKind::InvalidCharacter(first))),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = match self.next_token() {
            Ok(token) => Ok(token),
            Err(error) if self.mode == LexMode::Recovering => {
                trace!("recovering from {error}");
                self.errors.push(error);
                let text = self.cursor.slice_from(self.start);
                Ok(Token::new(TokenKind::Invalid, text, text, self.start_position))
            }
            Err(error) => {
                self.finished = true;
                Err(error)
            }
        };
        if let Ok(token) = &result {
            trace!("scanned {token:?}");
            self.finished = token.kind() == TokenKind::Eof;
        }
        Some(result)
    }
}

/// Tokenizes the entirety of some source text, failing on the first malformed token
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let tokens = Lexer::new(source).collect::<LexResult<Vec<_>>>()?;
    debug!("tokenized {} tokens", tokens.len());
    Ok(tokens)
}

/// Tokenizes the entirety of some source text, replacing malformed text with
/// [`Invalid`](TokenKind::Invalid) tokens. Returns the errors that were recovered from.
pub fn tokenize_recovering(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::recovering(source);
    let tokens = lexer.by_ref().flatten().collect::<Vec<_>>();
    debug!(
        "tokenized {} tokens with {} errors",
        tokens.len(),
        lexer.errors.len()
    );
    (tokens, lexer.errors)
}

pub type LexResult<T> = Result<T, LexError>;

/// An error that occurred while lexing, with the position it was found at
pub type LexError = PositionedError<LexErrorKind>;

/// The kinds of lexical errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated char literal")]
    UnterminatedChar,
    #[error("empty char literal")]
    EmptyChar,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid numeric literal {0:?}")]
    InvalidNumber(String),
    #[error("illegal escape sequence '\\{0}'")]
    IllegalEscape(char),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cythonic_tokens::keyword::Keyword;
    use test_log::test;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap_or_else(|e| panic!("{e}"))
            .into_iter()
            .map(|t| t.kind())
            .collect()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = tokenize("IF iF IF\n").unwrap();
        assert_eq!(tokens.len(), 4);
        for (token, raw) in tokens.iter().zip(["IF", "iF", "IF"]) {
            assert_eq!(token.kind(), TokenKind::Keyword(Keyword::If));
            assert_eq!(token.lexeme(), "if");
            assert_eq!(token.raw(), raw);
        }
        assert_eq!(tokens[3].kind(), TokenKind::Eof);
        assert_eq!(tokens[3].position(), Position::new(2, 1));
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("10. .5 1e10").unwrap();
        let lexemes = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Number)
            .map(|t| t.lexeme())
            .collect::<Vec<_>>();
        assert_eq!(lexemes, ["10.", ".5", "1e10"]);
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(
            kinds("x+=5;"),
            [
                TokenKind::Identifier,
                TokenKind::PlusEqual,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(kinds(">="), [TokenKind::GreaterEqual, TokenKind::Eof]);
        assert_eq!(
            kinds("> ="),
            [TokenKind::Greater, TokenKind::Equal, TokenKind::Eof]
        );
        assert_eq!(
            kinds("a++-b"),
            [
                TokenKind::Identifier,
                TokenKind::PlusPlus,
                TokenKind::Minus,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_invalid_numeric_literal() {
        let error = tokenize("1id").unwrap_err();
        assert!(error.to_string().contains("invalid numeric literal"), "{error}");
    }

    #[test]
    fn test_identifiers() {
        let long = "A".repeat(40);
        let tokens = tokenize(&format!("Fort _if x1 {long}")).unwrap();
        assert!(tokens[..4]
            .iter()
            .all(|t| t.kind() == TokenKind::Identifier));
        assert_eq!(tokens[0].lexeme(), "fort");
        assert_eq!(tokens[1].lexeme(), "_if");
        assert_eq!(tokens[3].lexeme(), "a".repeat(31));
        assert_eq!(tokens[3].raw(), long);
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("// line\nx /* a /* nested */ b */ y").unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::Comment);
        assert_eq!(tokens[0].lexeme(), " line");
        assert_eq!(tokens[2].kind(), TokenKind::Comment);
        assert_eq!(tokens[2].lexeme(), " a /* nested */ b ");
        assert_eq!(tokens[2].raw(), "/* a /* nested */ b */");
        assert_eq!(tokens[3].lexeme(), "y");

        let error = tokenize("/* /* */").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn test_literals() {
        let tokens = tokenize(r#"'a' "hi\n" '\''"#).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::CharLiteral);
        assert_eq!(tokens[0].lexeme(), "a");
        assert_eq!(tokens[1].lexeme(), "hi\n");
        assert_eq!(tokens[1].raw(), r#""hi\n""#);
        assert_eq!(tokens[2].lexeme(), "'");
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("int x;\r\n  x = 1;").unwrap();
        let positions = tokens
            .iter()
            .map(|t| (t.line(), t.column()))
            .collect::<Vec<_>>();
        assert_eq!(
            positions,
            [(1, 1), (1, 5), (1, 6), (2, 3), (2, 5), (2, 7), (2, 8), (2, 9)]
        );
    }

    #[test]
    fn test_invalid_character() {
        let error = tokenize("x = 1 @ 2;").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::InvalidCharacter('@'));
        assert_eq!(error.position(), Position::new(1, 7));
    }

    #[test]
    fn test_literal_errors_point_at_the_literal() {
        let error = tokenize("x = \"ab\\q\";").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::IllegalEscape('q'));
        assert_eq!(error.position(), Position::new(1, 5));

        let error = tokenize("s = \"open\nprint(s);").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::UnterminatedString);
        assert_eq!(error.position(), Position::new(1, 5));

        let error = tokenize("c = 'xy';").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::UnterminatedChar);
        assert_eq!(error.position(), Position::new(1, 5));
    }

    #[test]
    fn test_fatal_lexer_stops() {
        let results = Lexer::new("@ x").collect::<Vec<_>>();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_recovering_lexer() {
        let (tokens, errors) = tokenize_recovering("x = 1id + @;");
        let kinds = tokens.iter().map(|t| t.kind()).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Invalid,
                TokenKind::Plus,
                TokenKind::Invalid,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
        assert_eq!(tokens[2].raw(), "1id");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].kind(), &LexErrorKind::InvalidCharacter('@'));
    }

    #[test]
    fn test_raw_text_rescans_to_same_kind() {
        let source = "while (x >= 10.5) { s += \"a\\tb\"; c = 'q'; } // done";
        for token in tokenize(source).unwrap() {
            if token.kind() == TokenKind::Eof {
                continue;
            }
            let rescanned = tokenize(token.raw()).unwrap();
            assert_eq!(rescanned.len(), 2, "{token:?}");
            assert_eq!(rescanned[0].kind(), token.kind());
        }
    }
}
