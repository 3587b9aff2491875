//! A lexical token from a source file

use crate::keyword::{Keyword, KeywordCategory};
use crate::Position;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use strum::{EnumString, IntoStaticStr};

/// A lexical token from a source file
#[derive(Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    raw: String,
    position: Position,
}

impl Token {
    /// Creates a new token
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        raw: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            raw: raw.into(),
            position,
        }
    }

    /// Creates an end of stream token at the given position
    pub fn eof(position: Position) -> Self {
        Self::new(TokenKind::Eof, "", "", position)
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The normalized text of this token.
    ///
    /// Lowercase for identifiers and keywords, the decoded value for string and char literals.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// The exact source slice this token was scanned from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> usize {
        self.position.line()
    }

    pub fn column(&self) -> usize {
        self.position.column()
    }

    /// Checks if this token is the given keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Gets the keyword of this token, if it is one
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?}) @ {}", self.kind, self.raw, self.position)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The kind for this token
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Identifier,
    /// A reserved word, named by the keyword itself
    #[strum(disabled)]
    Keyword(Keyword),

    // literals
    Number,
    StringLiteral,
    CharLiteral,

    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ++
    PlusPlus,
    /// --
    MinusMinus,
    /// =
    Equal,
    /// +=
    PlusEqual,
    /// -=
    MinusEqual,
    /// *=
    StarEqual,
    /// /=
    SlashEqual,
    /// %=
    PercentEqual,
    /// ==
    EqualEqual,
    /// !=
    NotEqual,
    /// >
    Greater,
    /// <
    Less,
    /// >=
    GreaterEqual,
    /// <=
    LessEqual,
    /// &&
    AndAnd,
    /// ||
    OrOr,
    /// !
    Not,
    /// &
    Ampersand,
    /// |
    Pipe,
    /// ^
    Caret,
    /// ~
    Tilde,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,

    Comment,
    /// End of stream, will only appear at the end of a token list
    Eof,
    /// Text a recovering lexer could not scan
    Invalid,
}

impl TokenKind {
    /// The screaming snake case name of this kind. Keywords are named by their uppercase spelling,
    /// ie `IF` or `INT`.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            TokenKind::Keyword(keyword) => Cow::Owned(keyword.as_str().to_ascii_uppercase()),
            other => Cow::Borrowed(other.into()),
        }
    }

    /// Parses a name produced by [`name`](Self::name)
    pub fn from_name(name: &str) -> Option<Self> {
        TokenKind::from_str(name)
            .ok()
            .or_else(|| Keyword::from_str(name).ok().map(TokenKind::Keyword))
    }

    /// The category of the keyword, if this is a keyword
    pub fn category(&self) -> Option<KeywordCategory> {
        match self {
            TokenKind::Keyword(keyword) => Some(keyword.category()),
            _ => None,
        }
    }

    /// Whether a statement can begin with this kind of token. Any keyword that isn't a noise word
    /// or a boolean literal can.
    pub fn starts_statement(&self) -> bool {
        !matches!(
            self.category(),
            None | Some(KeywordCategory::Noise) | Some(KeywordCategory::BooleanLiteral)
        )
    }

    /// Gets the kind of a fixed operator or delimiter spelling
    pub fn punctuation(text: &str) -> Option<Self> {
        use TokenKind::*;
        let kind = match text {
            "++" => PlusPlus,
            "--" => MinusMinus,
            "==" => EqualEqual,
            "!=" => NotEqual,
            ">=" => GreaterEqual,
            "<=" => LessEqual,
            "&&" => AndAnd,
            "||" => OrOr,
            "+=" => PlusEqual,
            "-=" => MinusEqual,
            "*=" => StarEqual,
            "/=" => SlashEqual,
            "%=" => PercentEqual,
            "+" => Plus,
            "-" => Minus,
            "*" => Star,
            "/" => Slash,
            "%" => Percent,
            "=" => Equal,
            ">" => Greater,
            "<" => Less,
            "!" => Not,
            "&" => Ampersand,
            "|" => Pipe,
            "^" => Caret,
            "~" => Tilde,
            "(" => LeftParen,
            ")" => RightParen,
            "{" => LeftBrace,
            "}" => RightBrace,
            "[" => LeftBracket,
            "]" => RightBracket,
            ";" => Semicolon,
            "," => Comma,
            "." => Dot,
            ":" => Colon,
            "?" => Question,
            _ => return None,
        };
        Some(kind)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::PlusEqual.name(), "PLUS_EQUAL");
        assert_eq!(TokenKind::StringLiteral.name(), "STRING_LITERAL");
        assert_eq!(TokenKind::Keyword(Keyword::If).name(), "IF");
        assert_eq!(TokenKind::Eof.to_string(), "EOF");
    }

    #[test]
    fn test_names_parse_back() {
        for kind in [
            TokenKind::Identifier,
            TokenKind::GreaterEqual,
            TokenKind::Ampersand,
            TokenKind::Keyword(Keyword::And),
            TokenKind::Keyword(Keyword::Int),
            TokenKind::Invalid,
        ] {
            assert_eq!(TokenKind::from_name(&kind.name()), Some(kind), "{kind}");
        }
        assert_eq!(TokenKind::from_name("KEYWORD"), None);
        assert_eq!(TokenKind::from_name("NOT_A_KIND"), None);
    }

    #[test]
    fn test_statement_starters() {
        assert!(TokenKind::Keyword(Keyword::While).starts_statement());
        assert!(TokenKind::Keyword(Keyword::Int).starts_statement());
        assert!(TokenKind::Keyword(Keyword::Print).starts_statement());
        assert!(!TokenKind::Keyword(Keyword::Then).starts_statement());
        assert!(!TokenKind::Keyword(Keyword::True).starts_statement());
        assert!(!TokenKind::Identifier.starts_statement());
        assert!(!TokenKind::Semicolon.starts_statement());
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(TokenKind::punctuation(">="), Some(TokenKind::GreaterEqual));
        assert_eq!(TokenKind::punctuation(">"), Some(TokenKind::Greater));
        assert_eq!(TokenKind::punctuation("=>"), None);
    }

    #[test]
    fn test_token_accessors() {
        let token = Token::new(
            TokenKind::Keyword(Keyword::If),
            "if",
            "IF",
            Position::new(2, 5),
        );
        assert!(token.is_keyword(Keyword::If));
        assert_eq!(token.keyword(), Some(Keyword::If));
        assert_eq!(token.lexeme(), "if");
        assert_eq!(token.raw(), "IF");
        assert_eq!((token.line(), token.column()), (2, 5));
    }
}
