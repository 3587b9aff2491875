use cythonic_tokens::Position;

/// A cursor over source text that tracks the line and column of the next character.
///
/// `\r\n` is folded into a single `\n`, and a lone `\r` also counts as a newline.
#[derive(Debug, Clone)]
pub struct Cursor<'s> {
    source: &'s str,
    index: usize,
    position: Position,
}

impl<'s> Cursor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            index: 0,
            position: Position::START,
        }
    }

    /// The byte offset of the next character
    pub fn index(&self) -> usize {
        self.index
    }

    /// The position of the next character
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.source.len()
    }

    /// The source text from `start` to the cursor
    pub fn slice_from(&self, start: usize) -> &'s str {
        &self.source[start..self.index]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Looks `n` characters past the next one
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consumes the next character
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();
        match c {
            '\r' => {
                if self.peek() == Some('\n') {
                    self.index += 1;
                }
                self.newline();
                Some('\n')
            }
            '\n' => {
                self.newline();
                Some('\n')
            }
            c => {
                self.position = Position::new(self.position.line(), self.position.column() + 1);
                Some(c)
            }
        }
    }

    /// Consumes the next character if it's `expected`
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `predicate` holds
    pub fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut predicate) {
            self.bump();
        }
    }

    fn newline(&mut self) {
        self.position = Position::new(self.position.line() + 1, 1);
    }

    fn rest(&self) -> &'s str {
        &self.source[self.index..]
    }
}

/// Whether `c` ends a line, in any of the encodings the cursor folds
pub fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}
