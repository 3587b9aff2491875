//! The interpreter, a recursive descent parser that executes the program as it validates it.
//!
//! No syntax tree is built. Every grammar rule is a method that consumes tokens and, while
//! the `executing` flag is set, performs its effect. Branches that should not run
//! are still parsed, with execution switched off. Loops run by rewinding the token cursor to their
//! condition and parsing it again.

use crate::diagnostic::Diagnostic;
use crate::environment::Environment;
use crate::lexer::LexError;
use crate::trace::{Node, ParseTrace};
use crate::value::{Value, ValueError};
use cythonic_tokens::keyword::Keyword;
use cythonic_tokens::token::{Token, TokenKind};
use std::collections::{HashSet, VecDeque};
use std::io;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::{debug, trace, warn};

mod console;
mod declarations;
mod expr;
mod loops;
mod statement;

/// Interprets a token list.
///
/// # Examples
/// ```
/// # use cythonic_interpreter::lexer::tokenize;
/// # use cythonic_interpreter::parser::Interpreter;
/// let tokens = tokenize("print(1 + 2);").unwrap();
/// let mut output = vec![];
/// let outcome = Interpreter::new(tokens, "".as_bytes(), &mut output).run().unwrap();
/// assert!(!outcome.had_error());
/// assert_eq!(output, b"3\n");
/// ```
#[derive(Debug)]
pub struct Interpreter<R, W> {
    tokens: Vec<Token>,
    pos: usize,
    executing: bool,
    environment: Environment,
    panic_mode: bool,
    diagnostics: Vec<Diagnostic>,
    reported: HashSet<usize>,
    trace: ParseTrace,
    input: R,
    output: W,
    pending_input: VecDeque<String>,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Creates a new interpreter. Comments are dropped, and an end of stream token is added if the
    /// list doesn't already end with one.
    pub fn new(tokens: impl IntoIterator<Item = Token>, input: R, output: W) -> Self {
        let mut tokens = tokens
            .into_iter()
            .filter(|token| token.kind() != TokenKind::Comment)
            .collect::<Vec<_>>();
        if let Some(eof) = tokens.iter().position(|t| t.kind() == TokenKind::Eof) {
            tokens.truncate(eof + 1);
        } else {
            let position = tokens.last().map(|t| t.position()).unwrap_or_default();
            tokens.push(Token::eof(position));
        }

        Self {
            tokens,
            pos: 0,
            executing: true,
            environment: Environment::new(),
            panic_mode: false,
            diagnostics: vec![],
            reported: HashSet::new(),
            trace: ParseTrace::disabled(),
            input,
            output,
            pending_input: VecDeque::new(),
        }
    }

    /// Records the parse tree while running
    pub fn with_parse_tree(mut self) -> Self {
        self.trace = ParseTrace::enabled();
        self
    }

    /// Runs the whole program
    pub fn run(mut self) -> Result<RunOutcome, InterpretError> {
        self.trace.next_token(&self.tokens[self.pos]);
        self.node(Node::Program, |this| {
            while !this.check(TokenKind::Eof) {
                this.statement()?;
            }
            Ok::<_, InterpretError>(())
        })?;
        self.output.flush()?;
        debug!(
            "run finished with {} diagnostics and {} variables",
            self.diagnostics.len(),
            self.environment.len()
        );

        Ok(RunOutcome {
            diagnostics: self.diagnostics,
            environment: self.environment,
            parse_tree: self.trace.finish(),
        })
    }

    /// Runs `f` as the given grammar rule
    fn node<T>(&mut self, node: Node, f: impl FnOnce(&mut Self) -> T) -> T {
        self.trace.enter(node);
        let result = f(self);
        self.trace.exit(node);
        result
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_next(&self) -> &Token {
        self.tokens
            .get(self.pos + 1)
            .unwrap_or_else(|| &self.tokens[self.tokens.len() - 1])
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn advance(&mut self) {
        if self.current().kind() != TokenKind::Eof {
            self.pos += 1;
        }
        self.trace.next_token(&self.tokens[self.pos]);
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind() == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        self.match_kind(TokenKind::Keyword(keyword))
    }

    /// Consumes the current token if it has the given kind, otherwise reports `message`
    fn consume(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.match_kind(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Consumes an identifier, returning its name
    fn consume_identifier(&mut self, message: &str) -> Option<String> {
        if self.check(TokenKind::Identifier) {
            let name = self.current().lexeme().to_string();
            self.advance();
            Some(name)
        } else {
            self.error(message);
            None
        }
    }

    /// Moves the cursor back (or forward) to the token at `index`
    fn jump_to(&mut self, index: usize) {
        trace!("jumping from token {} to {index}", self.pos);
        self.pos = index.min(self.tokens.len() - 1);
    }

    /// Reports an error at the current token
    fn error(&mut self, message: &str) {
        self.error_at(self.pos, message);
    }

    /// Reports an error at the token at `index`. Nothing is reported while in panic mode, and an
    /// error at a token that was already reported, such as on a replayed loop body, is dropped.
    fn error_at(&mut self, index: usize, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        if self.reported.insert(index) {
            let diagnostic = Diagnostic::at(&self.tokens[index], message);
            debug!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }
    }

    /// Skips tokens until a statement boundary, leaving panic mode.
    ///
    /// A `;` is consumed, while a token that can start a statement or a `}` is left as the
    /// current token. Nothing is skipped if the statement already ended with its `;`.
    fn synchronize(&mut self) {
        self.panic_mode = false;
        if self.pos > 0 && self.previous().kind() == TokenKind::Semicolon {
            return;
        }
        while !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::Semicolon) {
                return;
            }
            if self.check(TokenKind::RightBrace) || self.current().kind().starts_statement() {
                return;
            }
            self.advance();
        }
    }

    /// Runs `f` with execution set to `executing`, restoring the previous state afterwards
    fn with_executing<T>(&mut self, executing: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let outer = std::mem::replace(&mut self.executing, executing);
        let result = f(self);
        self.executing = outer;
        result
    }

    /// Whether a construct being parsed right now should also have its effect. Nothing runs in
    /// a statement that has already reported an error.
    fn should_execute(&self) -> bool {
        self.executing && !self.panic_mode
    }

    /// Unwraps the result of an operation on values, substituting `0` on failure.
    ///
    /// Failures are only logged while executing, otherwise they yield null.
    fn lenient(&self, result: Result<Value, ValueError>) -> Value {
        result.unwrap_or_else(|error| {
            if !self.executing {
                return Value::Null;
            }
            warn!("{error} near {}, using 0", self.previous().position());
            Value::Int(0)
        })
    }

    /// Reads a variable, substituting `0` if it's not defined
    fn read_variable(&self, name: &str) -> Value {
        self.environment.get(name).unwrap_or_else(|| {
            warn!("read of undefined variable {name:?}, using 0");
            Value::Int(0)
        })
    }

    /// Assigns to a variable, ignoring the assignment if the variable is undefined or constant
    fn write_variable(&mut self, name: &str, value: Value) {
        if let Err(error) = self.environment.assign(name, value) {
            warn!("{error}, assignment ignored");
        }
    }
}

/// The result of running a program
#[derive(Debug)]
pub struct RunOutcome {
    diagnostics: Vec<Diagnostic>,
    environment: Environment,
    parse_tree: Option<String>,
}

impl RunOutcome {
    /// Whether any syntax error was found
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The variables as they were when the program finished
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The parse tree trace, if it was recorded
    pub fn parse_tree(&self) -> Option<&str> {
        self.parse_tree.as_deref()
    }
}

/// An error that stops a program from running
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use test_log::test;

    fn interpret(source: &str) -> (RunOutcome, String) {
        let mut output = vec![];
        let outcome = Interpreter::new(tokenize(source).unwrap(), "".as_bytes(), &mut output)
            .run()
            .unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_comments_are_skipped() {
        let (outcome, output) = interpret("/* hi */ print(1); // done");
        assert!(!outcome.had_error(), "{:?}", outcome.diagnostics());
        assert_eq!(output, "1\n");
    }

    #[test]
    fn test_missing_eof_is_added() {
        let tokens = tokenize("print(2);")
            .unwrap()
            .into_iter()
            .filter(|t| t.kind() != TokenKind::Eof)
            .collect::<Vec<_>>();
        let mut output = vec![];
        let outcome = Interpreter::new(tokens, "".as_bytes(), &mut output)
            .run()
            .unwrap();
        assert!(!outcome.had_error());
        assert_eq!(output, b"2\n");
    }

    #[test]
    fn test_panic_mode_reports_once_per_statement() {
        let (outcome, output) = interpret("int x = ;\nprint(5);\n) ) print(6);");
        assert_eq!(outcome.diagnostics().len(), 2, "{:?}", outcome.diagnostics());
        assert_eq!(
            outcome.diagnostics()[0].to_string(),
            "[line 1:9] Error at ';': Expect expression."
        );
        assert_eq!(
            outcome.diagnostics()[1].to_string(),
            "[line 3:1] Error at ')': Expect statement."
        );
        assert_eq!(output, "5\n6\n");
    }

    #[test]
    fn test_synchronize_stops_at_statement_keyword() {
        let (outcome, output) = interpret("x = 1 print(7);");
        assert_eq!(outcome.diagnostics().len(), 1);
        assert_eq!(
            outcome.diagnostics()[0].message(),
            "Expect ';' after assignment."
        );
        assert_eq!(output, "7\n");
    }

    #[test]
    fn test_parse_tree_is_recorded() {
        let tokens = tokenize("print(1);").unwrap();
        let outcome = Interpreter::new(tokens, "".as_bytes(), io::sink())
            .with_parse_tree()
            .run()
            .unwrap();
        let tree = outcome.parse_tree().unwrap();
        assert!(tree.starts_with("Next token is: PRINT Next lexeme is print\nEnter <Program>\n"));
        assert!(tree.contains("    Enter <OutputStatement>\n"));
        assert!(tree.ends_with("Exit <Program>\n"));
    }
}
