use super::statement::StatementResult;
use super::Interpreter;
use crate::trace::Node;
use crate::value::Value;
use cythonic_tokens::token::TokenKind;
use std::io;
use std::io::{BufRead, Write};
use tracing::warn;

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// `input ( IDENT ) ;`
    ///
    /// Prompts for and reads one whitespace delimited integer. Input that isn't an integer, or the
    /// end of input, leaves the variable unchanged.
    pub(super) fn input_statement(&mut self) -> StatementResult {
        self.node(Node::InputStatement, |this| {
            this.advance();
            this.consume(TokenKind::LeftParen, "Expect '(' after 'input'.");
            let name = this.consume_identifier("Expect variable name in input.");
            this.consume(TokenKind::RightParen, "Expect ')' after input variable.");
            this.consume(TokenKind::Semicolon, "Expect ';' after input statement.");

            let Some(name) = name.filter(|_| this.should_execute()) else {
                return Ok(());
            };
            write!(this.output, "Enter value for {name}: ")?;
            this.output.flush()?;
            match this.read_word()? {
                Some(word) => match word.parse::<i64>() {
                    Ok(value) => this.write_variable(&name, Value::Int(value)),
                    Err(_) => {
                        warn!("input {word:?} for {name:?} is not an integer, value left unchanged")
                    }
                },
                None => warn!("input ended before a value for {name:?}, value left unchanged"),
            }
            Ok(())
        })
    }

    /// `print ( expr ) ;`
    pub(super) fn output_statement(&mut self) -> StatementResult {
        self.node(Node::OutputStatement, |this| {
            this.advance();
            this.consume(TokenKind::LeftParen, "Expect '(' after 'print'.");
            let value = this.expression();
            this.consume(TokenKind::RightParen, "Expect ')' after print expression.");
            this.consume(TokenKind::Semicolon, "Expect ';' after print statement.");
            if this.should_execute() {
                writeln!(this.output, "{value}")?;
            }
            Ok(())
        })
    }

    /// Reads the next whitespace delimited word of input, across lines
    fn read_word(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(word) = self.pending_input.pop_front() {
                return Ok(Some(word));
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending_input
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}
