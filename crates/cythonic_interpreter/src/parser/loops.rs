//! Loops, executed by rewinding the token cursor.
//!
//! A loop remembers the index of its condition, runs its body, then jumps back and parses the
//! condition again. Once the condition is false the body is parsed one last time with execution
//! off, which leaves the cursor just past the loop. The trace is suppressed for every replayed
//! pass.

use super::statement::{is_assignment_operator, StatementResult};
use super::{InterpretError, Interpreter};
use crate::trace::Node;
use cythonic_tokens::keyword::Keyword;
use cythonic_tokens::token::TokenKind;
use std::io::{BufRead, Write};
use tracing::trace;

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// `while [its] ( expr ) statement`
    pub(super) fn while_statement(&mut self) -> StatementResult {
        self.node(Node::WhileStatement, |this| {
            this.advance();
            let condition_start = this.pos;
            let mut holds = this.while_condition();
            let mut replaying = None;
            while holds {
                if !this.loop_body()? {
                    break;
                }
                this.rewind(condition_start, &mut replaying);
                holds = this.while_condition();
            }
            this.with_executing(false, |this| this.statement())?;
            this.finish_replay(replaying);
            Ok(())
        })
    }

    /// Parses `[its] ( expr )`, returning whether the loop should run
    fn while_condition(&mut self) -> bool {
        self.match_keyword(Keyword::Its);
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.");
        let condition = self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");
        self.should_execute() && condition.is_truthy()
    }

    /// `for ( init ; [cond] ; [step] ) statement`
    ///
    /// The step is parsed with execution off on every pass, and executed by jumping back to it
    /// after the body.
    pub(super) fn for_statement(&mut self) -> StatementResult {
        self.node(Node::ForStatement, |this| {
            this.advance();
            this.consume(TokenKind::LeftParen, "Expect '(' after 'for'.");
            this.for_initializer()?;

            let condition_start = this.pos;
            let mut replaying = None;
            loop {
                let holds = this.check(TokenKind::Semicolon) || this.expression().is_truthy();
                this.consume(TokenKind::Semicolon, "Expect ';' after loop condition.");
                let step_start = this.pos;
                this.with_executing(false, |this| this.for_step());
                this.consume(TokenKind::RightParen, "Expect ')' after for clauses.");

                if !(this.should_execute() && holds) {
                    this.with_executing(false, |this| this.statement())?;
                    break;
                }
                if !this.loop_body()? {
                    break;
                }
                this.rewind(step_start, &mut replaying);
                this.for_step();
                this.jump_to(condition_start);
            }
            this.finish_replay(replaying);
            Ok(())
        })
    }

    fn for_initializer(&mut self) -> StatementResult {
        match self.current().kind() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Keyword(keyword)
                if keyword.is_type()
                    || matches!(keyword, Keyword::Var | Keyword::Const | Keyword::Dyn) =>
            {
                self.declaration()
            }
            TokenKind::Identifier => self.assignment_statement(),
            _ => {
                self.error("Expect variable declaration or assignment in for loop.");
                Ok(())
            }
        }
    }

    /// The step clause, an assignment or an expression such as `i++`
    fn for_step(&mut self) {
        if self.check(TokenKind::RightParen) {
            return;
        }
        if self.check(TokenKind::Identifier) && is_assignment_operator(self.peek_next().kind()) {
            if let Some(assignment) = self.parse_assignment() {
                self.apply_assignment(assignment);
            }
        } else {
            self.expression();
        }
    }

    /// `do { statement* } while ( expr ) ;`
    pub(super) fn do_while_statement(&mut self) -> StatementResult {
        self.node(Node::DoWhileStatement, |this| {
            this.advance();
            let body_start = this.pos;
            let mut replaying = None;
            loop {
                this.consume(TokenKind::LeftBrace, "Expect '{' after 'do'.");
                this.node(Node::Block, |this| this.block_contents())?;
                if !this.match_keyword(Keyword::While) {
                    this.error("Expect 'while' after do-block.");
                }
                this.consume(TokenKind::LeftParen, "Expect '(' after 'while'.");
                let condition = this.expression();
                this.consume(TokenKind::RightParen, "Expect ')' after condition.");
                this.consume(TokenKind::Semicolon, "Expect ';' after do-while.");

                if !(this.should_execute() && condition.is_truthy()) {
                    break;
                }
                this.rewind(body_start, &mut replaying);
            }
            this.finish_replay(replaying);
            Ok(())
        })
    }

    /// Runs a loop body, returning whether it consumed anything. A body missing at the end of the
    /// token stream consumes nothing, and the loop must not be replayed.
    fn loop_body(&mut self) -> Result<bool, InterpretError> {
        let start = self.pos;
        self.statement()?;
        Ok(self.pos != start)
    }

    /// Jumps back to `index` for another pass, suppressing the trace from the first replay on.
    ///
    /// `replaying` holds the suppression state from before the first replay.
    fn rewind(&mut self, index: usize, replaying: &mut Option<bool>) {
        trace!("replaying loop from token {index}");
        self.jump_to(index);
        if replaying.is_none() {
            *replaying = Some(self.trace.set_suppressed(true));
        }
    }

    fn finish_replay(&mut self, replaying: Option<bool>) {
        if let Some(suppressed) = replaying {
            self.trace.set_suppressed(suppressed);
        }
    }
}
