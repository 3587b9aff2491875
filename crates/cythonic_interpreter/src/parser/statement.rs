use super::expr::apply_operator;
use super::{InterpretError, Interpreter};
use crate::trace::Node;
use crate::value::Value;
use cythonic_tokens::keyword::Keyword;
use cythonic_tokens::token::TokenKind;
use std::io::{BufRead, Write};

pub(super) type StatementResult = Result<(), InterpretError>;

/// A parsed assignment waiting to be applied
pub(super) struct Assignment {
    name: String,
    operator: TokenKind,
    value: Value,
}

/// Whether `kind` is one of `=`, `+=`, `-=`, `*=`, `/=` or `%=`
pub(super) fn is_assignment_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::PlusEqual
            | TokenKind::MinusEqual
            | TokenKind::StarEqual
            | TokenKind::SlashEqual
            | TokenKind::PercentEqual
    )
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Parses and runs one statement, recovering from any syntax error within it
    pub(super) fn statement(&mut self) -> StatementResult {
        self.node(Node::Statement, |this| {
            this.statement_kind()?;
            if this.panic_mode {
                this.synchronize();
            }
            Ok(())
        })
    }

    fn statement_kind(&mut self) -> StatementResult {
        match self.current().kind() {
            TokenKind::Keyword(keyword) => self.keyword_statement(keyword),
            TokenKind::Identifier => self.identifier_statement(),
            TokenKind::PlusPlus | TokenKind::MinusMinus => self.prefix_increment_statement(),
            TokenKind::LeftBrace => self.block(),
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => {
                self.error("Expect statement.");
                Ok(())
            }
            _ => {
                self.error("Expect statement.");
                self.advance();
                Ok(())
            }
        }
    }

    fn keyword_statement(&mut self, keyword: Keyword) -> StatementResult {
        use Keyword::*;
        match keyword {
            Var | Const | Dyn => self.declaration(),
            keyword if keyword.is_type() => self.declaration(),
            Let => self.let_statement(),
            Set => self.set_statement(),
            Input => self.input_statement(),
            Print => self.output_statement(),
            If => self.if_statement(),
            While => self.while_statement(),
            For => self.for_statement(),
            Do => self.do_while_statement(),
            Switch => self.switch_statement(),
            Return => self.return_statement(),
            Next | Break => {
                self.advance();
                self.consume(
                    TokenKind::Semicolon,
                    &format!("Expect ';' after '{keyword}'."),
                );
                Ok(())
            }
            Foreach => self.foreach_statement(),
            Class => self.class_declaration(),
            Struct => self.struct_declaration(),
            Enum => self.enum_declaration(),
            Record => self.record_declaration(),
            Pub | Priv if self.peek_next().is_keyword(Record) => self.record_declaration(),
            _ => {
                self.error("Unexpected keyword at start of statement.");
                self.advance();
                Ok(())
            }
        }
    }

    /// `(TYPE | var | const | dyn) [TYPE] IDENT [= expr] ;`
    pub(super) fn declaration(&mut self) -> StatementResult {
        self.node(Node::DeclarationStatement, |this| {
            let mut constant = false;
            match this.current().keyword() {
                Some(Keyword::Const) => {
                    constant = true;
                    this.advance();
                }
                Some(Keyword::Var | Keyword::Dyn) => this.advance(),
                _ => {}
            }
            let ty = this.current().keyword().filter(Keyword::is_type);
            if ty.is_some() {
                this.advance();
            }

            let name = this.consume_identifier("Expect variable name.");
            let initializer = if this.match_kind(TokenKind::Equal) {
                Some(this.expression())
            } else {
                None
            };
            this.consume(
                TokenKind::Semicolon,
                "Expect ';' after variable declaration.",
            );

            if let Some(name) = name.filter(|_| this.should_execute()) {
                let value = match (initializer, ty) {
                    (None, ty) => Value::default_for(ty),
                    (
                        Some(value @ (Value::Int(_) | Value::Double(_))),
                        Some(ty @ (Keyword::Int | Keyword::Double)),
                    ) => this.lenient(value.cast(ty)),
                    (Some(value), _) => value,
                };
                this.environment.define(name, value, constant);
            }
            Ok(())
        })
    }

    /// `let IDENT = expr ;`
    fn let_statement(&mut self) -> StatementResult {
        self.node(Node::LetStatement, |this| {
            this.advance();
            let name = this.consume_identifier("Expect variable name after 'let'.");
            this.consume(TokenKind::Equal, "Expect '=' after variable name.");
            let value = this.expression();
            this.consume(TokenKind::Semicolon, "Expect ';' after let statement.");
            if let Some(name) = name.filter(|_| this.should_execute()) {
                this.environment.define(name, value, false);
            }
            Ok(())
        })
    }

    /// `set IDENT = expr ;`
    fn set_statement(&mut self) -> StatementResult {
        self.node(Node::SetStatement, |this| {
            this.advance();
            let name = this.consume_identifier("Expect variable name after 'set'.");
            this.consume(TokenKind::Equal, "Expect '=' after variable name.");
            let value = this.expression();
            this.consume(TokenKind::Semicolon, "Expect ';' after set statement.");
            if let Some(name) = name.filter(|_| this.should_execute()) {
                this.write_variable(&name, value);
            }
            Ok(())
        })
    }

    fn identifier_statement(&mut self) -> StatementResult {
        let next = self.peek_next().kind();
        if is_assignment_operator(next) {
            self.assignment_statement()
        } else if matches!(next, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            self.node(Node::IncrementStatement, |this| {
                let name = this.current().lexeme().to_string();
                this.advance();
                this.advance();
                this.consume(
                    TokenKind::Semicolon,
                    "Expect ';' after increment/decrement.",
                );
                this.step_variable(&name, next);
                Ok(())
            })
        } else {
            self.advance();
            self.error("Unexpected identifier usage.");
            Ok(())
        }
    }

    /// `IDENT (= | += | -= | *= | /= | %=) expr ;`
    pub(super) fn assignment_statement(&mut self) -> StatementResult {
        self.node(Node::AssignmentStatement, |this| {
            let assignment = this.parse_assignment();
            this.consume(TokenKind::Semicolon, "Expect ';' after assignment.");
            if let Some(assignment) = assignment {
                this.apply_assignment(assignment);
            }
            Ok(())
        })
    }

    /// Parses `IDENT op expr`, without the trailing `;`
    pub(super) fn parse_assignment(&mut self) -> Option<Assignment> {
        let name = self.consume_identifier("Expect variable name.")?;
        let operator = self.current().kind();
        if !is_assignment_operator(operator) {
            self.error("Expect assignment operator.");
            return None;
        }
        self.advance();
        let value = self.expression();
        Some(Assignment {
            name,
            operator,
            value,
        })
    }

    pub(super) fn apply_assignment(&mut self, assignment: Assignment) {
        if !self.should_execute() {
            return;
        }
        let Assignment {
            name,
            operator,
            value,
        } = assignment;
        let value = match operator {
            TokenKind::Equal => value,
            operator => {
                let current = self.read_variable(&name);
                self.lenient(apply_operator(operator, current, value))
            }
        };
        self.write_variable(&name, value);
    }

    /// `(++ | --) IDENT ;`
    fn prefix_increment_statement(&mut self) -> StatementResult {
        self.node(Node::IncrementStatement, |this| {
            let operator = this.current().kind();
            this.advance();
            let name = this.consume_identifier("Expect identifier after prefix operator.");
            this.consume(
                TokenKind::Semicolon,
                "Expect ';' after increment/decrement.",
            );
            if let Some(name) = name {
                this.step_variable(&name, operator);
            }
            Ok(())
        })
    }

    /// `if [at] ( expr ) [then] statement [else statement]`
    ///
    /// Both arms are always parsed, only the chosen one executes.
    fn if_statement(&mut self) -> StatementResult {
        self.node(Node::IfStatement, |this| {
            this.advance();
            this.match_keyword(Keyword::At);
            this.consume(TokenKind::LeftParen, "Expect '(' after 'if'.");
            let condition = this.expression();
            this.consume(TokenKind::RightParen, "Expect ')' after condition.");
            this.match_keyword(Keyword::Then);

            let runs = this.should_execute();
            let holds = condition.is_truthy();
            this.with_executing(runs && holds, |this| this.statement())?;
            if this.match_keyword(Keyword::Else) {
                this.with_executing(runs && !holds, |this| this.statement())?;
            }
            Ok(())
        })
    }

    /// `{ statement* }`
    pub(super) fn block(&mut self) -> StatementResult {
        self.node(Node::Block, |this| {
            this.advance();
            this.block_contents()
        })
    }

    /// The statements of a block after its `{`, and the closing `}`
    pub(super) fn block_contents(&mut self) -> StatementResult {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.statement()?;
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.");
        Ok(())
    }

    /// `switch ( expr ) { (case expr : statement*)* [default : statement*] }`
    ///
    /// Only the first matching case runs, and `default` runs when no case before it matched.
    fn switch_statement(&mut self) -> StatementResult {
        self.node(Node::SwitchStatement, |this| {
            this.advance();
            this.consume(TokenKind::LeftParen, "Expect '(' after 'switch'.");
            let scrutinee = this.expression();
            this.consume(
                TokenKind::RightParen,
                "Expect ')' after switch expression.",
            );
            this.consume(TokenKind::LeftBrace, "Expect '{' before switch cases.");

            let runs = this.should_execute();
            let mut matched = false;
            while !this.check(TokenKind::RightBrace) && !this.check(TokenKind::Eof) {
                if this.check_keyword(Keyword::Case) {
                    this.node(Node::CaseClause, |this| {
                        this.advance();
                        let value = this.expression();
                        this.consume(TokenKind::Colon, "Expect ':' after case expression.");
                        let selected = runs && !matched && scrutinee.loosely_equals(&value);
                        matched |= selected;
                        this.with_executing(selected, |this| this.clause_body())
                    })?;
                } else if this.check_keyword(Keyword::Default) {
                    this.node(Node::DefaultClause, |this| {
                        this.advance();
                        this.consume(TokenKind::Colon, "Expect ':' after default.");
                        let selected = runs && !matched;
                        matched |= selected;
                        this.with_executing(selected, |this| this.clause_body())
                    })?;
                } else {
                    this.error("Expect 'case' or 'default' inside switch.");
                    this.advance();
                }
            }
            this.consume(TokenKind::RightBrace, "Expect '}' after switch body.");
            Ok(())
        })
    }

    fn clause_body(&mut self) -> StatementResult {
        while !self.check_keyword(Keyword::Case)
            && !self.check_keyword(Keyword::Default)
            && !self.check(TokenKind::RightBrace)
            && !self.check(TokenKind::Eof)
        {
            self.statement()?;
        }
        Ok(())
    }

    /// `return [expr] ;`, which has no effect
    fn return_statement(&mut self) -> StatementResult {
        self.node(Node::ReturnStatement, |this| {
            this.advance();
            if !this.check(TokenKind::Semicolon) {
                this.expression();
            }
            this.consume(TokenKind::Semicolon, "Expect ';' after return value.");
            Ok(())
        })
    }
}
