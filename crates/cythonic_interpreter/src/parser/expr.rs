use super::Interpreter;
use crate::trace::Node;
use crate::value::{Value, ValueError};
use cythonic_tokens::keyword::Keyword;
use cythonic_tokens::token::TokenKind;
use std::cmp::Ordering;
use std::io::{BufRead, Write};

/// Applies an arithmetic operator, or the arithmetic part of a compound assignment or increment.
/// Anything else yields `rhs`.
pub(super) fn apply_operator(
    operator: TokenKind,
    lhs: Value,
    rhs: Value,
) -> Result<Value, ValueError> {
    match operator {
        TokenKind::Plus | TokenKind::PlusEqual | TokenKind::PlusPlus => lhs + rhs,
        TokenKind::Minus | TokenKind::MinusEqual | TokenKind::MinusMinus => lhs - rhs,
        TokenKind::Star | TokenKind::StarEqual => lhs * rhs,
        TokenKind::Slash | TokenKind::SlashEqual => lhs / rhs,
        TokenKind::Percent | TokenKind::PercentEqual => lhs % rhs,
        _ => Ok(rhs),
    }
}

/// The value of a numeric literal. Anything with a fraction or exponent is a double.
fn number_value(text: &str) -> Value {
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(int) = text.parse::<i64>() {
            return Value::Int(int);
        }
    }
    text.parse::<f64>()
        .map(Value::Double)
        .unwrap_or(Value::Null)
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub(super) fn expression(&mut self) -> Value {
        self.node(Node::Expression, |this| this.logical_or())
    }

    /// `&&` and `||` always evaluate both operands
    fn logical_or(&mut self) -> Value {
        self.node(Node::LogicalOr, |this| {
            let mut lhs = this.logical_and();
            while this.match_kind(TokenKind::OrOr) {
                let rhs = this.logical_and();
                lhs = Value::Bool(lhs.is_truthy() || rhs.is_truthy());
            }
            lhs
        })
    }

    fn logical_and(&mut self) -> Value {
        self.node(Node::LogicalAnd, |this| {
            let mut lhs = this.equality();
            while this.match_kind(TokenKind::AndAnd) {
                let rhs = this.equality();
                lhs = Value::Bool(lhs.is_truthy() && rhs.is_truthy());
            }
            lhs
        })
    }

    fn equality(&mut self) -> Value {
        self.node(Node::Equality, |this| {
            let mut lhs = this.comparison();
            while let op @ (TokenKind::EqualEqual | TokenKind::NotEqual) = this.current().kind() {
                this.advance();
                let rhs = this.comparison();
                let equal = lhs.loosely_equals(&rhs);
                lhs = Value::Bool(if op == TokenKind::EqualEqual {
                    equal
                } else {
                    !equal
                });
            }
            lhs
        })
    }

    fn comparison(&mut self) -> Value {
        self.node(Node::Comparison, |this| {
            let mut lhs = this.type_conversion();
            while let op @ (TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual) = this.current().kind()
            {
                this.advance();
                let rhs = this.type_conversion();
                lhs = match lhs.compare(&rhs) {
                    Ok(ordering) => Value::Bool(match op {
                        TokenKind::Greater => ordering == Ordering::Greater,
                        TokenKind::GreaterEqual => ordering != Ordering::Less,
                        TokenKind::Less => ordering == Ordering::Less,
                        _ => ordering != Ordering::Greater,
                    }),
                    Err(error) => this.lenient(Err(error)),
                };
            }
            lhs
        })
    }

    /// `term (as TYPE)*`
    fn type_conversion(&mut self) -> Value {
        self.node(Node::TypeConversion, |this| {
            let mut value = this.term();
            while this.match_keyword(Keyword::As) {
                match this.current().keyword().filter(Keyword::is_type) {
                    Some(ty) => {
                        this.advance();
                        value = this.lenient(value.cast(ty));
                    }
                    None => {
                        this.error("Expect type after 'as'.");
                        break;
                    }
                }
            }
            value
        })
    }

    fn term(&mut self) -> Value {
        self.node(Node::Term, |this| {
            let mut lhs = this.factor();
            while let op @ (TokenKind::Plus | TokenKind::Minus) = this.current().kind() {
                this.advance();
                let rhs = this.factor();
                lhs = this.lenient(apply_operator(op, lhs, rhs));
            }
            lhs
        })
    }

    fn factor(&mut self) -> Value {
        self.node(Node::Factor, |this| {
            let mut lhs = this.unary();
            while let op @ (TokenKind::Star | TokenKind::Slash | TokenKind::Percent) =
                this.current().kind()
            {
                this.advance();
                let rhs = this.unary();
                lhs = this.lenient(apply_operator(op, lhs, rhs));
            }
            lhs
        })
    }

    fn unary(&mut self) -> Value {
        self.node(Node::Unary, |this| {
            if this.match_kind(TokenKind::Not) {
                !this.unary()
            } else if this.match_kind(TokenKind::Minus) {
                let operand = this.unary();
                this.lenient(-operand)
            } else {
                this.postfix()
            }
        })
    }

    /// Prefix `++x` yields the new value, postfix `x++` yields the old one
    fn postfix(&mut self) -> Value {
        self.node(Node::Postfix, |this| {
            if let op @ (TokenKind::PlusPlus | TokenKind::MinusMinus) = this.current().kind() {
                this.advance();
                return match this.consume_identifier("Expect identifier after prefix operator.")
                {
                    Some(name) => this.step_variable(&name, op).1,
                    None => Value::Null,
                };
            }

            let target = this
                .check(TokenKind::Identifier)
                .then(|| this.current().lexeme().to_string());
            let mut value = this.primary();
            while let op @ (TokenKind::PlusPlus | TokenKind::MinusMinus) = this.current().kind() {
                this.advance();
                match &target {
                    Some(name) => value = this.step_variable(name, op).0,
                    None => {
                        this.error("Invalid increment target.");
                        break;
                    }
                }
            }
            value
        })
    }

    fn primary(&mut self) -> Value {
        self.node(Node::Primary, |this| {
            let lexeme = this.current().lexeme().to_string();
            let value = match this.current().kind() {
                TokenKind::Number => number_value(&lexeme),
                TokenKind::StringLiteral => Value::String(lexeme),
                TokenKind::CharLiteral => Value::Char(lexeme.chars().next().unwrap_or('\0')),
                TokenKind::Keyword(Keyword::True) => Value::Bool(true),
                TokenKind::Keyword(Keyword::False) => Value::Bool(false),
                TokenKind::Keyword(Keyword::Null) => Value::Null,
                TokenKind::Identifier if this.should_execute() => this.read_variable(&lexeme),
                TokenKind::Identifier => Value::Null,
                TokenKind::LeftParen => {
                    this.advance();
                    let value = this.expression();
                    this.consume(TokenKind::RightParen, "Expect ')' after expression.");
                    return value;
                }
                _ => {
                    this.error("Expect expression.");
                    return Value::Null;
                }
            };
            this.advance();
            value
        })
    }

    /// Increments or decrements a variable, returning its old and new values
    pub(super) fn step_variable(&mut self, name: &str, operator: TokenKind) -> (Value, Value) {
        if !self.should_execute() {
            return (Value::Null, Value::Null);
        }
        let old = self.read_variable(name);
        let new = self.lenient(apply_operator(operator, old.clone(), Value::Int(1)));
        self.write_variable(name, new.clone());
        (old, new)
    }
}
