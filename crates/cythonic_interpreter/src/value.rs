//! Runtime values

use cythonic_tokens::keyword::Keyword;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Not, Rem, Sub};
use strum::IntoStaticStr;
use thiserror::Error;

/// A value produced by evaluating an expression
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    Char(char),
    Void,
    Null,
}

/// A value that takes part in arithmetic. Chars and bools are promoted to ints.
#[derive(Debug, Copy, Clone)]
enum Number {
    Int(i64),
    Double(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Double(d) => d,
        }
    }
}

impl Value {
    /// The name of this value's type
    pub fn type_name(&self) -> &'static str {
        self.into()
    }

    /// The value a declaration of the given type starts with. Untyped declarations are null.
    pub fn default_for(ty: Option<Keyword>) -> Value {
        match ty {
            Some(Keyword::Int) => Value::Int(0),
            Some(Keyword::Double) => Value::Double(0.0),
            Some(Keyword::Bool) => Value::Bool(false),
            Some(Keyword::Char) => Value::Char('\0'),
            Some(Keyword::Str) => Value::String(String::new()),
            Some(Keyword::Void) => Value::Void,
            _ => Value::Null,
        }
    }

    /// Whether this value counts as true in a condition
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Double(d) => *d != 0.0,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Char(c) => *c != '\0',
            Value::Void | Value::Null => false,
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Double(d) => Some(Number::Double(*d)),
            Value::Bool(b) => Some(Number::Int(*b as i64)),
            Value::Char(c) => Some(Number::Int(*c as i64)),
            _ => None,
        }
    }

    /// Equality as the `==` operator sees it. Numbers compare by value regardless of type.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Void | Value::Null, Value::Void | Value::Null) => true,
            (l, r) => match (l.as_number(), r.as_number()) {
                (Some(Number::Int(l)), Some(Number::Int(r))) => l == r,
                (Some(l), Some(r)) => l.as_f64() == r.as_f64(),
                _ => false,
            },
        }
    }

    /// Orders two values for the relational operators
    pub fn compare(&self, other: &Value) -> Result<Ordering, ValueError> {
        match (self, other) {
            (Value::String(l), Value::String(r)) => Ok(l.cmp(r)),
            (l, r) => match (l.as_number(), r.as_number()) {
                (Some(Number::Int(l)), Some(Number::Int(r))) => Ok(l.cmp(&r)),
                (Some(l), Some(r)) => l
                    .as_f64()
                    .partial_cmp(&r.as_f64())
                    .ok_or(ValueError::Unordered),
                _ => Err(self.illegal_binary("compare", other)),
            },
        }
    }

    /// Converts this value to the given type
    pub fn cast(&self, ty: Keyword) -> Result<Value, ValueError> {
        let cast = match (ty, self) {
            (Keyword::Str, v) => Value::String(v.to_string()),
            (Keyword::Bool, v) => Value::Bool(v.is_truthy()),
            (Keyword::Double, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| self.illegal_cast(ty))?,
            (Keyword::Int, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.illegal_cast(ty))?,
            (Keyword::Double, v) => Value::Double(
                v.as_number()
                    .ok_or_else(|| self.illegal_cast(ty))?
                    .as_f64(),
            ),
            (Keyword::Int, v) => match v.as_number().ok_or_else(|| self.illegal_cast(ty))? {
                Number::Int(i) => Value::Int(i),
                Number::Double(d) => Value::Int(d as i64),
            },
            (Keyword::Char, Value::Char(c)) => Value::Char(*c),
            (Keyword::Char, Value::Int(i)) => u32::try_from(*i)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| self.illegal_cast(ty))?,
            _ => return Err(self.illegal_cast(ty)),
        };
        Ok(cast)
    }

    fn arithmetic(
        self,
        rhs: Value,
        op: &'static str,
        int: fn(i64, i64) -> i64,
        double: fn(f64, f64) -> f64,
    ) -> Result<Value, ValueError> {
        match (self.as_number(), rhs.as_number()) {
            (Some(Number::Int(l)), Some(Number::Int(r))) => Ok(Value::Int(int(l, r))),
            (Some(l), Some(r)) => Ok(Value::Double(double(l.as_f64(), r.as_f64()))),
            _ => Err(self.illegal_binary(op, &rhs)),
        }
    }

    fn is_zero(&self) -> bool {
        match self.as_number() {
            Some(Number::Int(i)) => i == 0,
            Some(Number::Double(d)) => d == 0.0,
            None => false,
        }
    }

    fn illegal_binary(&self, op: &'static str, rhs: &Value) -> ValueError {
        ValueError::IllegalBinaryOperation {
            op,
            lhs: self.type_name(),
            rhs: rhs.type_name(),
        }
    }

    fn illegal_cast(&self, to: Keyword) -> ValueError {
        ValueError::IllegalCast {
            from: self.type_name(),
            to,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d:.6}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Char(c) => write!(f, "{c}"),
            Value::Void | Value::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl Neg for Value {
    type Output = Result<Value, ValueError>;

    fn neg(self) -> Self::Output {
        match self.as_number() {
            Some(Number::Int(i)) => Ok(Value::Int(i.wrapping_neg())),
            Some(Number::Double(d)) => Ok(Value::Double(-d)),
            None => Err(ValueError::IllegalUnaryOperation {
                op: "negate",
                operand: self.type_name(),
            }),
        }
    }
}

impl Not for Value {
    type Output = Value;

    fn not(self) -> Self::Output {
        Value::Bool(!self.is_truthy())
    }
}

impl Add for Value {
    type Output = Result<Value, ValueError>;

    fn add(self, rhs: Self) -> Self::Output {
        match (&self, &rhs) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{self}{rhs}")))
            }
            _ => self.arithmetic(rhs, "add", i64::wrapping_add, |l, r| l + r),
        }
    }
}

impl Sub for Value {
    type Output = Result<Value, ValueError>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.arithmetic(rhs, "subtract", i64::wrapping_sub, |l, r| l - r)
    }
}

impl Mul for Value {
    type Output = Result<Value, ValueError>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.arithmetic(rhs, "multiply", i64::wrapping_mul, |l, r| l * r)
    }
}

impl Div for Value {
    type Output = Result<Value, ValueError>;

    fn div(self, rhs: Self) -> Self::Output {
        if rhs.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        self.arithmetic(rhs, "divide", i64::wrapping_div, |l, r| l / r)
    }
}

impl Rem for Value {
    type Output = Result<Value, ValueError>;

    fn rem(self, rhs: Self) -> Self::Output {
        if rhs.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        self.arithmetic(rhs, "modulo", i64::wrapping_rem, |l, r| l % r)
    }
}

/// An operation on values that has no result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("can not {op} {lhs} and {rhs}")]
    IllegalBinaryOperation {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("can not {op} {operand}")]
    IllegalUnaryOperation {
        op: &'static str,
        operand: &'static str,
    },
    #[error("can not cast {from} to {to}")]
    IllegalCast { from: &'static str, to: Keyword },
    #[error("values are unordered")]
    Unordered,
}
