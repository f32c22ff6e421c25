use crate::common::*;
use crate::error::{EResult, EvalError, Operation, Side};
use crate::roll::RollSet;
use std::borrow::Cow;
use std::fmt;

/// The dynamic type of a [`Value`]. Ordered by promotion: `Integer < Real < Text`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ValueType {
    Integer,
    Real,
    Text,
    Undefined,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Text => "text",
            Self::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Integer(Int),
    Real(Float),
    Text(String),
    Undefined,
}

/// The result of evaluating an expression, together with the dice that
/// contributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    payload: Payload,
    rolls: RollSet,
}

impl Value {
    pub const UNDEFINED: Value = Value {
        payload: Payload::Undefined,
        rolls: RollSet::no_rolls(),
    };

    pub const fn int(x: Int) -> Self {
        Self {
            payload: Payload::Integer(x),
            rolls: RollSet::no_rolls(),
        }
    }

    pub const fn real(x: Float) -> Self {
        Self {
            payload: Payload::Real(x),
            rolls: RollSet::no_rolls(),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(s.into()),
            rolls: RollSet::no_rolls(),
        }
    }

    /// Replaces the attached rolls.
    pub fn with_rolls(self, rolls: RollSet) -> Self {
        Self { rolls, ..self }
    }

    pub fn value_type(&self) -> ValueType {
        match self.payload {
            Payload::Integer(_) => ValueType::Integer,
            Payload::Real(_) => ValueType::Real,
            Payload::Text(_) => ValueType::Text,
            Payload::Undefined => ValueType::Undefined,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.payload, Payload::Undefined)
    }

    pub fn has_numeric_representation(&self) -> bool {
        self.number().is_some()
    }

    /// Integer view of the value. Reals and numeric text are truncated toward zero.
    pub fn as_int(&self) -> Option<Int> {
        self.number().map(Number::as_int)
    }

    pub fn as_float(&self) -> Option<Float> {
        self.number().map(Number::as_float)
    }

    /// Canonical text form; `None` only for undefined.
    pub fn text_form(&self) -> Option<Cow<'_, str>> {
        match &self.payload {
            Payload::Integer(x) => Some(Cow::Owned(x.to_string())),
            Payload::Real(x) => Some(Cow::Owned(format!("{:?}", x))),
            Payload::Text(s) => Some(Cow::Borrowed(s)),
            Payload::Undefined => None,
        }
    }

    pub fn rolls(&self) -> &RollSet {
        &self.rolls
    }

    pub fn has_rolls(&self) -> bool {
        self.rolls.number_of_rolls() > 0
    }

    fn number(&self) -> Option<Number> {
        match &self.payload {
            Payload::Integer(x) => Some(Number::Int(*x)),
            Payload::Real(x) => Some(Number::Float(*x)),
            Payload::Text(s) => s
                .trim()
                .parse::<Float>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Number::Float),
            Payload::Undefined => None,
        }
    }

    /// Applies a binary operator, promoting operand types as needed.
    pub fn binary(&self, op: BinaryOperator, rhs: &Value) -> EResult<Value> {
        let operation = op.operation();
        if self.is_undefined() {
            return Err(EvalError::UndefinedOperand {
                op: operation,
                side: Side::Left,
            });
        }
        if rhs.is_undefined() {
            return Err(EvalError::UndefinedOperand {
                op: operation,
                side: Side::Right,
            });
        }

        let value = match op {
            BinaryOperator::Add => self.add(rhs),
            BinaryOperator::Sub => self.sub(rhs),
            BinaryOperator::Mul => self.mul(rhs),
            BinaryOperator::Div => self.div(rhs),
        }?;
        Ok(value.with_rolls(RollSet::concat(&self.rolls, &rhs.rolls)))
    }

    pub fn unary(&self, op: UnaryOperator) -> EResult<Value> {
        match op {
            UnaryOperator::Neg => self.negate(),
        }
    }

    pub fn negate(&self) -> EResult<Value> {
        let value = match &self.payload {
            Payload::Integer(x) => Value::int(x.wrapping_neg()),
            Payload::Real(x) => Value::real(-x),
            Payload::Text(_) => {
                return Err(EvalError::TypeMismatch {
                    op: Operation::Negation,
                    left: ValueType::Text,
                    right: None,
                })
            }
            Payload::Undefined => {
                return Err(EvalError::UndefinedOperand {
                    op: Operation::Negation,
                    side: Side::Operand,
                })
            }
        };
        Ok(value.with_rolls(self.rolls.clone()))
    }

    fn add(&self, rhs: &Value) -> EResult<Value> {
        match (&self.payload, &rhs.payload) {
            (Payload::Text(_), _) | (_, Payload::Text(_)) => {
                let mut s = self.text_form().unwrap_or_default().into_owned();
                s.push_str(&rhs.text_form().unwrap_or_default());
                Ok(Value::text(s))
            }
            _ => Ok(self.numbers(rhs, Operation::Addition)?.map(|l, r| l + r)),
        }
    }

    fn sub(&self, rhs: &Value) -> EResult<Value> {
        match (&self.payload, &rhs.payload) {
            (Payload::Text(l), Payload::Text(r)) => Ok(Value::text(l.replacen(r.as_str(), "", 1))),
            (Payload::Text(_), _) | (_, Payload::Text(_)) => Err(EvalError::mismatch(
                Operation::Subtraction,
                self.value_type(),
                rhs.value_type(),
            )),
            _ => Ok(self.numbers(rhs, Operation::Subtraction)?.map(|l, r| l - r)),
        }
    }

    fn mul(&self, rhs: &Value) -> EResult<Value> {
        match (&self.payload, &rhs.payload) {
            (Payload::Text(s), Payload::Integer(n)) | (Payload::Integer(n), Payload::Text(s)) => {
                repeat(s, *n).map(Value::text)
            }
            (Payload::Text(_), _) | (_, Payload::Text(_)) => Err(EvalError::mismatch(
                Operation::Multiplication,
                self.value_type(),
                rhs.value_type(),
            )),
            _ => Ok(self.numbers(rhs, Operation::Multiplication)?.map(|l, r| l * r)),
        }
    }

    fn div(&self, rhs: &Value) -> EResult<Value> {
        match (&self.payload, &rhs.payload) {
            (Payload::Text(_), _) | (_, Payload::Text(_)) => Err(EvalError::mismatch(
                Operation::Division,
                self.value_type(),
                rhs.value_type(),
            )),
            (Payload::Integer(_), Payload::Integer(0)) => Err(EvalError::ZeroDivision),
            _ => Ok(self.numbers(rhs, Operation::Division)?.map(|l, r| l / r)),
        }
    }

    fn numbers(&self, rhs: &Value, op: Operation) -> EResult<NumberPair> {
        match (self.number(), rhs.number()) {
            (Some(l), Some(r)) => Ok(NumberPair(l, r)),
            _ => Err(EvalError::mismatch(op, self.value_type(), rhs.value_type())),
        }
    }
}

/// Longest text, in bytes, that repetition may produce.
pub const MAX_TEXT_LEN: usize = 1 << 30;

/// `s` repeated `times` times; empty for `times <= 0`. Fails when the result
/// is too long or cannot be allocated.
fn repeat(s: &str, times: Int) -> EResult<String> {
    let n = usize::try_from(times).unwrap_or(0);
    if n == 0 || s.is_empty() {
        return Ok(String::new());
    }
    let too_long = || EvalError::TextTooLong { len: s.len(), times };
    let len = s
        .len()
        .checked_mul(n)
        .filter(|&len| len <= MAX_TEXT_LEN)
        .ok_or_else(too_long)?;
    let mut out = String::new();
    out.try_reserve_exact(len).map_err(|_| too_long())?;
    for _ in 0..n {
        out.push_str(s);
    }
    Ok(out)
}

impl Default for Value {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl From<Int> for Value {
    fn from(x: Int) -> Self {
        Self::int(x)
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Self::real(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text_form() {
            Some(s) => f.write_str(&s),
            None => f.write_str("undefined"),
        }
    }
}

struct NumberPair(Number, Number);

impl NumberPair {
    fn map(self, f: impl FnOnce(Number, Number) -> Number) -> Value {
        f(self.0, self.1).into()
    }
}

#[derive(Debug, Copy, Clone)]
enum Number {
    Int(Int),
    Float(Float),
}

impl Number {
    fn as_int(self) -> Int {
        match self {
            Self::Int(x) => x,
            Self::Float(x) => x as Int,
        }
    }

    fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }
}

macro_rules! num_impl_bin_op {
    ($Name:ident, $fn_name:ident, $int_fn:ident, $op:tt) => {
        impl std::ops::$Name for Number {
            type Output = Self;

            fn $fn_name(self, rhs: Self) -> Self::Output {
                match (self, rhs) {
                    (Self::Int(x), Self::Int(y)) => Self::Int(x.$int_fn(y)),
                    (x, y) => Self::Float(x.as_float() $op y.as_float()),
                }
            }
        }
    };
}

num_impl_bin_op!(Add, add, wrapping_add, +);
num_impl_bin_op!(Sub, sub, wrapping_sub, -);
num_impl_bin_op!(Mul, mul, wrapping_mul, *);
// Integer division by zero is rejected before we get here.
num_impl_bin_op!(Div, div, wrapping_div, /);

impl From<Number> for Value {
    fn from(x: Number) -> Self {
        match x {
            Number::Int(x) => Value::int(x),
            Number::Float(x) => Value::real(x),
        }
    }
}
