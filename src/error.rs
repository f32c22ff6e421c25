use crate::common::Int;
use crate::value::ValueType;
use std::fmt;
use thiserror::Error;

pub type EResult<T> = Result<T, EvalError>;

/// Every way evaluating a statement can fail. None of these are recoverable
/// inside the engine; the current top-level statement is abandoned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{side} of {op} is undefined")]
    UndefinedOperand { op: Operation, side: Side },
    #[error("unsupported operand type(s) for {op}: {}", fmt_types(.left, .right))]
    TypeMismatch {
        op: Operation,
        left: ValueType,
        right: Option<ValueType>,
    },
    #[error("unknown operator {0:?}")]
    UnknownOperator(String),
    #[error("{argument} requires a numeric argument")]
    MissingArgument { argument: &'static str },
    #[error("no dice roller registered for pattern {0:?}")]
    UnregisteredRoller(String),
    #[error("unknown scope prefix {0:?}")]
    UnknownScope(String),
    #[error("{variable} is not defined")]
    UnknownSymbol { variable: String },
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("{0}")]
    InvalidDice(String),
    #[error("too many dice rolled")]
    TooManyRolls,
    #[error("cannot repeat text of length {len} {times} times")]
    TextTooLong { len: usize, times: Int },
}

impl EvalError {
    pub fn invalid_dice(msg: impl ToString) -> Self {
        Self::InvalidDice(msg.to_string())
    }

    pub(crate) fn mismatch(op: Operation, left: ValueType, right: ValueType) -> Self {
        Self::TypeMismatch {
            op,
            left,
            right: Some(right),
        }
    }
}

fn fmt_types(left: &ValueType, right: &Option<ValueType>) -> String {
    match right {
        Some(right) => format!("{} and {}", left, right),
        None => left.to_string(),
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Negation,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Negation => "negation",
        };
        f.write_str(s)
    }
}

/// Which operand of an [`Operation`] was at fault.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Left,
    Right,
    Operand,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Left => "left hand side",
            Self::Right => "right hand side",
            Self::Operand => "operand",
        };
        f.write_str(s)
    }
}
