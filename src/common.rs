use crate::error::{EResult, EvalError, Operation};
use std::fmt::{self, Write};
use std::str::FromStr;

pub type Int = i32;
pub type UInt = u32;
pub type NonZeroUInt = std::num::NonZeroU32;

pub type Float = f64;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOperator {
    Neg,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Neg => '-',
        };
        f.write_char(c)
    }
}

impl FromStr for UnaryOperator {
    type Err = EvalError;

    fn from_str(s: &str) -> EResult<Self> {
        match s {
            "-" => Ok(Self::Neg),
            _ => Err(EvalError::UnknownOperator(s.to_owned())),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub(crate) const fn operation(self) -> Operation {
        match self {
            Self::Add => Operation::Addition,
            Self::Sub => Operation::Subtraction,
            Self::Mul => Operation::Multiplication,
            Self::Div => Operation::Division,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}

impl FromStr for BinaryOperator {
    type Err = EvalError;

    fn from_str(s: &str) -> EResult<Self> {
        Ok(match s {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            _ => return Err(EvalError::UnknownOperator(s.to_owned())),
        })
    }
}

/// Comparison used by threshold roll arguments, e.g. the `>=` in `cs>=18`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ComparisonOperator {
    #[default]
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOperator {
    pub fn compare(self, lhs: Int, rhs: Int) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Lt => lhs < rhs,
            Self::Gt => lhs > rhs,
            Self::Le => lhs <= rhs,
            Self::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        };
        f.write_str(s)
    }
}

impl FromStr for ComparisonOperator {
    type Err = EvalError;

    fn from_str(s: &str) -> EResult<Self> {
        Ok(match s {
            "=" => Self::Eq,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::Le,
            ">=" => Self::Ge,
            _ => return Err(EvalError::UnknownOperator(s.to_owned())),
        })
    }
}

/// Variable namespace. Each scope is independent; there is no shadowing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Scope {
    Local,
    Global,
    Property,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Local, Scope::Global, Scope::Property];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
            Self::Property => "property",
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Local => "$",
            Self::Global => "#",
            Self::Property => "@",
        }
    }

    pub fn from_prefix(prefix: &str) -> EResult<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.prefix() == prefix)
            .ok_or_else(|| EvalError::UnknownScope(prefix.to_owned()))
    }

    /// The name as written in source, e.g. `$hp` for a local `hp`.
    pub fn variable_name(self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Local => 0,
            Self::Global => 1,
            Self::Property => 2,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scope {
    type Err = EvalError;

    fn from_str(s: &str) -> EResult<Self> {
        Self::from_prefix(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GroupingKind {
    Paren,
    Brace,
}

impl GroupingKind {
    pub const fn open(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Brace => '{',
        }
    }

    pub const fn close(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Brace => '}',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_names_and_prefixes() {
        assert_eq!(Scope::Local.name(), "local");
        assert_eq!(Scope::Global.name(), "global");
        assert_eq!(Scope::Property.name(), "property");

        assert_eq!(Scope::Local.prefix(), "$");
        assert_eq!(Scope::Global.prefix(), "#");
        assert_eq!(Scope::Property.prefix(), "@");
    }

    #[test]
    fn test_scope_from_prefix() {
        assert_eq!(Scope::from_prefix("$"), Ok(Scope::Local));
        assert_eq!("#".parse::<Scope>(), Ok(Scope::Global));
        assert_eq!("@".parse::<Scope>(), Ok(Scope::Property));
        assert_eq!(
            Scope::from_prefix(":::::!"),
            Err(EvalError::UnknownScope(":::::!".to_owned()))
        );
        assert_eq!(Scope::Global.variable_name("gold"), "#gold");
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!("+".parse::<BinaryOperator>(), Ok(BinaryOperator::Add));
        assert_eq!("/".parse::<BinaryOperator>(), Ok(BinaryOperator::Div));
        assert_eq!(
            "%".parse::<BinaryOperator>(),
            Err(EvalError::UnknownOperator("%".to_owned()))
        );
        assert_eq!("-".parse::<UnaryOperator>(), Ok(UnaryOperator::Neg));
        assert_eq!(
            "+".parse::<UnaryOperator>(),
            Err(EvalError::UnknownOperator("+".to_owned()))
        );
        assert_eq!(">=".parse::<ComparisonOperator>(), Ok(ComparisonOperator::Ge));
        assert!("=>".parse::<ComparisonOperator>().is_err());
    }

    #[test]
    fn test_comparison() {
        use ComparisonOperator::*;
        assert!(Eq.compare(3, 3));
        assert!(Lt.compare(2, 3));
        assert!(!Gt.compare(3, 3));
        assert!(Le.compare(3, 3));
        assert!(Ge.compare(4, 3));
    }
}
