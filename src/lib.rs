//! Evaluation engine for dice expressions such as `4d6kh3 + $bonus`.
//!
//! Hosts build a [`tree::Node`] tree (typically from a parser), evaluate it
//! against an [`EvalContext`] that borrows their [`SymbolTable`] and
//! [`DiceRollers`], and optionally replay the evaluated tree into a
//! [`ResultSink`] to render what happened.

pub mod common;
pub mod error;
pub mod expression;
pub mod roll;
pub mod sink;
pub mod symbols;
pub mod tree;
pub mod value;

pub use error::{EResult, EvalError};
pub use expression::DiceExpression;
pub use roll::{DiceRollers, EvalConfig, EvalContext, UnsetSymbolPolicy};
pub use sink::{ResultDetails, ResultSink};
pub use symbols::{DefaultSymbolTable, SymbolTable};
pub use tree::{Evaluate, Node};
pub use value::{Value, ValueType};

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::common::*;
    use crate::roll::{DiceRollers, EvalConfig, EvalContext};
    use crate::symbols::DefaultSymbolTable;
    use crate::tree::Node;
    use rand::{rngs::StdRng, SeedableRng};

    pub(crate) use crate::roll::roller::StepRoller;

    pub(crate) fn nz(x: UInt) -> NonZeroUInt {
        NonZeroUInt::new(x).unwrap()
    }

    fn leaked() -> (&'static mut DefaultSymbolTable, &'static DiceRollers) {
        (
            Box::leak(Box::new(DefaultSymbolTable::new())),
            &*Box::leak(Box::new(DiceRollers::standard())),
        )
    }

    /// A context whose dice count up from `initial` by `step`.
    pub(crate) fn step_context(initial: UInt, step: UInt) -> EvalContext<'static, StepRoller> {
        let (symbols, rollers) = leaked();
        EvalContext::new(
            EvalConfig::default(),
            symbols,
            rollers,
            StepRoller::new(nz(initial), step),
        )
    }

    /// Dice roll 1, 2, 3, ... wrapped into their number of sides.
    pub(crate) fn test_context() -> EvalContext<'static, StepRoller> {
        step_context(1, 1)
    }

    pub(crate) fn seeded_context(seed: u64) -> EvalContext<'static, StdRng> {
        let (symbols, rollers) = leaked();
        EvalContext::new(
            EvalConfig::default(),
            symbols,
            rollers,
            StdRng::seed_from_u64(seed),
        )
    }

    /// `NdS` with the standard roller and no arguments.
    pub(crate) fn dice(count: Int, sides: Int) -> Node {
        Node::dice(
            "d",
            Node::int(count),
            Node::int(sides),
            vec![],
            format!("{}d{}", count, sides),
        )
    }
}
