use crate::common::NonEmpty;
use crate::error::EResult;
use crate::roll::{EvalContext, Roller};
use crate::sink::{ResultDetails, ResultSink};
use crate::tree::{Evaluate, Node};
use crate::value::Value;

/// A parsed input line: one or more top-level statements evaluated in order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiceExpression {
    statements: NonEmpty<Node>,
}

impl DiceExpression {
    pub fn new(statements: NonEmpty<Node>) -> Self {
        Self { statements }
    }

    pub fn single(statement: Node) -> Self {
        Self::new(vec1::vec1![statement])
    }

    /// `None` if `statements` is empty.
    pub fn from_statements(statements: Vec<Node>) -> Option<Self> {
        NonEmpty::try_from_vec(statements).ok().map(Self::new)
    }

    pub fn statements(&self) -> &[Node] {
        &self.statements
    }

    /// Evaluates every statement in order and returns their values. Stops at
    /// the first failing statement; earlier side effects stay in place.
    pub fn execute<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Vec<Value>> {
        self.statements
            .iter_mut()
            .map(|statement| statement.evaluate(ctx))
            .collect()
    }

    /// Reports the last evaluation to `sink` and returns its output.
    pub fn format<S: ResultSink + ?Sized>(&self, sink: &mut S) -> Option<String> {
        ResultDetails::format(self.statements.iter(), sink)
    }
}

impl From<Node> for DiceExpression {
    fn from(statement: Node) -> Self {
        Self::single(statement)
    }
}
