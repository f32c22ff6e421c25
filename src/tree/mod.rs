mod visit;

pub use visit::{Accept, Visit};

use crate::common::*;
use crate::error::{EResult, EvalError};
use crate::roll::{EvalContext, RollArgument, Roller};
use crate::value::Value;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub trait Evaluate {
    /// Evaluates the subtree, records the value on this node and returns it.
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value>;

    /// The value recorded by the last successful [`Evaluate::evaluate`].
    fn result(&self) -> Option<&Value>;

    /// Direct children, in evaluation order.
    fn children(&self) -> Vec<&Node>;
}

/// A node of an evaluation tree. Trees are built by the host (usually from a
/// parser) and evaluated in place.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(Evaluate, Accept)]
pub enum Node {
    Value(ValueNode),
    Binary(BinaryNode),
    Unary(UnaryNode),
    Group(GroupNode),
    Assignment(AssignmentNode),
    Resolve(ResolveNode),
    Dice(DiceNode),
    Instruction(InstructionNode),
    TopLevel(TopLevelNode),
}

impl Node {
    pub fn value(value: Value) -> Self {
        ValueNode { value }.into()
    }

    pub fn int(x: Int) -> Self {
        Self::value(Value::int(x))
    }

    pub fn real(x: Float) -> Self {
        Self::value(Value::real(x))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::value(Value::text(s))
    }

    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        BinaryNode {
            op,
            left: Box::new(left),
            right: Box::new(right),
            result: None,
        }
        .into()
    }

    /// Like [`Node::binary`] with the operator given as its token.
    pub fn binary_op(token: &str, left: Node, right: Node) -> EResult<Self> {
        Ok(Self::binary(token.parse()?, left, right))
    }

    pub fn unary(op: UnaryOperator, operand: Node) -> Self {
        UnaryNode {
            op,
            operand: Box::new(operand),
            result: None,
        }
        .into()
    }

    pub fn unary_op(token: &str, operand: Node) -> EResult<Self> {
        Ok(Self::unary(token.parse()?, operand))
    }

    pub fn group(kind: GroupingKind, child: Node) -> Self {
        GroupNode {
            kind,
            child: Box::new(child),
            result: None,
        }
        .into()
    }

    pub fn assign(scope: Scope, name: impl Into<String>, value: Node) -> Self {
        AssignmentNode {
            scope,
            name: name.into(),
            value: Box::new(value),
            result: None,
        }
        .into()
    }

    pub fn resolve(scope: Scope, name: impl Into<String>) -> Self {
        ResolveNode {
            scope,
            name: name.into(),
            result: None,
        }
        .into()
    }

    pub fn dice(
        pattern: impl Into<String>,
        count: Node,
        sides: Node,
        args: Vec<RollArgument>,
        text: impl Into<String>,
    ) -> Self {
        DiceNode {
            pattern: pattern.into(),
            count: Box::new(count),
            sides: Box::new(sides),
            args,
            text: text.into(),
            result: None,
        }
        .into()
    }

    pub fn instruction(name: impl Into<String>, args: Vec<String>) -> Self {
        InstructionNode {
            name: name.into(),
            args,
        }
        .into()
    }

    pub fn top_level(text: impl Into<String>, child: Node) -> Self {
        TopLevelNode {
            text: text.into(),
            child: Box::new(child),
        }
        .into()
    }

    /// Every node of the subtree, children before their parent.
    pub fn post_order(&self) -> Vec<&Node> {
        fn go<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
            for child in node.children() {
                go(child, out);
            }
            out.push(node);
        }

        let mut ret = Vec::new();
        go(self, &mut ret);
        ret
    }

    /// Calls `v` on each node of the subtree in post-order.
    pub fn walk<V: Visit + ?Sized>(&self, v: &mut V) {
        for node in self.post_order() {
            node.accept(v);
        }
    }
}

fn record(slot: &mut Option<Value>, value: EResult<Value>) -> EResult<Value> {
    *slot = value.as_ref().ok().cloned();
    value
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    value: Value,
}

impl Evaluate for ValueNode {
    fn evaluate<R: Roller>(&mut self, _ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        Ok(self.value.clone())
    }

    fn result(&self) -> Option<&Value> {
        Some(&self.value)
    }

    fn children(&self) -> Vec<&Node> {
        vec![]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryNode {
    op: BinaryOperator,
    left: Box<Node>,
    right: Box<Node>,
    result: Option<Value>,
}

impl BinaryNode {
    pub fn op(&self) -> BinaryOperator {
        self.op
    }
}

impl Evaluate for BinaryNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let value = self.left.evaluate(ctx).and_then(|left| {
            let right = self.right.evaluate(ctx)?;
            left.binary(self.op, &right)
        });
        record(&mut self.result, value)
    }

    fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    fn children(&self) -> Vec<&Node> {
        vec![&*self.left, &*self.right]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryNode {
    op: UnaryOperator,
    operand: Box<Node>,
    result: Option<Value>,
}

impl UnaryNode {
    pub fn op(&self) -> UnaryOperator {
        self.op
    }
}

impl Evaluate for UnaryNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let value = self
            .operand
            .evaluate(ctx)
            .and_then(|value| value.unary(self.op));
        record(&mut self.result, value)
    }

    fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    fn children(&self) -> Vec<&Node> {
        vec![&*self.operand]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    kind: GroupingKind,
    child: Box<Node>,
    result: Option<Value>,
}

impl GroupNode {
    pub fn kind(&self) -> GroupingKind {
        self.kind
    }
}

impl Evaluate for GroupNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let value = self.child.evaluate(ctx);
        record(&mut self.result, value)
    }

    fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    fn children(&self) -> Vec<&Node> {
        vec![&*self.child]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    scope: Scope,
    name: String,
    value: Box<Node>,
    result: Option<Value>,
}

impl AssignmentNode {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name with its scope prefix, e.g. `$x`.
    pub fn variable_name(&self) -> String {
        self.scope.variable_name(&self.name)
    }
}

impl Evaluate for AssignmentNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let value = self.value.evaluate(ctx).map(|value| {
            ctx.assign(self.scope, &self.name, value.clone());
            value
        });
        record(&mut self.result, value)
    }

    fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    fn children(&self) -> Vec<&Node> {
        vec![&*self.value]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveNode {
    scope: Scope,
    name: String,
    result: Option<Value>,
}

impl ResolveNode {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable_name(&self) -> String {
        self.scope.variable_name(&self.name)
    }
}

impl Evaluate for ResolveNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let value = ctx.resolve(self.scope, &self.name);
        record(&mut self.result, value)
    }

    fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    fn children(&self) -> Vec<&Node> {
        vec![]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiceNode {
    pattern: String,
    count: Box<Node>,
    sides: Box<Node>,
    args: Vec<RollArgument>,
    text: String,
    result: Option<Value>,
}

impl DiceNode {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn args(&self) -> &[RollArgument] {
        &self.args
    }

    /// The dice as written in source, e.g. `4d6kh3`.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn roll<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let count = self.count.evaluate(ctx)?;
        let count = count.as_int().ok_or_else(|| {
            EvalError::invalid_dice(format!("number of dice must be a number, not {}", count.value_type()))
        })?;
        let sides = self.sides.evaluate(ctx)?;
        let sides = sides.as_int().ok_or_else(|| {
            EvalError::invalid_dice(format!("number of sides must be a number, not {}", sides.value_type()))
        })?;
        for arg in &mut self.args {
            arg.evaluate(ctx)?;
        }
        ctx.roll_dice(&self.pattern, count, sides, &self.args)
    }
}

impl Evaluate for DiceNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let value = self.roll(ctx);
        record(&mut self.result, value)
    }

    fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    fn children(&self) -> Vec<&Node> {
        let mut ret: Vec<&Node> = vec![&*self.count, &*self.sides];
        ret.extend(self.args.iter().filter_map(RollArgument::operand));
        ret
    }
}

/// A directive for whoever formats the results, such as `show` or `hide`.
/// Evaluating it does nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionNode {
    name: String,
    args: Vec<String>,
}

impl InstructionNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Evaluate for InstructionNode {
    fn evaluate<R: Roller>(&mut self, _ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        Ok(Value::UNDEFINED)
    }

    fn result(&self) -> Option<&Value> {
        None
    }

    fn children(&self) -> Vec<&Node> {
        vec![]
    }
}

/// One statement together with the source text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelNode {
    text: String,
    child: Box<Node>,
}

impl TopLevelNode {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn child(&self) -> &Node {
        &self.child
    }
}

impl Evaluate for TopLevelNode {
    fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        tracing::debug!(statement = %self.text, "evaluating statement");
        ctx.reset_rolls();
        self.child.evaluate(ctx)
    }

    fn result(&self) -> Option<&Value> {
        self.child.result()
    }

    fn children(&self) -> Vec<&Node> {
        vec![&*self.child]
    }
}
