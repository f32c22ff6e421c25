mod markdown;
mod plain;

pub use markdown::MarkdownResultFormatter;
pub use plain::PlainResultFormatter;

use crate::roll::{DieRoll, RollSet};
use crate::tree::{
    AssignmentNode, DiceNode, Evaluate, InstructionNode, Node, ResolveNode, TopLevelNode, Visit,
};
use crate::value::Value;

/// Receives the trace of evaluated statements and renders it.
///
/// For each statement the sink sees `start`, `set_result`, one event per
/// interesting node in post-order, then `end`. Once every statement has been
/// reported, `format` produces the final output.
pub trait ResultSink {
    fn start(&mut self);

    fn set_expression(&mut self, expression: &str);

    /// `None` when the statement produced no value.
    fn set_result(&mut self, result: Option<&Value>);

    fn add_assign_symbol(&mut self, name: &str, value: &Value);

    fn add_resolve_symbol(&mut self, name: &str, value: &Value);

    fn add_prompt_value(&mut self, prompt: &str, value: &Value);

    fn add_roll(&mut self, rolls: &RollSet);

    fn hide_output(&mut self);

    fn show_output(&mut self);

    fn is_output_hidden(&self) -> bool;

    fn end(&mut self);

    fn format(&self) -> Option<String>;
}

/// Walks evaluated trees and reports them to a [`ResultSink`].
pub struct ResultDetails;

impl ResultDetails {
    pub fn format<'n, S>(roots: impl IntoIterator<Item = &'n Node>, sink: &mut S) -> Option<String>
    where
        S: ResultSink + ?Sized,
    {
        for root in roots {
            Self::format_root(root, sink);
        }
        sink.format()
    }

    fn format_root<S: ResultSink + ?Sized>(root: &Node, sink: &mut S) {
        sink.start();
        sink.set_result(root.result());
        root.walk(&mut Events { sink: &mut *sink });
        sink.end();
    }
}

struct Events<'s, S: ?Sized> {
    sink: &'s mut S,
}

// Nodes that never produced a value (the statement failed before reaching
// them) are not reported.
impl<S: ResultSink + ?Sized> Visit for Events<'_, S> {
    fn visit_assignment(&mut self, node: &AssignmentNode) {
        if let Some(value) = node.result() {
            self.sink.add_assign_symbol(&node.variable_name(), value);
        }
    }

    fn visit_resolve(&mut self, node: &ResolveNode) {
        if let Some(value) = node.result() {
            self.sink.add_resolve_symbol(&node.variable_name(), value);
        }
    }

    fn visit_dice(&mut self, node: &DiceNode) {
        if let Some(value) = node.result() {
            self.sink.add_roll(value.rolls());
        }
    }

    fn visit_instruction(&mut self, node: &InstructionNode) {
        if node.name().eq_ignore_ascii_case("show") {
            self.sink.show_output();
        } else if node.name().eq_ignore_ascii_case("hide") {
            self.sink.hide_output();
        }
    }

    fn visit_top_level(&mut self, node: &TopLevelNode) {
        self.sink.set_expression(node.text());
    }
}

/// The dice of a set joined by the set's aggregate separator.
pub(crate) fn join_dice(rolls: &RollSet, mut fmt_die: impl FnMut(&DieRoll) -> String) -> String {
    rolls
        .rolls()
        .iter()
        .map(|die| fmt_die(die))
        .collect::<Vec<_>>()
        .join(rolls.aggregate().separator())
}
