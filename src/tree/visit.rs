use super::*;

/// Per-variant callbacks for [`Node::walk`]. Every method defaults to doing
/// nothing so visitors only name the nodes they care about.
pub trait Visit {
    fn visit_value(&mut self, _node: &ValueNode) {}

    fn visit_binary(&mut self, _node: &BinaryNode) {}

    fn visit_unary(&mut self, _node: &UnaryNode) {}

    fn visit_group(&mut self, _node: &GroupNode) {}

    fn visit_assignment(&mut self, _node: &AssignmentNode) {}

    fn visit_resolve(&mut self, _node: &ResolveNode) {}

    fn visit_dice(&mut self, _node: &DiceNode) {}

    fn visit_instruction(&mut self, _node: &InstructionNode) {}

    fn visit_top_level(&mut self, _node: &TopLevelNode) {}
}

#[enum_dispatch::enum_dispatch]
pub trait Accept {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V);
}

impl Accept for ValueNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_value(self)
    }
}

impl Accept for BinaryNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_binary(self)
    }
}

impl Accept for UnaryNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_unary(self)
    }
}

impl Accept for GroupNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_group(self)
    }
}

impl Accept for AssignmentNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_assignment(self)
    }
}

impl Accept for ResolveNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_resolve(self)
    }
}

impl Accept for DiceNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_dice(self)
    }
}

impl Accept for InstructionNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_instruction(self)
    }
}

impl Accept for TopLevelNode {
    fn accept<V: Visit + ?Sized>(&self, v: &mut V) {
        v.visit_top_level(self)
    }
}
