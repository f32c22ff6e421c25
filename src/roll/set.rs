use super::die::DieRoll;
use crate::common::Int;
use crate::value::Value;
use std::borrow::Cow;

/// How the total of a [`RollSet`] is derived from its dice.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateMethod {
    /// Number of non-dropped dice.
    Count,
    /// Sum of kept dice.
    Sum,
    CountSuccess,
    CountFailure,
    SumSuccess,
    SumFailure,
    /// A precomputed result carried alongside the dice.
    Other(Box<Value>),
}

impl AggregateMethod {
    /// Separator used when listing the dice of a set aggregated this way.
    pub fn separator(&self) -> &'static str {
        match self {
            Self::Sum | Self::SumSuccess | Self::SumFailure => " + ",
            Self::Count | Self::CountSuccess | Self::CountFailure | Self::Other(_) => ", ",
        }
    }

    pub fn perform(&self, rolls: &[DieRoll]) -> Value {
        fn count<'a>(it: impl Iterator<Item = &'a DieRoll>) -> Value {
            Value::int(it.count() as Int)
        }

        fn sum<'a>(it: impl Iterator<Item = &'a DieRoll>) -> Value {
            Value::int(it.fold(0, |acc: Int, r| acc.wrapping_add(r.value())))
        }

        let kept = || rolls.iter().filter(|r| r.is_kept());
        match self {
            Self::Count => count(kept()),
            Self::Sum => sum(kept()),
            Self::CountSuccess => count(kept().filter(|r| r.is_success())),
            Self::CountFailure => count(kept().filter(|r| r.is_failure())),
            Self::SumSuccess => sum(kept().filter(|r| r.is_success())),
            Self::SumFailure => sum(kept().filter(|r| r.is_failure())),
            Self::Other(value) => (**value).clone(),
        }
    }
}

/// The dice rolled for one dice-roll node, or the merge of several.
#[derive(Debug, Clone, PartialEq)]
pub struct RollSet {
    rolls: Vec<DieRoll>,
    sides: Int,
    name: Cow<'static, str>,
    aggregate: AggregateMethod,
    successes: usize,
    failures: usize,
    criticals: usize,
    fumbles: usize,
}

impl RollSet {
    /// The set attached to values that did not come from dice.
    pub const fn no_rolls() -> Self {
        Self {
            rolls: Vec::new(),
            sides: 0,
            name: Cow::Borrowed("none"),
            aggregate: AggregateMethod::Sum,
            successes: 0,
            failures: 0,
            criticals: 0,
            fumbles: 0,
        }
    }

    pub fn new(
        rolls: Vec<DieRoll>,
        sides: Int,
        name: impl Into<Cow<'static, str>>,
        aggregate: AggregateMethod,
    ) -> Self {
        let tally = |f: fn(&DieRoll) -> bool| rolls.iter().filter(|r| f(r)).count();
        let successes = tally(DieRoll::is_success);
        let failures = tally(DieRoll::is_failure);
        let criticals = tally(DieRoll::is_critical);
        let fumbles = tally(DieRoll::is_fumble);

        Self {
            rolls,
            sides,
            name: name.into(),
            aggregate,
            successes,
            failures,
            criticals,
            fumbles,
        }
    }

    /// Combines the dice behind both operands of a binary operation.
    pub fn concat(left: &RollSet, right: &RollSet) -> RollSet {
        if right.rolls.is_empty() {
            return left.clone();
        }
        if left.rolls.is_empty() {
            return right.clone();
        }

        let rolls = left.rolls.iter().chain(&right.rolls).cloned().collect();
        let sides = if left.sides == right.sides { left.sides } else { 0 };
        let name = if left.name == right.name {
            left.name.clone()
        } else {
            Cow::Borrowed("mixed")
        };
        let aggregate = if left.aggregate == right.aggregate {
            left.aggregate.clone()
        } else {
            AggregateMethod::Sum
        };
        Self::new(rolls, sides, name, aggregate)
    }

    pub fn with_aggregate(&self, aggregate: AggregateMethod) -> Self {
        Self {
            aggregate,
            ..self.clone()
        }
    }

    pub fn with_rolls(&self, rolls: Vec<DieRoll>) -> Self {
        Self::new(rolls, self.sides, self.name.clone(), self.aggregate.clone())
    }

    /// Applies the aggregate method to the current dice.
    pub fn result(&self) -> Value {
        self.aggregate.perform(&self.rolls)
    }

    pub fn rolls(&self) -> &[DieRoll] {
        &self.rolls
    }

    pub fn kept_rolls(&self) -> impl Iterator<Item = &DieRoll> {
        self.rolls.iter().filter(|r| r.is_kept())
    }

    pub fn number_of_rolls(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    pub fn sides(&self) -> Int {
        self.sides
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aggregate(&self) -> &AggregateMethod {
        &self.aggregate
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn criticals(&self) -> usize {
        self.criticals
    }

    pub fn fumbles(&self) -> usize {
        self.fumbles
    }
}

impl Default for RollSet {
    fn default() -> Self {
        Self::no_rolls()
    }
}
