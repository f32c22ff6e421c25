use super::{ctx::EvalContext, die::DieFlag, die::DieRoll, roller::Roller, set::RollSet};
use crate::common::*;
use crate::error::{EResult, EvalError};
use crate::tree::{Evaluate, Node};
use crate::value::Value;
use std::fmt;

/// Kinds of argument a dice roll accepts, e.g. `cs>=18` or `kh3`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArgumentKind {
    Success,
    Failure,
    Critical,
    Fumble,
    Add,
    KeepHighest,
    KeepLowest,
    DropHighest,
    DropLowest,
}

impl ArgumentKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Critical => "critical success",
            Self::Fumble => "critical failure",
            Self::Add => "add",
            Self::KeepHighest => "keep highest",
            Self::KeepLowest => "keep lowest",
            Self::DropHighest => "drop highest",
            Self::DropLowest => "drop lowest",
        }
    }

    /// Whether the argument changes dice one at a time rather than the whole set.
    pub const fn is_per_die(self) -> bool {
        !matches!(
            self,
            Self::KeepHighest | Self::KeepLowest | Self::DropHighest | Self::DropLowest
        )
    }

    const fn threshold(self) -> Option<Threshold> {
        use DieFlag::*;
        Some(match self {
            Self::Success => Threshold {
                flag: Success,
                clears: &[Failure, Fumble],
                default: Target::Sides,
            },
            Self::Failure => Threshold {
                flag: Failure,
                clears: &[Success, Critical],
                default: Target::One,
            },
            Self::Critical => Threshold {
                flag: Critical,
                clears: &[Fumble, Failure],
                default: Target::Sides,
            },
            Self::Fumble => Threshold {
                flag: Fumble,
                clears: &[Success, Critical],
                default: Target::One,
            },
            _ => return None,
        })
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone)]
enum Target {
    One,
    Sides,
}

#[derive(Debug, Copy, Clone)]
struct Threshold {
    flag: DieFlag,
    clears: &'static [DieFlag],
    default: Target,
}

/// A modifier attached to a dice roll. Its operand, if any, is evaluated
/// once per evaluation of the owning dice-roll node.
#[derive(Debug, Clone, PartialEq)]
pub struct RollArgument {
    kind: ArgumentKind,
    operator: ComparisonOperator,
    operand: Option<Box<Node>>,
    value: Value,
}

impl RollArgument {
    pub fn new(kind: ArgumentKind, operator: ComparisonOperator, operand: Option<Node>) -> Self {
        Self {
            kind,
            operator,
            operand: operand.map(Box::new),
            value: Value::UNDEFINED,
        }
    }

    /// Threshold argument with the operator given as source text. An empty
    /// token means `=`.
    pub fn threshold(kind: ArgumentKind, token: &str, operand: Option<Node>) -> EResult<Self> {
        let operator = if token.is_empty() {
            ComparisonOperator::default()
        } else {
            token.parse()?
        };
        Ok(Self::new(kind, operator, operand))
    }

    pub fn success(operator: ComparisonOperator, operand: Option<Node>) -> Self {
        Self::new(ArgumentKind::Success, operator, operand)
    }

    pub fn failure(operator: ComparisonOperator, operand: Option<Node>) -> Self {
        Self::new(ArgumentKind::Failure, operator, operand)
    }

    pub fn critical(operator: ComparisonOperator, operand: Option<Node>) -> Self {
        Self::new(ArgumentKind::Critical, operator, operand)
    }

    pub fn fumble(operator: ComparisonOperator, operand: Option<Node>) -> Self {
        Self::new(ArgumentKind::Fumble, operator, operand)
    }

    pub fn add(operand: Node) -> Self {
        Self::new(ArgumentKind::Add, ComparisonOperator::default(), Some(operand))
    }

    pub fn keep_highest(operand: Node) -> Self {
        Self::new(ArgumentKind::KeepHighest, ComparisonOperator::default(), Some(operand))
    }

    pub fn keep_lowest(operand: Node) -> Self {
        Self::new(ArgumentKind::KeepLowest, ComparisonOperator::default(), Some(operand))
    }

    pub fn drop_highest(operand: Node) -> Self {
        Self::new(ArgumentKind::DropHighest, ComparisonOperator::default(), Some(operand))
    }

    pub fn drop_lowest(operand: Node) -> Self {
        Self::new(ArgumentKind::DropLowest, ComparisonOperator::default(), Some(operand))
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn operand(&self) -> Option<&Node> {
        self.operand.as_deref()
    }

    /// The operand's value from the last evaluation.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn evaluate<R: Roller>(&mut self, ctx: &mut EvalContext<'_, R>) -> EResult<()> {
        if let Some(operand) = &mut self.operand {
            self.value = operand.evaluate(ctx)?;
        }
        Ok(())
    }

    fn numeric_operand(&self) -> EResult<Int> {
        self.value.as_int().ok_or(EvalError::MissingArgument {
            argument: self.kind.name(),
        })
    }

    pub fn apply_to_roll(&self, roll: DieRoll) -> EResult<DieRoll> {
        if let Some(threshold) = self.kind.threshold() {
            let target = match threshold.default {
                Target::One => 1,
                Target::Sides => roll.sides(),
            };
            let target = self.value.as_int().unwrap_or(target);
            if !self.operator.compare(roll.value(), target) {
                return Ok(roll);
            }
            tracing::trace!(
                value = roll.value(),
                flag = %threshold.flag,
                "flagging die"
            );
            return Ok(roll.without_flags(threshold.clears).with_flag(threshold.flag));
        }

        match self.kind {
            ArgumentKind::Add => {
                let n = self.numeric_operand()?;
                Ok(roll.with_value(roll.value().wrapping_add(n)))
            }
            _ => Ok(roll),
        }
    }

    pub fn apply_to_all(&self, rolls: RollSet) -> EResult<RollSet> {
        let (keep, highest) = match self.kind {
            ArgumentKind::KeepHighest => (true, true),
            ArgumentKind::KeepLowest => (true, false),
            ArgumentKind::DropHighest => (false, true),
            ArgumentKind::DropLowest => (false, false),
            _ => return Ok(rolls),
        };

        let n = self.numeric_operand()?;
        let total = rolls.number_of_rolls() as i64;
        let drop_count = if keep { total - n as i64 } else { n as i64 };

        if drop_count >= total {
            return Ok(RollSet::no_rolls());
        }
        if drop_count <= 0 {
            return Ok(rolls);
        }

        let mut order: Vec<(usize, Int)> = rolls
            .rolls()
            .iter()
            .map(DieRoll::value)
            .enumerate()
            .collect();
        // Ascending when the low dice go, descending when the high ones do.
        // Both sorts are stable, so the earlier die goes first on ties.
        if keep == highest {
            order.sort_by_key(|&(_, v)| v);
        } else {
            order.sort_by_key(|&(_, v)| std::cmp::Reverse(v));
        }

        let mut new_rolls = rolls.rolls().to_vec();
        for &(index, _) in order.iter().take(drop_count as usize) {
            new_rolls[index] = new_rolls[index].with_flag(DieFlag::Dropped);
        }
        tracing::trace!(argument = self.kind.name(), drop_count, "dropping dice");
        Ok(rolls.with_rolls(new_rolls))
    }
}

impl fmt::Display for RollArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.kind.threshold().is_some() {
            write!(f, " {}", self.operator)?;
        }
        if !self.value.is_undefined() {
            write!(f, " {}", self.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_value(mut arg: RollArgument, value: Value) -> RollArgument {
        arg.value = value;
        arg
    }

    fn set(values: &[Int]) -> RollSet {
        let rolls = values.iter().map(|&v| DieRoll::new(v, 6)).collect();
        RollSet::new(rolls, 6, "d", crate::roll::AggregateMethod::Sum)
    }

    fn dropped(set: &RollSet) -> Vec<usize> {
        set.rolls()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_dropped())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_success_default_target() {
        let arg = RollArgument::success(ComparisonOperator::Eq, None);
        assert!(arg.apply_to_roll(DieRoll::new(6, 6)).unwrap().is_success());
        assert!(!arg.apply_to_roll(DieRoll::new(5, 6)).unwrap().is_success());
    }

    #[test]
    fn test_failure_default_target() {
        let arg = RollArgument::failure(ComparisonOperator::Eq, None);
        assert!(arg.apply_to_roll(DieRoll::new(1, 20)).unwrap().is_failure());
        assert!(!arg.apply_to_roll(DieRoll::new(2, 20)).unwrap().is_failure());
    }

    #[test]
    fn test_threshold_operand() {
        let arg = with_value(
            RollArgument::critical(ComparisonOperator::Ge, None),
            Value::int(18),
        );
        assert!(arg.apply_to_roll(DieRoll::new(18, 20)).unwrap().is_critical());
        assert!(arg.apply_to_roll(DieRoll::new(20, 20)).unwrap().is_critical());
        assert!(!arg.apply_to_roll(DieRoll::new(17, 20)).unwrap().is_critical());

        // Non-numeric operands fall back to the default target.
        let arg = with_value(
            RollArgument::success(ComparisonOperator::Eq, None),
            Value::text("lots"),
        );
        assert!(arg.apply_to_roll(DieRoll::new(6, 6)).unwrap().is_success());
    }

    #[test]
    fn test_threshold_from_token() {
        let arg = RollArgument::threshold(ArgumentKind::Fumble, "<=", None).unwrap();
        assert_eq!(arg.operator(), ComparisonOperator::Le);
        let arg = RollArgument::threshold(ArgumentKind::Fumble, "", None).unwrap();
        assert_eq!(arg.operator(), ComparisonOperator::Eq);
        assert_eq!(
            RollArgument::threshold(ArgumentKind::Success, "=<", None),
            Err(EvalError::UnknownOperator("=<".to_owned()))
        );
    }

    #[test]
    fn test_flags_stay_exclusive() {
        let success = RollArgument::success(ComparisonOperator::Ge, None);
        let success = with_value(success, Value::int(1));
        let failure = RollArgument::failure(ComparisonOperator::Le, None);
        let failure = with_value(failure, Value::int(6));
        let crit = RollArgument::critical(ComparisonOperator::Ge, None);
        let crit = with_value(crit, Value::int(1));
        let fumble = RollArgument::fumble(ComparisonOperator::Le, None);
        let fumble = with_value(fumble, Value::int(6));

        let orders = [
            [&success, &failure, &crit, &fumble],
            [&fumble, &crit, &failure, &success],
            [&crit, &success, &fumble, &failure],
        ];
        for order in orders {
            let mut die = DieRoll::new(3, 6);
            for arg in order {
                die = arg.apply_to_roll(die).unwrap();
                assert!(!(die.is_success() && die.is_failure()));
                assert!(!(die.is_critical() && die.is_fumble()));
            }
        }

        let die = fumble.apply_to_roll(DieRoll::new(3, 6)).unwrap();
        let die = success.apply_to_roll(die).unwrap();
        assert!(die.is_success());
        assert!(!die.is_fumble());
    }

    #[test]
    fn test_add() {
        let arg = with_value(RollArgument::add(Node::int(2)), Value::int(2));
        assert_eq!(arg.apply_to_roll(DieRoll::new(3, 6)).unwrap().value(), 5);

        let arg = with_value(RollArgument::add(Node::text("x")), Value::text("x"));
        assert_eq!(
            arg.apply_to_roll(DieRoll::new(3, 6)),
            Err(EvalError::MissingArgument { argument: "add" })
        );
    }

    #[test]
    fn test_keep_highest() {
        let arg = with_value(RollArgument::keep_highest(Node::int(3)), Value::int(3));
        let out = arg.apply_to_all(set(&[4, 2, 6, 3])).unwrap();
        assert_eq!(dropped(&out), vec![1]);
        assert_eq!(out.result(), Value::int(13));
        assert_eq!(out.number_of_rolls(), 4);
    }

    #[test]
    fn test_keep_lowest_and_drops() {
        let kl = with_value(RollArgument::keep_lowest(Node::int(1)), Value::int(1));
        assert_eq!(dropped(&kl.apply_to_all(set(&[4, 2, 6])).unwrap()), vec![0, 2]);

        let dh = with_value(RollArgument::drop_highest(Node::int(1)), Value::int(1));
        assert_eq!(dropped(&dh.apply_to_all(set(&[4, 2, 6])).unwrap()), vec![2]);

        let dl = with_value(RollArgument::drop_lowest(Node::int(2)), Value::int(2));
        assert_eq!(dropped(&dl.apply_to_all(set(&[4, 2, 6])).unwrap()), vec![0, 1]);
    }

    #[test]
    fn test_ties_drop_earlier_die() {
        let kh = with_value(RollArgument::keep_highest(Node::int(2)), Value::int(2));
        assert_eq!(dropped(&kh.apply_to_all(set(&[3, 3, 3])).unwrap()), vec![0]);

        let dh = with_value(RollArgument::drop_highest(Node::int(1)), Value::int(1));
        assert_eq!(dropped(&dh.apply_to_all(set(&[5, 1, 5])).unwrap()), vec![0]);
    }

    #[test]
    fn test_keep_drop_bounds() {
        let keep_all = with_value(RollArgument::keep_highest(Node::int(5)), Value::int(5));
        let rolls = set(&[1, 2, 3]);
        assert_eq!(keep_all.apply_to_all(rolls.clone()).unwrap(), rolls);

        let keep_none = with_value(RollArgument::keep_highest(Node::int(0)), Value::int(0));
        assert_eq!(keep_none.apply_to_all(rolls.clone()).unwrap(), RollSet::no_rolls());

        let drop_all = with_value(RollArgument::drop_lowest(Node::int(3)), Value::int(3));
        assert_eq!(drop_all.apply_to_all(rolls).unwrap(), RollSet::no_rolls());
    }

    #[test]
    fn test_keep_drop_any_count() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        use ArgumentKind::*;

        let mut rng = StdRng::seed_from_u64(0xd1ce);
        for _ in 0..200 {
            let total: usize = rng.gen_range(1..=8);
            let values: Vec<Int> = (0..total).map(|_| rng.gen_range(1..=6)).collect();
            let mut sorted = values.clone();
            sorted.sort_unstable();
            let rolls = set(&values);

            for kind in [KeepHighest, KeepLowest, DropHighest, DropLowest] {
                for n in -1..=total as Int + 1 {
                    let arg = RollArgument::new(kind, ComparisonOperator::Eq, Some(Node::int(n)));
                    let out = with_value(arg, Value::int(n))
                        .apply_to_all(rolls.clone())
                        .unwrap();

                    let clamped = n.clamp(0, total as Int) as usize;
                    let kept = match kind {
                        KeepHighest | KeepLowest => clamped,
                        _ => total - clamped,
                    };
                    if kept == 0 {
                        assert_eq!(out, RollSet::no_rolls(), "{} {} of {:?}", kind, n, values);
                        continue;
                    }

                    assert_eq!(dropped(&out).len(), total - kept, "{} {} of {:?}", kind, n, values);
                    let faces: Vec<Int> = out.rolls().iter().map(DieRoll::value).collect();
                    assert_eq!(faces, values);

                    let expected: Int = match kind {
                        KeepHighest | DropLowest => sorted[total - kept..].iter().sum(),
                        _ => sorted[..kept].iter().sum(),
                    };
                    assert_eq!(out.result(), Value::int(expected), "{} {} of {:?}", kind, n, values);
                }
            }
        }
    }

    #[test]
    fn test_keep_requires_number() {
        let arg = RollArgument::keep_highest(Node::int(1));
        assert_eq!(
            arg.apply_to_all(set(&[1, 2])),
            Err(EvalError::MissingArgument {
                argument: "keep highest"
            })
        );
    }
}
