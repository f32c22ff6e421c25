use super::{
    argument::RollArgument,
    die::DieRoll,
    roller::Roller,
    set::{AggregateMethod, RollSet},
};
use crate::common::*;
use crate::error::{EResult, EvalError};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A family of dice selected by its pattern, such as `d` in `3d6`.
pub trait DiceRoller: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Patterns this roller answers to.
    fn patterns(&self) -> &[&'static str];

    fn roll(
        &self,
        roller: &mut dyn Roller,
        pattern: &str,
        num_dice: Int,
        num_sides: Int,
        args: &[RollArgument],
    ) -> EResult<Value>;
}

/// Plain polyhedral dice summed together.
#[derive(Debug, Copy, Clone, Default)]
pub struct StandardDiceRoller;

impl DiceRoller for StandardDiceRoller {
    fn name(&self) -> &str {
        "Standard Dice Roller"
    }

    fn description(&self) -> &str {
        "Rolls N dice with S sides and adds them up"
    }

    fn patterns(&self) -> &[&'static str] {
        &["d", "D"]
    }

    fn roll(
        &self,
        roller: &mut dyn Roller,
        pattern: &str,
        num_dice: Int,
        num_sides: Int,
        args: &[RollArgument],
    ) -> EResult<Value> {
        if num_dice < 0 {
            return Err(EvalError::invalid_dice(format!(
                "cannot roll a negative number of dice ({})",
                num_dice
            )));
        }
        let sides = UInt::try_from(num_sides)
            .ok()
            .and_then(NonZeroUInt::new)
            .ok_or_else(|| {
                EvalError::invalid_dice(format!("dice must have at least one side, not {}", num_sides))
            })?;

        let faces = roller.roll_n(num_dice as usize, sides);
        tracing::debug!(pattern, num_dice, num_sides, ?faces, "rolled dice");

        let mut rolls = Vec::with_capacity(faces.len());
        for face in faces {
            let mut die = DieRoll::new(face as Int, num_sides);
            for arg in args {
                die = arg.apply_to_roll(die)?;
            }
            rolls.push(die);
        }

        let mut set = RollSet::new(rolls, num_sides, pattern.to_owned(), AggregateMethod::Sum);
        for arg in args {
            set = arg.apply_to_all(set)?;
        }

        let total = set.result();
        Ok(total.with_rolls(set))
    }
}

/// Maps dice patterns to the roller responsible for them.
#[derive(Debug, Clone, Default)]
pub struct DiceRollers {
    rollers: HashMap<String, Arc<dyn DiceRoller>>,
}

impl DiceRollers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every roller this crate ships.
    pub fn standard() -> Self {
        let mut ret = Self::new();
        ret.register(StandardDiceRoller);
        ret
    }

    /// Registers `roller` under all of its patterns, replacing whatever was
    /// registered for them before.
    pub fn register(&mut self, roller: impl DiceRoller + 'static) {
        let roller: Arc<dyn DiceRoller> = Arc::new(roller);
        for pattern in roller.patterns() {
            self.rollers.insert((*pattern).to_owned(), Arc::clone(&roller));
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.rollers.contains_key(pattern)
    }

    pub fn get(&self, pattern: &str) -> EResult<&dyn DiceRoller> {
        match self.rollers.get(pattern) {
            Some(roller) => {
                tracing::debug!(pattern, roller = roller.name(), "found dice roller");
                Ok(roller.as_ref())
            }
            None => Err(EvalError::UnregisteredRoller(pattern.to_owned())),
        }
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rollers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{roller::StepRoller, ArgumentKind};
    use crate::test_utils::*;
    use crate::tree::Node;
    use rand::{rngs::StdRng, SeedableRng};

    fn roll(num_dice: Int, num_sides: Int, args: &[RollArgument]) -> EResult<Value> {
        let mut roller = StepRoller::new(nz(1), 1);
        StandardDiceRoller.roll(&mut roller, "d", num_dice, num_sides, args)
    }

    #[test]
    fn test_standard_roll() {
        let value = roll(3, 6, &[]).unwrap();
        assert_eq!(value, Value::int(6).with_rolls(value.rolls().clone()));
        let faces: Vec<_> = value.rolls().rolls().iter().map(DieRoll::value).collect();
        assert_eq!(faces, vec![1, 2, 3]);
        assert_eq!(value.rolls().sides(), 6);
        assert_eq!(value.rolls().name(), "d");
    }

    #[test]
    fn test_zero_dice() {
        let value = roll(0, 6, &[]).unwrap();
        assert_eq!(value.as_int(), Some(0));
        assert!(!value.has_rolls());
    }

    #[test]
    fn test_invalid_dice() {
        assert!(matches!(roll(-1, 6, &[]), Err(EvalError::InvalidDice(_))));
        assert!(matches!(roll(2, 0, &[]), Err(EvalError::InvalidDice(_))));
        assert!(matches!(roll(2, -4, &[]), Err(EvalError::InvalidDice(_))));
    }

    #[test]
    fn test_per_die_before_whole_set() {
        // 1, 2, 3, 4 with +2 each, then keep the highest two.
        let mut add = RollArgument::add(Node::int(2));
        let mut keep = RollArgument::keep_highest(Node::int(2));
        let mut ctx = test_context();
        add.evaluate(&mut ctx).unwrap();
        keep.evaluate(&mut ctx).unwrap();

        let value = roll(4, 6, &[keep, add]).unwrap();
        let faces: Vec<_> = value.rolls().rolls().iter().map(DieRoll::value).collect();
        assert_eq!(faces, vec![3, 4, 5, 6]);
        assert_eq!(value.as_int(), Some(11));
    }

    #[test]
    fn test_bounds_and_one_sided() {
        let mut rng = StdRng::seed_from_u64(42);
        for sides in [1, 4, 6, 20] {
            let value = StandardDiceRoller.roll(&mut rng, "d", 100, sides, &[]).unwrap();
            assert_eq!(value.rolls().number_of_rolls(), 100);
            assert!(value
                .rolls()
                .rolls()
                .iter()
                .all(|r| (1..=sides).contains(&r.value())));
        }

        let value = StandardDiceRoller.roll(&mut rng, "d", 12, 1, &[]).unwrap();
        assert_eq!(value.as_int(), Some(12));
    }

    #[test]
    fn test_registry() {
        let rollers = DiceRollers::standard();
        assert!(rollers.contains("d"));
        assert!(rollers.contains("D"));
        assert_eq!(rollers.get("D").unwrap().name(), "Standard Dice Roller");
        assert_eq!(
            rollers.get("z").unwrap_err(),
            EvalError::UnregisteredRoller("z".to_owned())
        );

        let mut patterns: Vec<_> = rollers.patterns().collect();
        patterns.sort_unstable();
        assert_eq!(patterns, vec!["D", "d"]);
        assert!(DiceRollers::new().get("d").is_err());
    }

    #[test]
    fn test_threshold_flags_applied() {
        let arg = RollArgument::threshold(ArgumentKind::Success, "", None).unwrap();
        let value = roll(6, 6, &[arg]).unwrap();
        assert_eq!(value.rolls().successes(), 1);
        assert!(value.rolls().rolls()[5].is_success());
    }
}
