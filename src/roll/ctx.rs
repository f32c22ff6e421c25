use super::{argument::RollArgument, dice::DiceRollers, roller::Roller};
use crate::common::*;
use crate::error::{EResult, EvalError};
use crate::symbols::SymbolTable;
use crate::value::Value;

pub type DefaultRoller = rand::prelude::ThreadRng;

/// What resolving a variable that was never set yields.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum UnsetSymbolPolicy {
    /// Resolve to [`Value::UNDEFINED`].
    #[default]
    Undefined,
    /// Fail with [`EvalError::UnknownSymbol`].
    Error,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct EvalConfig {
    /// Dice allowed per top-level statement; `None` for no limit.
    pub max_rolls: Option<usize>,
    pub unset_symbols: UnsetSymbolPolicy,
}

impl EvalConfig {
    /// Caps the dice rolled by a single statement at `max`.
    pub fn limited(max: usize) -> Self {
        Self {
            max_rolls: Some(max),
            ..Self::default()
        }
    }
}

/// Everything a tree needs while evaluating: the host's symbol table, the
/// dice roller registry and a source of randomness.
pub struct EvalContext<'a, R = DefaultRoller> {
    config: EvalConfig,
    symbols: &'a mut dyn SymbolTable,
    rollers: &'a DiceRollers,
    roller: R,
    rolls: usize,
}

impl<'a, R: Roller> EvalContext<'a, R> {
    pub fn new(
        config: EvalConfig,
        symbols: &'a mut dyn SymbolTable,
        rollers: &'a DiceRollers,
        roller: R,
    ) -> Self {
        Self {
            config,
            symbols,
            rollers,
            roller,
            rolls: 0,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn symbols(&self) -> &dyn SymbolTable {
        &*self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut dyn SymbolTable {
        &mut *self.symbols
    }

    pub fn rollers(&self) -> &DiceRollers {
        self.rollers
    }

    /// Dice rolled since the current statement started.
    pub fn rolls(&self) -> usize {
        self.rolls
    }

    /// Starts a fresh roll budget. Called at the top of every statement.
    pub fn reset_rolls(&mut self) {
        self.rolls = 0;
    }

    fn count_rolls(&mut self, n: usize) -> EResult<()> {
        let rolls = self.rolls.saturating_add(n);
        match self.config.max_rolls {
            Some(max) if rolls > max => Err(EvalError::TooManyRolls),
            _ => {
                self.rolls = rolls;
                Ok(())
            }
        }
    }

    /// Reads a variable, applying the configured policy when it is unset.
    pub fn resolve(&self, scope: Scope, name: &str) -> EResult<Value> {
        match self.symbols.get(scope, name) {
            Some(value) => Ok(value.clone()),
            None => match self.config.unset_symbols {
                UnsetSymbolPolicy::Undefined => Ok(Value::UNDEFINED),
                UnsetSymbolPolicy::Error => Err(EvalError::UnknownSymbol {
                    variable: scope.variable_name(name),
                }),
            },
        }
    }

    pub fn assign(&mut self, scope: Scope, name: &str, value: Value) {
        tracing::debug!(%scope, name, %value, "assigning variable");
        self.symbols.set(scope, name, value);
    }

    pub fn roll_dice(
        &mut self,
        pattern: &str,
        num_dice: Int,
        num_sides: Int,
        args: &[RollArgument],
    ) -> EResult<Value> {
        let rollers = self.rollers;
        let dice_roller = rollers.get(pattern)?;
        if num_dice > 0 {
            self.count_rolls(num_dice as usize)?;
        }
        dice_roller.roll(&mut self.roller, pattern, num_dice, num_sides, args)
    }
}

impl<'a> EvalContext<'a> {
    /// Default configuration with a thread-local CSPRNG.
    pub fn with_defaults(symbols: &'a mut dyn SymbolTable, rollers: &'a DiceRollers) -> Self {
        Self::new(EvalConfig::default(), symbols, rollers, rand::thread_rng())
    }
}
