mod argument;
mod ctx;
mod dice;
mod die;
pub(crate) mod roller;
mod set;

pub use argument::{ArgumentKind, RollArgument};
pub use ctx::{DefaultRoller, EvalConfig, EvalContext, UnsetSymbolPolicy};
pub use dice::{DiceRoller, DiceRollers, StandardDiceRoller};
pub use die::{DieFlag, DieRoll};
pub use roller::Roller;
pub use set::{AggregateMethod, RollSet};
