use crate::common::Int;
use std::collections::BTreeSet;
use std::fmt;

/// Annotations a modifier can place on a single die.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum DieFlag {
    Success,
    Failure,
    Critical,
    Fumble,
    Dropped,
}

impl fmt::Display for DieFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Critical => "critical",
            Self::Fumble => "fumble",
            Self::Dropped => "dropped",
        };
        f.write_str(s)
    }
}

/// One die after rolling. Never mutated; flag changes produce a new roll.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DieRoll {
    value: Int,
    sides: Int,
    flags: BTreeSet<DieFlag>,
}

impl DieRoll {
    pub fn new(value: Int, sides: Int) -> Self {
        Self {
            value,
            sides,
            flags: BTreeSet::new(),
        }
    }

    pub fn value(&self) -> Int {
        self.value
    }

    pub fn sides(&self) -> Int {
        self.sides
    }

    pub fn flags(&self) -> impl Iterator<Item = DieFlag> + '_ {
        self.flags.iter().copied()
    }

    pub fn has_flag(&self, flag: DieFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_success(&self) -> bool {
        self.has_flag(DieFlag::Success)
    }

    pub fn is_failure(&self) -> bool {
        self.has_flag(DieFlag::Failure)
    }

    pub fn is_critical(&self) -> bool {
        self.has_flag(DieFlag::Critical)
    }

    pub fn is_fumble(&self) -> bool {
        self.has_flag(DieFlag::Fumble)
    }

    pub fn is_dropped(&self) -> bool {
        self.has_flag(DieFlag::Dropped)
    }

    pub fn is_kept(&self) -> bool {
        !self.is_dropped()
    }

    pub fn with_value(&self, value: Int) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn with_flag(&self, flag: DieFlag) -> Self {
        let mut ret = self.clone();
        ret.flags.insert(flag);
        ret
    }

    /// Replaces the whole flag set.
    pub fn with_flags(&self, flags: impl IntoIterator<Item = DieFlag>) -> Self {
        Self {
            value: self.value,
            sides: self.sides,
            flags: flags.into_iter().collect(),
        }
    }

    pub fn without_flags(&self, flags: &[DieFlag]) -> Self {
        let mut ret = self.clone();
        for flag in flags {
            ret.flags.remove(flag);
        }
        ret
    }
}

impl fmt::Display for DieRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
