//! Birth/survival rules for outer-totalistic automata
//!
//! Each rule is a 9-bit mask over neighbour counts 0..=8. Rules are plain
//! values handed to an engine at construction, so boards with different
//! rules can run side by side.

use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const COUNT_MASK: u16 = 0x1ff;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rules {
    survive: u16,
    birth: u16,
}

impl Rules {
    /// Rules from explicit neighbour counts
    ///
    /// # Arguments
    /// * `survive` - counts at which a live cell stays alive
    /// * `birth` - counts at which a dead cell comes alive
    pub fn new(survive: &[u8], birth: &[u8]) -> Result<Self, ConfigError> {
        Ok(Self {
            survive: mask_of(survive)?,
            birth: mask_of(birth)?,
        })
    }

    /// Standard Conway life, B3/S23
    pub fn conway() -> Self {
        Self {
            survive: (1 << 2) | (1 << 3),
            birth: 1 << 3,
        }
    }

    pub fn survives(&self, neighbors: u8) -> bool {
        neighbors <= 8 && self.survive & (1 << neighbors) != 0
    }

    pub fn is_born(&self, neighbors: u8) -> bool {
        neighbors <= 8 && self.birth & (1 << neighbors) != 0
    }

    /// Next liveness of a cell, or `None` if it keeps its state
    pub fn transition(&self, alive: bool, neighbors: u8) -> Option<bool> {
        if alive {
            (!self.survives(neighbors)).then_some(false)
        } else {
            self.is_born(neighbors).then_some(true)
        }
    }
}

impl Default for Rules {
    /// Background variant: S1234/B3
    fn default() -> Self {
        Self {
            survive: (1 << 1) | (1 << 2) | (1 << 3) | (1 << 4),
            birth: 1 << 3,
        }
    }
}

fn mask_of(counts: &[u8]) -> Result<u16, ConfigError> {
    counts.iter().try_fold(0u16, |mask, &count| {
        if count > 8 {
            Err(ConfigError::RuleCountOutOfRange(count))
        } else {
            Ok(mask | (1 << count))
        }
    })
}

fn parse_counts(digits: &str) -> Result<u16, ConfigError> {
    digits.chars().try_fold(0u16, |mask, c| {
        let count = c.to_digit(10).ok_or(ConfigError::InvalidRuleNotation)? as u8;
        if count > 8 {
            return Err(ConfigError::RuleCountOutOfRange(count));
        }
        Ok(mask | (1 << count))
    })
}

impl FromStr for Rules {
    type Err = ConfigError;

    /// Parses `B3/S1234` (either half first, case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s.trim().split_once('/').ok_or(ConfigError::InvalidRuleNotation)?;
        let mut survive = None;
        let mut birth = None;

        for part in [first, second] {
            let mut chars = part.chars();
            let tag = chars.next().ok_or(ConfigError::InvalidRuleNotation)?;
            let mask = parse_counts(chars.as_str())?;
            match tag.to_ascii_uppercase() {
                'B' if birth.is_none() => birth = Some(mask),
                'S' if survive.is_none() => survive = Some(mask),
                _ => return Err(ConfigError::InvalidRuleNotation),
            }
        }

        match (survive, birth) {
            (Some(survive), Some(birth)) => Ok(Self { survive, birth }),
            _ => Err(ConfigError::InvalidRuleNotation),
        }
    }
}

impl fmt::Display for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for n in 0..=8u8 {
            if self.birth & COUNT_MASK & (1 << n) != 0 {
                write!(f, "{}", n)?;
            }
        }
        write!(f, "/S")?;
        for n in 0..=8u8 {
            if self.survive & COUNT_MASK & (1 << n) != 0 {
                write!(f, "{}", n)?;
            }
        }
        Ok(())
    }
}
