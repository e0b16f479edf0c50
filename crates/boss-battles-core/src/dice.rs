//! Dice and the sources of randomness behind them.
//!
//! Every roll in an encounter goes through a [`DiceRoller`]. Production code
//! uses [`SeededDice`], a `ChaCha8Rng` seeded once so that a whole encounter
//! can be replayed from its seed. Tests use [`ScriptedDice`], which returns a
//! fixed sequence of faces.
//!
//! # Example
//!
//! ```
//! use boss_battles_core::dice::{Die, DiceRoller, ScriptedDice};
//!
//! let mut dice = ScriptedDice::new([3, 5]);
//! let die = Die::new(2, 6);
//!
//! assert_eq!(die.roll_sum(&mut dice), 8);
//! ```

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// Die
// =============================================================================

/// A dice expression of the form `count`d`sides`.
///
/// Used both for hit dice (baseline health) and for ability damage dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    /// Number of dice rolled.
    pub count: u32,
    /// Faces on each die.
    pub sides: u32,
}

impl Die {
    /// Creates a new dice expression.
    #[must_use]
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Rolls every die once and returns the sum.
    pub fn roll_sum(&self, roller: &mut dyn DiceRoller) -> i32 {
        (0..self.count)
            .map(|_| i32::try_from(roller.roll(self.sides)).unwrap_or(i32::MAX))
            .fold(0i32, i32::saturating_add)
    }

    /// Returns the same die with its count doubled (critical hits).
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self {
            count: self.count * 2,
            sides: self.sides,
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

// =============================================================================
// Dice Roller
// =============================================================================

/// A source of die rolls.
///
/// Implementations return a face in `1..=sides`. Rolls are independent per
/// call.
pub trait DiceRoller: Send {
    /// Rolls a single die with the given number of sides.
    fn roll(&mut self, sides: u32) -> u32;

    /// Rolls a d20.
    fn d20(&mut self) -> u32 {
        self.roll(20)
    }
}

/// Dice backed by a seeded `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Creates dice from a seed. The same seed yields the same rolls.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Dice that return a scripted sequence of faces.
///
/// Once the script runs out, every further roll returns the fallback face
/// (1 unless set with [`ScriptedDice::then_always`]). Faces are returned
/// as scripted, without clamping to the die size.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    fallback: u32,
    rolled: usize,
}

impl ScriptedDice {
    /// Creates dice that return `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: 1,
            rolled: 0,
        }
    }

    /// Sets the face returned after the script is exhausted.
    #[must_use]
    pub fn then_always(mut self, face: u32) -> Self {
        self.fallback = face;
        self
    }

    /// Number of scripted faces not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Total number of rolls made so far.
    #[must_use]
    pub fn rolled(&self) -> usize {
        self.rolled
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.rolled += 1;
        self.faces.pop_front().unwrap_or(self.fallback)
    }
}
