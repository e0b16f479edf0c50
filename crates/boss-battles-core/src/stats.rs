//! Ability scores and the values derived from them.
//!
//! [`Stats`] is a plain value type holding the six ability scores. The derived
//! numbers used throughout combat resolution live here too:
//!
//! - [`modifier`]: `floor((score - 10) / 2)`
//! - [`proficiency_bonus`]: `floor((level - 1) / 4) + 2`, or a flat 2 for a
//!   zero-or-negative challenge rating
//!
//! # Example
//!
//! ```
//! use boss_battles_core::stats::{modifier, StatKind, Stats};
//!
//! let stats = Stats::new(16, 14, 14, 12, 8, 10);
//! assert_eq!(modifier(stats.get(StatKind::Strength)), 3);
//! assert_eq!(modifier(stats.get(StatKind::Intelligence)), -1);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

// =============================================================================
// Stat Kind
// =============================================================================

/// Names one of the six ability scores.
///
/// Abilities use a `StatKind` to select the score that governs both their
/// attack modifier and their damage modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    /// Physical power.
    Strength,
    /// Agility and reflexes. Also drives armor class.
    Dexterity,
    /// Endurance. Drives max health.
    Constitution,
    /// Perception and insight.
    Wisdom,
    /// Reasoning and memory.
    Intelligence,
    /// Force of personality.
    Charisma,
}

impl StatKind {
    /// All stat kinds in canonical order.
    pub const ALL: [StatKind; 6] = [
        StatKind::Strength,
        StatKind::Dexterity,
        StatKind::Constitution,
        StatKind::Wisdom,
        StatKind::Intelligence,
        StatKind::Charisma,
    ];

    /// Returns the lowercase name of this stat.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Wisdom => "wisdom",
            Self::Intelligence => "intelligence",
            Self::Charisma => "charisma",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Stats
// =============================================================================

/// The six ability scores of a character.
///
/// Stats are attached to a character at construction and only change through
/// explicit buff application (element-wise addition).
///
/// # Example
///
/// ```
/// use boss_battles_core::stats::Stats;
///
/// let base = Stats::new(10, 10, 10, 10, 10, 10);
/// let buff = Stats { strength: 2, ..Stats::default() };
///
/// assert_eq!((base + buff).strength, 12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Strength score.
    pub strength: i32,
    /// Dexterity score.
    pub dexterity: i32,
    /// Constitution score.
    pub constitution: i32,
    /// Wisdom score.
    pub wisdom: i32,
    /// Intelligence score.
    pub intelligence: i32,
    /// Charisma score.
    pub charisma: i32,
}

impl Stats {
    /// Creates stats in the order str, dex, con, wis, int, cha.
    #[must_use]
    pub const fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        wisdom: i32,
        intelligence: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            wisdom,
            intelligence,
            charisma,
        }
    }

    /// Returns the score for the given stat.
    #[must_use]
    pub const fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Dexterity => self.dexterity,
            StatKind::Constitution => self.constitution,
            StatKind::Wisdom => self.wisdom,
            StatKind::Intelligence => self.intelligence,
            StatKind::Charisma => self.charisma,
        }
    }

    /// Returns the modifier for the given stat.
    #[must_use]
    pub const fn modifier(&self, kind: StatKind) -> i32 {
        modifier(self.get(kind))
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, other: Stats) -> Stats {
        Stats {
            strength: self.strength + other.strength,
            dexterity: self.dexterity + other.dexterity,
            constitution: self.constitution + other.constitution,
            wisdom: self.wisdom + other.wisdom,
            intelligence: self.intelligence + other.intelligence,
            charisma: self.charisma + other.charisma,
        }
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Stats) {
        *self = *self + other;
    }
}

// =============================================================================
// Derived Values
// =============================================================================

/// Returns the ability modifier for a score: `floor((score - 10) / 2)`.
///
/// Uses floor division, so odd scores below 10 round toward negative infinity.
///
/// ```
/// use boss_battles_core::stats::modifier;
///
/// assert_eq!(modifier(8), -1);
/// assert_eq!(modifier(9), -1);
/// assert_eq!(modifier(10), 0);
/// assert_eq!(modifier(14), 2);
/// ```
#[must_use]
pub const fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Returns the proficiency bonus for a level or challenge rating.
///
/// A zero-or-negative challenge rating yields a flat bonus of 2.
#[must_use]
pub const fn proficiency_bonus(level: i32) -> i32 {
    if level <= 0 {
        2
    } else {
        (level - 1) / 4 + 2
    }
}

// =============================================================================
// Tests
// =============================================================================
