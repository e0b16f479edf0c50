//! State components shared by players and bosses.
//!
//! - [`Health`]: current and max health, always clamped
//! - [`Affinities`]: resistances, vulnerabilities and immunities
//! - [`EffectType`]: the elemental type carried by an ability
//! - [`CharacterClass`]: player classes and their hit dice

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::Die;
use crate::stats::Stats;

// =============================================================================
// Effect Type
// =============================================================================

/// Elemental or physical type of an ability's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum EffectType {
    Bludgeoning,
    Piercing,
    Slashing,
    Fire,
    Cold,
    Lightning,
    Poison,
    Acid,
    Necrotic,
    Radiant,
    Psychic,
}

impl EffectType {
    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bludgeoning => "bludgeoning",
            Self::Piercing => "piercing",
            Self::Slashing => "slashing",
            Self::Fire => "fire",
            Self::Cold => "cold",
            Self::Lightning => "lightning",
            Self::Poison => "poison",
            Self::Acid => "acid",
            Self::Necrotic => "necrotic",
            Self::Radiant => "radiant",
            Self::Psychic => "psychic",
        }
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Affinities
// =============================================================================

/// How a character reacts to an effect type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    /// Damage is zeroed.
    Immune,
    /// Damage is halved (floor).
    Resistant,
    /// Damage is doubled.
    Vulnerable,
    /// Damage is unchanged.
    Normal,
}

/// Resistance, vulnerability and immunity sets of a character.
///
/// The sets are expected to be disjoint. When they are not, [`Affinities::reaction_to`]
/// applies the fixed priority immune > resistant > vulnerable.
///
/// # Example
///
/// ```
/// use boss_battles_core::character::{Affinities, EffectType, Reaction};
///
/// let affinities = Affinities::default().resist(EffectType::Fire);
/// assert_eq!(affinities.reaction_to(EffectType::Fire), Reaction::Resistant);
/// assert_eq!(affinities.reaction_to(EffectType::Cold), Reaction::Normal);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affinities {
    /// Effect types that deal half damage.
    pub resistances: BTreeSet<EffectType>,
    /// Effect types that deal double damage.
    pub vulnerabilities: BTreeSet<EffectType>,
    /// Effect types that deal no damage.
    pub immunities: BTreeSet<EffectType>,
}

impl Affinities {
    /// Adds a resistance.
    #[must_use]
    pub fn resist(mut self, effect: EffectType) -> Self {
        self.resistances.insert(effect);
        self
    }

    /// Adds a vulnerability.
    #[must_use]
    pub fn vulnerable_to(mut self, effect: EffectType) -> Self {
        self.vulnerabilities.insert(effect);
        self
    }

    /// Adds an immunity.
    #[must_use]
    pub fn immune_to(mut self, effect: EffectType) -> Self {
        self.immunities.insert(effect);
        self
    }

    /// Returns the reaction to an effect type, immune > resistant > vulnerable.
    #[must_use]
    pub fn reaction_to(&self, effect: EffectType) -> Reaction {
        if self.immunities.contains(&effect) {
            Reaction::Immune
        } else if self.resistances.contains(&effect) {
            Reaction::Resistant
        } else if self.vulnerabilities.contains(&effect) {
            Reaction::Vulnerable
        } else {
            Reaction::Normal
        }
    }

    /// Returns effect types that appear in more than one set.
    #[must_use]
    pub fn overlaps(&self) -> Vec<EffectType> {
        let mut seen = BTreeSet::new();
        let mut overlapping = BTreeSet::new();
        for effect in self
            .resistances
            .iter()
            .chain(&self.vulnerabilities)
            .chain(&self.immunities)
        {
            if !seen.insert(*effect) {
                overlapping.insert(*effect);
            }
        }
        overlapping.into_iter().collect()
    }
}

// =============================================================================
// Health
// =============================================================================

/// Current and maximum health.
///
/// Invariant: `0 <= current <= max`. Every mutation clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Creates full health with the given maximum (floored at 1).
    #[must_use]
    pub fn full(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// True while health is above zero.
    #[must_use]
    pub const fn is_conscious(&self) -> bool {
        self.current > 0
    }

    /// Adds `delta` (negative for damage) and clamps to `[0, max]`.
    pub fn modify(&mut self, delta: i32) {
        self.current = self.current.saturating_add(delta).clamp(0, self.max);
    }

    /// Restores current health to max.
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    /// Doubles max health. Current health is left unchanged.
    pub fn double_max(&mut self) {
        self.max = self.max.saturating_mul(2);
    }
}

// =============================================================================
// Character Class
// =============================================================================

/// Player character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    /// Front-line melee class, d10 hit die.
    #[default]
    Fighter,
    /// Spellcaster, d6 hit die.
    Wizard,
    /// Healer, d8 hit die.
    Cleric,
}

impl CharacterClass {
    /// The class hit die.
    #[must_use]
    pub const fn hit_die(self) -> Die {
        match self {
            Self::Fighter => Die::new(1, 10),
            Self::Wizard => Die::new(1, 6),
            Self::Cleric => Die::new(1, 8),
        }
    }

    /// Standard stat array for a freshly registered player of this class.
    #[must_use]
    pub const fn standard_stats(self) -> Stats {
        match self {
            Self::Fighter => Stats::new(16, 14, 14, 12, 8, 10),
            Self::Wizard => Stats::new(8, 14, 13, 12, 16, 10),
            Self::Cleric => Stats::new(14, 10, 14, 16, 8, 12),
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fighter => write!(f, "fighter"),
            Self::Wizard => write!(f, "wizard"),
            Self::Cleric => write!(f, "cleric"),
        }
    }
}
