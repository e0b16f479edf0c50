//! Character model for encounter participants.
//!
//! This module provides the core participant types:
//! - [`Character`]: name, level, hit die, stats, health and affinities
//! - [`Role`]: what kind of participant a character is (player or boss)
//! - [`PlayerState`] / [`BossState`]: role-specific state
//!
//! # Architecture
//!
//! Players and bosses share one struct. The role-specific parts live in the
//! [`Role`] tagged union, and the accessors [`Character::as_player`] and
//! [`Character::as_boss`] give typed access to them. Max health is computed
//! once at construction by a role-specific formula:
//!
//! - Player: `die + con` at level 1, plus `die/2 + 1 + con` per further level
//! - Boss: `count * (die/2 + 1) + con`
//!
//! # Example
//!
//! ```
//! use boss_battles_core::character::{Character, CharacterClass};
//!
//! let player = Character::fighter("mrgallo");
//!
//! // d10 + con modifier (14 -> +2)
//! assert_eq!(player.max_health(), 12);
//! assert!(player.is_player());
//! assert_eq!(player.as_player().unwrap().class, CharacterClass::Fighter);
//! ```

pub mod boss;
pub mod components;

use serde::{Deserialize, Serialize};

use crate::ability::AbilityId;
use crate::dice::Die;
use crate::stats::{modifier, proficiency_bonus, StatKind, Stats};

pub use boss::{unique_boss_names, BossKind, TurnDecision};
pub use components::{Affinities, CharacterClass, EffectType, Health, Reaction};

// =============================================================================
// Role
// =============================================================================

/// Player-specific state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// The player's class.
    pub class: CharacterClass,
}

/// Boss-specific state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossState {
    /// Behavior variant used for turn decisions.
    pub kind: BossKind,
    /// Abilities this boss may choose from, in preference order.
    pub ability_set: Vec<AbilityId>,
    /// Opportunity tokens issued to this boss, newest last. Never trimmed.
    tokens: Vec<String>,
}

impl BossState {
    /// Creates boss state with an empty token history.
    #[must_use]
    pub fn new(kind: BossKind, ability_set: Vec<AbilityId>) -> Self {
        Self {
            kind,
            ability_set,
            tokens: Vec::new(),
        }
    }

    /// The most recently issued opportunity token.
    #[must_use]
    pub fn opportunity_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Every token issued so far, oldest first.
    #[must_use]
    pub fn token_history(&self) -> &[String] {
        &self.tokens
    }

    /// Appends a freshly issued token.
    pub fn push_token(&mut self, token: String) {
        self.tokens.push(token);
    }
}

/// Participant role in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A human participant.
    Player(PlayerState),
    /// A computer-controlled participant.
    Boss(BossState),
}

// =============================================================================
// Character
// =============================================================================

/// A participant in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    name: String,
    level: i32,
    hit_die: Die,
    stats: Stats,
    health: Health,
    affinities: Affinities,
    role: Role,
}

impl Character {
    /// Creates a player. Max health follows the per-level player formula.
    #[must_use]
    pub fn player(name: impl Into<String>, class: CharacterClass, stats: Stats, level: i32) -> Self {
        let hit_die = class.hit_die();
        let max = player_max_health(hit_die, stats, level);
        Self {
            name: name.into(),
            level,
            hit_die,
            stats,
            health: Health::full(max),
            affinities: Affinities::default(),
            role: Role::Player(PlayerState { class }),
        }
    }

    /// Creates a level 1 player with the class's standard stat array.
    #[must_use]
    pub fn with_class(name: impl Into<String>, class: CharacterClass) -> Self {
        Self::player(name, class, class.standard_stats(), 1)
    }

    /// Creates a level 1 fighter (str 16, dex 14, con 14, wis 12, int 8, cha 10).
    #[must_use]
    pub fn fighter(name: impl Into<String>) -> Self {
        Self::with_class(name, CharacterClass::Fighter)
    }

    /// Creates a boss. Max health follows the boss hit-die formula.
    #[must_use]
    pub fn boss(
        name: impl Into<String>,
        hit_die: Die,
        stats: Stats,
        challenge_rating: i32,
        state: BossState,
    ) -> Self {
        let max = boss_max_health(hit_die, stats);
        Self {
            name: name.into(),
            level: challenge_rating,
            hit_die,
            stats,
            health: Health::full(max),
            affinities: Affinities::default(),
            role: Role::Boss(state),
        }
    }

    /// Replaces the affinity sets.
    #[must_use]
    pub fn with_affinities(mut self, affinities: Affinities) -> Self {
        self.affinities = affinities;
        self
    }

    /// Returns the same character under a new name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name, unique within its side of the encounter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level for players, challenge rating for bosses.
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.level
    }

    /// Hit die the max health was derived from.
    #[must_use]
    pub const fn hit_die(&self) -> Die {
        self.hit_die
    }

    /// Current stats.
    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Modifier of the given stat.
    #[must_use]
    pub const fn stat_modifier(&self, kind: StatKind) -> i32 {
        self.stats.modifier(kind)
    }

    /// Proficiency bonus from level or challenge rating.
    #[must_use]
    pub const fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    /// Health component.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Mutable health component.
    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// Current health.
    #[must_use]
    pub const fn current_health(&self) -> i32 {
        self.health.current()
    }

    /// Max health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.health.max()
    }

    /// True while health is above zero.
    #[must_use]
    pub const fn is_conscious(&self) -> bool {
        self.health.is_conscious()
    }

    /// Reduces health, clamped at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health.modify(amount.saturating_neg());
    }

    /// Restores health, clamped at max.
    pub fn heal(&mut self, amount: i32) {
        self.health.modify(amount);
    }

    /// Resistance, vulnerability and immunity sets.
    #[must_use]
    pub const fn affinities(&self) -> &Affinities {
        &self.affinities
    }

    /// True for players.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.role, Role::Player(_))
    }

    /// True for bosses.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self.role, Role::Boss(_))
    }

    /// Player state, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerState> {
        match &self.role {
            Role::Player(state) => Some(state),
            Role::Boss(_) => None,
        }
    }

    /// Boss state, if this is a boss.
    #[must_use]
    pub const fn as_boss(&self) -> Option<&BossState> {
        match &self.role {
            Role::Boss(state) => Some(state),
            Role::Player(_) => None,
        }
    }

    /// Mutable boss state, if this is a boss.
    pub fn as_boss_mut(&mut self) -> Option<&mut BossState> {
        match &mut self.role {
            Role::Boss(state) => Some(state),
            Role::Player(_) => None,
        }
    }
}

fn player_max_health(hit_die: Die, stats: Stats, level: i32) -> i32 {
    let con = modifier(stats.constitution);
    let sides = i32::try_from(hit_die.sides).unwrap_or(i32::MAX);
    let per_level = sides / 2 + 1 + con;
    let extra_levels = (level - 1).max(0);
    sides + con + per_level * extra_levels
}

fn boss_max_health(hit_die: Die, stats: Stats) -> i32 {
    let count = i32::try_from(hit_die.count).unwrap_or(i32::MAX);
    let sides = i32::try_from(hit_die.sides).unwrap_or(i32::MAX);
    count.saturating_mul(sides / 2 + 1) + modifier(stats.constitution)
}
