//! Ability system: declarations, the challenge protocol, and the registry.
//!
//! Every ability is a trait object implementing [`Ability`]. An ability:
//! - Declares its identifier, damage die, governing stat and effect type via
//!   an [`AbilityDeclaration`]
//! - Transforms a boss's opportunity token into the solve token a player must
//!   submit ([`Ability::transform`])
//! - Verifies a submitted solve token ([`Ability::verify`]); trivial abilities
//!   override this to always succeed
//!
//! # Ability Registry
//!
//! The [`AbilityRegistry`] maps identifiers to abilities. It is built once at
//! startup, wrapped in an `Arc`, and handed to the combat engine and the
//! encounter server. Nothing is removed from it afterwards.
//!
//! # Example
//!
//! ```
//! use boss_battles_core::ability::{
//!     Ability, AbilityDeclaration, AbilityEffect, AbilityId, AbilityRegistry,
//! };
//! use boss_battles_core::character::EffectType;
//! use boss_battles_core::dice::Die;
//! use boss_battles_core::stats::StatKind;
//! use std::sync::Arc;
//!
//! struct Shout {
//!     declaration: AbilityDeclaration,
//! }
//!
//! impl Ability for Shout {
//!     fn declaration(&self) -> &AbilityDeclaration {
//!         &self.declaration
//!     }
//!
//!     fn transform(&self, opportunity_token: &str) -> String {
//!         opportunity_token.to_uppercase()
//!     }
//! }
//!
//! let mut registry = AbilityRegistry::new();
//! registry.register(Arc::new(Shout {
//!     declaration: AbilityDeclaration {
//!         id: AbilityId::new("shout"),
//!         name: "Shout".into(),
//!         die: Die::new(1, 4),
//!         stat: StatKind::Charisma,
//!         effect_type: EffectType::Psychic,
//!         effect: AbilityEffect::Damage,
//!     },
//! }));
//!
//! let shout = registry.get(&AbilityId::new("shout")).unwrap();
//! assert!(shout.verify("ab2c", "AB2C"));
//! assert!(!shout.verify("ab2c", "ab2c"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::abilities;
use crate::character::EffectType;
use crate::dice::Die;
use crate::stats::StatKind;

// =============================================================================
// Ability Id
// =============================================================================

/// Registry key of an ability, e.g. `"punch"`.
///
/// Identifiers are matched exactly; the command parser lowercases them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(String);

impl AbilityId {
    /// Creates an identifier.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AbilityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AbilityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Ability Declaration
// =============================================================================

/// What an ability does once it is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Hit roll against armor class, then damage.
    Damage,
    /// Restores health to the target; never misses.
    Healing,
    /// Narrative only; no roll, no state change.
    Reaction,
}

/// Static description of an ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityDeclaration {
    /// Unique registry key.
    pub id: AbilityId,
    /// Display name used in combat messages.
    pub name: String,
    /// Damage (or healing) die.
    pub die: Die,
    /// Stat governing both the attack and the damage modifier.
    pub stat: StatKind,
    /// Elemental type checked against the target's affinities.
    pub effect_type: EffectType,
    /// Kind of effect.
    pub effect: AbilityEffect,
}

// =============================================================================
// Ability Trait
// =============================================================================

/// An ability usable by players and bosses.
///
/// # Challenge Protocol
///
/// Each round every conscious boss is issued an opportunity token. A player
/// using a challenge ability must submit `transform(token)` as the solve
/// token. The default [`Ability::verify`] compares the two; abilities that
/// need no challenge override it to return `true`.
pub trait Ability: Send + Sync {
    /// Returns the ability's declaration.
    fn declaration(&self) -> &AbilityDeclaration;

    /// Computes the expected solve token for an opportunity token.
    fn transform(&self, opportunity_token: &str) -> String;

    /// Checks a submitted solve token against an opportunity token.
    fn verify(&self, opportunity_token: &str, solve_token: &str) -> bool {
        self.transform(opportunity_token) == solve_token
    }

    /// Registry key.
    fn id(&self) -> &AbilityId {
        &self.declaration().id
    }

    /// Display name.
    fn name(&self) -> &str {
        &self.declaration().name
    }
}

impl fmt::Debug for dyn Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("id", self.id())
            .field("name", &self.name())
            .finish()
    }
}

// =============================================================================
// Ability Registry
// =============================================================================

/// Catalog of abilities keyed by identifier.
///
/// # Example
///
/// ```
/// use boss_battles_core::ability::{AbilityId, AbilityRegistry};
///
/// let registry = AbilityRegistry::with_defaults();
/// assert!(registry.contains(&AbilityId::new("punch")));
/// assert!(registry.get(&AbilityId::new("fireball")).is_none());
/// ```
#[derive(Default)]
pub struct AbilityRegistry {
    abilities: HashMap<AbilityId, Arc<dyn Ability>>,
}

impl AbilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            abilities: HashMap::new(),
        }
    }

    /// Registers an ability under its declared identifier.
    ///
    /// Registering the same identifier twice replaces the earlier entry and
    /// returns it.
    pub fn register(&mut self, ability: Arc<dyn Ability>) -> Option<Arc<dyn Ability>> {
        let id = ability.id().clone();
        self.abilities.insert(id, ability)
    }

    /// Looks up an ability.
    #[must_use]
    pub fn get(&self, id: &AbilityId) -> Option<&Arc<dyn Ability>> {
        self.abilities.get(id)
    }

    /// True if an ability is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &AbilityId) -> bool {
        self.abilities.contains_key(id)
    }

    /// Number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&AbilityId> {
        let mut ids: Vec<_> = self.abilities.keys().collect();
        ids.sort();
        ids
    }

    /// Creates a registry pre-populated with the built-in catalog.
    ///
    /// | id               | die  | stat | type        | challenge        |
    /// |------------------|------|------|-------------|------------------|
    /// | `attack`         | 1d4  | str  | bludgeoning | none             |
    /// | `punch`          | 1d2  | str  | bludgeoning | none             |
    /// | `bite`           | 1d4  | str  | piercing    | none             |
    /// | `wolfspiderbite` | 1d6  | dex  | piercing    | none             |
    /// | `cower`          | -    | -    | reaction    | none             |
    /// | `sstrike`        | 1d8  | dex  | slashing    | token as-is      |
    /// | `heal`           | 1d8  | wis  | healing     | token reversed   |
    /// | `firebolt`       | 1d10 | int  | fire        | token sorted     |
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ability in abilities::catalog() {
            registry.register(ability);
        }
        registry
    }
}

impl fmt::Debug for AbilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityRegistry")
            .field("abilities", &self.ids())
            .finish()
    }
}
