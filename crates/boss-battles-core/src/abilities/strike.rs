//! Plain attacks.
//!
//! A [`StrikeAbility`] accepts any solve token, including none at all. Bosses
//! only ever use strikes, so their turns never depend on the challenge
//! protocol.

use crate::ability::{Ability, AbilityDeclaration, AbilityEffect, AbilityId};
use crate::character::EffectType;
use crate::dice::Die;
use crate::stats::StatKind;

/// A damaging ability with trivial verification.
///
/// # Example
///
/// ```
/// use boss_battles_core::abilities::StrikeAbility;
/// use boss_battles_core::ability::Ability;
///
/// let punch = StrikeAbility::punch();
/// assert_eq!(punch.name(), "Punch");
/// assert!(punch.verify("ab2c", ""));
/// ```
#[derive(Debug, Clone)]
pub struct StrikeAbility {
    declaration: AbilityDeclaration,
}

impl StrikeAbility {
    /// Creates a strike from its parts.
    #[must_use]
    pub fn new(id: &str, name: &str, die: Die, stat: StatKind, effect_type: EffectType) -> Self {
        Self {
            declaration: AbilityDeclaration {
                id: AbilityId::new(id),
                name: name.to_string(),
                die,
                stat,
                effect_type,
                effect: AbilityEffect::Damage,
            },
        }
    }

    /// Basic weapon attack, 1d4 strength bludgeoning.
    #[must_use]
    pub fn attack() -> Self {
        Self::new("attack", "Attack", Die::new(1, 4), StatKind::Strength, EffectType::Bludgeoning)
    }

    /// Unarmed strike, 1d2 strength bludgeoning.
    #[must_use]
    pub fn punch() -> Self {
        Self::new("punch", "Punch", Die::new(1, 2), StatKind::Strength, EffectType::Bludgeoning)
    }

    /// Small animal bite, 1d4 strength piercing.
    #[must_use]
    pub fn bite() -> Self {
        Self::new("bite", "Bite", Die::new(1, 4), StatKind::Strength, EffectType::Piercing)
    }

    /// Giant wolf spider bite, 1d6 dexterity piercing.
    #[must_use]
    pub fn wolf_spider_bite() -> Self {
        Self::new(
            "wolfspiderbite",
            "Wolf Spider Bite",
            Die::new(1, 6),
            StatKind::Dexterity,
            EffectType::Piercing,
        )
    }
}

impl Ability for StrikeAbility {
    fn declaration(&self) -> &AbilityDeclaration {
        &self.declaration
    }

    fn transform(&self, opportunity_token: &str) -> String {
        opportunity_token.to_string()
    }

    fn verify(&self, _opportunity_token: &str, _solve_token: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strikes_ignore_the_token() {
        for strike in [
            StrikeAbility::attack(),
            StrikeAbility::punch(),
            StrikeAbility::bite(),
            StrikeAbility::wolf_spider_bite(),
        ] {
            assert!(strike.verify("abcd", "nonsense"));
            assert!(strike.verify("abcd", ""));
            assert_eq!(strike.declaration().effect, AbilityEffect::Damage);
        }
    }

    #[test]
    fn punch_declaration() {
        let punch = StrikeAbility::punch();
        let declaration = punch.declaration();
        assert_eq!(declaration.id.as_str(), "punch");
        assert_eq!(declaration.die, Die::new(1, 2));
        assert_eq!(declaration.stat, StatKind::Strength);
        assert_eq!(declaration.effect_type, EffectType::Bludgeoning);
    }
}
