//! Abilities gated by the opportunity-token challenge.
//!
//! Each [`ChallengeAbility`] pairs a declaration with a [`TokenTransform`].
//! The player reads the target boss's opportunity token from the display,
//! applies the transform in their head (or their code), and submits the
//! result as the solve token.

use crate::ability::{Ability, AbilityDeclaration, AbilityEffect, AbilityId};
use crate::character::EffectType;
use crate::dice::Die;
use crate::stats::StatKind;

/// How an opportunity token becomes a solve token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTransform {
    /// The token itself.
    Identity,
    /// The token's characters in reverse order.
    Reverse,
    /// The token's characters in ascending order.
    Sorted,
}

impl TokenTransform {
    /// Applies the transform.
    ///
    /// ```
    /// use boss_battles_core::abilities::TokenTransform;
    ///
    /// assert_eq!(TokenTransform::Reverse.apply("abcd"), "dcba");
    /// assert_eq!(TokenTransform::Sorted.apply("k3ax"), "3akx");
    /// ```
    #[must_use]
    pub fn apply(self, token: &str) -> String {
        match self {
            Self::Identity => token.to_string(),
            Self::Reverse => token.chars().rev().collect(),
            Self::Sorted => {
                let mut chars: Vec<char> = token.chars().collect();
                chars.sort_unstable();
                chars.into_iter().collect()
            }
        }
    }
}

/// An ability whose solve token must match a transform of the opportunity
/// token.
#[derive(Debug, Clone)]
pub struct ChallengeAbility {
    declaration: AbilityDeclaration,
    transform: TokenTransform,
}

impl ChallengeAbility {
    /// Creates a challenge ability.
    #[must_use]
    pub fn new(declaration: AbilityDeclaration, transform: TokenTransform) -> Self {
        Self {
            declaration,
            transform,
        }
    }

    /// Swift Strike: 1d8 dexterity slashing, solve with the token as shown.
    #[must_use]
    pub fn swift_strike() -> Self {
        Self::new(
            AbilityDeclaration {
                id: AbilityId::new("sstrike"),
                name: "Swift Strike".into(),
                die: Die::new(1, 8),
                stat: StatKind::Dexterity,
                effect_type: EffectType::Slashing,
                effect: AbilityEffect::Damage,
            },
            TokenTransform::Identity,
        )
    }

    /// Heal: 1d8 wisdom healing, solve with the token reversed.
    #[must_use]
    pub fn heal() -> Self {
        Self::new(
            AbilityDeclaration {
                id: AbilityId::new("heal"),
                name: "Heal".into(),
                die: Die::new(1, 8),
                stat: StatKind::Wisdom,
                effect_type: EffectType::Radiant,
                effect: AbilityEffect::Healing,
            },
            TokenTransform::Reverse,
        )
    }

    /// Fire Bolt: 1d10 intelligence fire, solve with the token sorted.
    #[must_use]
    pub fn fire_bolt() -> Self {
        Self::new(
            AbilityDeclaration {
                id: AbilityId::new("firebolt"),
                name: "Fire Bolt".into(),
                die: Die::new(1, 10),
                stat: StatKind::Intelligence,
                effect_type: EffectType::Fire,
                effect: AbilityEffect::Damage,
            },
            TokenTransform::Sorted,
        )
    }
}

impl Ability for ChallengeAbility {
    fn declaration(&self) -> &AbilityDeclaration {
        &self.declaration
    }

    fn transform(&self, opportunity_token: &str) -> String {
        self.transform.apply(opportunity_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swift_strike_wants_the_token_verbatim() {
        let ability = ChallengeAbility::swift_strike();
        assert!(ability.verify("ab2c", "ab2c"));
        assert!(!ability.verify("ab2c", "c2ba"));
    }

    #[test]
    fn heal_wants_the_token_reversed() {
        let ability = ChallengeAbility::heal();
        assert_eq!(ability.transform("abcd"), "dcba");
        assert!(ability.verify("abcd", "dcba"));
        assert!(!ability.verify("abcd", "abcd"));
        assert_eq!(ability.declaration().effect, AbilityEffect::Healing);
    }

    #[test]
    fn fire_bolt_wants_the_token_sorted() {
        let ability = ChallengeAbility::fire_bolt();
        assert!(ability.verify("zy9a", "9ayz"));
        assert!(!ability.verify("zy9a", "zy9a"));
    }

    #[test]
    fn empty_solve_never_passes_a_nonempty_token() {
        for ability in [
            ChallengeAbility::swift_strike(),
            ChallengeAbility::heal(),
            ChallengeAbility::fire_bolt(),
        ] {
            assert!(!ability.verify("abcd", ""));
        }
    }
}
