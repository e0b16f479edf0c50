//! Reactions: abilities that only narrate.

use crate::ability::{Ability, AbilityDeclaration, AbilityEffect, AbilityId};
use crate::character::EffectType;
use crate::dice::Die;
use crate::stats::StatKind;

/// The squirrel's signature move. Rolls nothing and changes nothing.
#[derive(Debug, Clone)]
pub struct Cower {
    declaration: AbilityDeclaration,
}

impl Cower {
    /// Creates the `cower` reaction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: AbilityDeclaration {
                id: AbilityId::new("cower"),
                name: "Cower".into(),
                die: Die::new(0, 0),
                stat: StatKind::Charisma,
                effect_type: EffectType::Psychic,
                effect: AbilityEffect::Reaction,
            },
        }
    }
}

impl Default for Cower {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for Cower {
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
