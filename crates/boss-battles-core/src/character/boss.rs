//! Boss roster and turn decisions.
//!
//! Bosses form a closed set of behavior variants ([`BossKind`]). Each variant
//! carries its own stat block and decides its turn through
//! [`BossKind::decide_turn`], which reads the party through a read-only
//! [`PartyView`] and returns a [`TurnDecision`].
//!
//! Names are made unique by [`unique_boss_names`], a pure pass run before an
//! encounter builds its name index.

use std::collections::HashMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::ability::AbilityId;
use crate::battle::{ActionRequest, PartyView};
use crate::dice::Die;
use crate::stats::Stats;

use super::{BossState, Character};

// =============================================================================
// Turn Decision
// =============================================================================

/// What a boss does on its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnDecision {
    /// Use an ability; resolved through the same path as player actions.
    Act(ActionRequest),
    /// Do something that needs no resolution; the string is the log line.
    Narrate(String),
}

// =============================================================================
// Boss Kind
// =============================================================================

/// The closed set of boss behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    /// Fast, frail and mostly harmless. Bites or cowers at random.
    Squirrel,
    /// Bites a random conscious player every turn.
    GiantWolfSpider,
    /// Never attacks. Fully heals every turn and doubles its max health when
    /// knocked out.
    PracticeDummy,
}

impl BossKind {
    /// Base name before uniqueness numbering.
    #[must_use]
    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Squirrel => "squirrel",
            Self::GiantWolfSpider => "giant wolf spider",
            Self::PracticeDummy => "dummy",
        }
    }

    /// Default hit die.
    #[must_use]
    pub const fn hit_die(self) -> Die {
        match self {
            Self::Squirrel => Die::new(1, 4),
            Self::GiantWolfSpider => Die::new(2, 8),
            Self::PracticeDummy => Die::new(495, 1),
        }
    }

    /// Stat block.
    #[must_use]
    pub const fn stats(self) -> Stats {
        match self {
            Self::Squirrel => Stats::new(2, 50, 8, 12, 2, 6),
            Self::GiantWolfSpider => Stats::new(12, 16, 13, 12, 3, 4),
            Self::PracticeDummy => Stats::new(0, 0, 20, 0, 0, 0),
        }
    }

    /// Challenge rating.
    #[must_use]
    pub const fn challenge_rating(self) -> i32 {
        match self {
            Self::Squirrel => 0,
            Self::GiantWolfSpider | Self::PracticeDummy => 1,
        }
    }

    /// Ability identifiers this boss chooses from.
    #[must_use]
    pub fn ability_set(self) -> Vec<AbilityId> {
        let ids: &[&str] = match self {
            Self::Squirrel => &["bite", "cower"],
            Self::GiantWolfSpider => &["wolfspiderbite"],
            Self::PracticeDummy => &[],
        };
        ids.iter().map(|id| AbilityId::new(id)).collect()
    }

    /// True for bosses that still take their turn while unconscious.
    #[must_use]
    pub const fn acts_while_down(self) -> bool {
        matches!(self, Self::PracticeDummy)
    }

    /// True for bosses that never use abilities.
    #[must_use]
    pub const fn is_passive(self) -> bool {
        matches!(self, Self::PracticeDummy)
    }

    /// Builds a boss of this kind with its default hit die.
    #[must_use]
    pub fn spawn(self) -> Character {
        self.spawn_with_hit_die(self.hit_die())
    }

    /// Builds a boss of this kind with a custom hit die.
    #[must_use]
    pub fn spawn_with_hit_die(self, hit_die: Die) -> Character {
        Character::boss(
            self.base_name(),
            hit_die,
            self.stats(),
            self.challenge_rating(),
            BossState::new(self, self.ability_set()),
        )
    }

    /// Decides the turn for `boss`, which must be of this kind.
    ///
    /// Attacking bosses pick an ability from their ability set and a target
    /// among the conscious players. The practice dummy mutates itself and
    /// narrates.
    pub fn decide_turn(
        self,
        boss: &mut Character,
        party: &PartyView<'_>,
        rng: &mut dyn RngCore,
    ) -> TurnDecision {
        match self {
            Self::Squirrel | Self::GiantWolfSpider => Self::attack_random_player(boss, party, rng),
            Self::PracticeDummy => {
                let health = boss.health_mut();
                let message = if health.is_conscious() {
                    health.restore();
                    format!("{} patches itself up ({})", boss.name(), health_label(boss))
                } else {
                    health.double_max();
                    health.restore();
                    format!(
                        "{} rises again, bigger than before ({})",
                        boss.name(),
                        health_label(boss)
                    )
                };
                TurnDecision::Narrate(message)
            }
        }
    }

    fn attack_random_player(
        boss: &Character,
        party: &PartyView<'_>,
        rng: &mut dyn RngCore,
    ) -> TurnDecision {
        let abilities = boss.as_boss().map(|state| state.ability_set.as_slice()).unwrap_or(&[]);
        let targets: Vec<&Character> = party.conscious_players().collect();

        match (abilities.choose(rng), targets.choose(rng)) {
            (Some(ability), Some(target)) => TurnDecision::Act(ActionRequest::new(
                boss.name(),
                ability.clone(),
                target.name(),
            )),
            (None, _) => TurnDecision::Narrate(format!("{} hesitates", boss.name())),
            (_, None) => TurnDecision::Narrate(format!("{} finds no one to fight", boss.name())),
        }
    }
}

impl fmt::Display for BossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

fn health_label(character: &Character) -> String {
    format!("{}/{}", character.current_health(), character.max_health())
}

// =============================================================================
// Naming
// =============================================================================

/// Computes final unique names for a list of boss names.
///
/// Names that occur once are kept. Every name that occurs more than once is
/// numbered from 1 in list order, including its first occurrence.
///
/// ```
/// use boss_battles_core::character::unique_boss_names;
///
/// let names = unique_boss_names(&["squirrel", "dummy", "squirrel", "squirrel"]);
/// assert_eq!(names, vec!["squirrel1", "dummy", "squirrel2", "squirrel3"]);
/// ```
#[must_use]
pub fn unique_boss_names(names: &[&str]) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *totals.entry(*name).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            if totals[name] == 1 {
                (*name).to_string()
            } else {
                let ordinal = seen.entry(*name).or_default();
                *ordinal += 1;
                format!("{name}{ordinal}")
            }
        })
        .collect()
}
