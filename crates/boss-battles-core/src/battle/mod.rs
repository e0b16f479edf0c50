//! The combat engine.
//!
//! [`BossBattle`] owns the encounter: the players, the bosses, the round
//! counter, the set of players who have acted this round, and the randomness
//! behind dice, tokens and boss decisions.
//!
//! # Round Structure
//!
//! 1. [`BossBattle::next_round`]: stop if a side is wiped out, otherwise bump
//!    the round, clear the acted set and issue each conscious boss a fresh
//!    opportunity token
//! 2. [`BossBattle::handle_action`]: one call per player command; each player
//!    gets at most one applied action per round
//! 3. [`BossBattle::bosses_turn`]: every boss decides and acts, in
//!    registration order
//!
//! # Randomness
//!
//! Hit and damage rolls go through a [`DiceRoller`]. Tokens and boss choices
//! come from a separate `ChaCha8Rng` stream, so swapping in scripted dice
//! does not shift which tokens are issued.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use boss_battles_core::ability::{AbilityId, AbilityRegistry};
//! use boss_battles_core::battle::{ActionOutcome, ActionRequest, BossBattle};
//! use boss_battles_core::character::{BossKind, Character};
//! use boss_battles_core::dice::ScriptedDice;
//!
//! let mut battle = BossBattle::new(
//!     vec![Character::fighter("mrgallo")],
//!     vec![BossKind::PracticeDummy.spawn()],
//!     Arc::new(AbilityRegistry::with_defaults()),
//!     7,
//! )
//! .unwrap()
//! .with_dice(Box::new(ScriptedDice::new([10, 1])));
//!
//! assert!(battle.next_round());
//! let outcome = battle
//!     .handle_action(&ActionRequest::new("mrgallo", AbilityId::new("punch"), "dummy"))
//!     .unwrap();
//!
//! assert!(matches!(outcome, ActionOutcome::Applied(_)));
//! assert_eq!(battle.boss("dummy").unwrap().current_health(), 496);
//! ```

mod resolution;
mod view;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ability::{Ability, AbilityId, AbilityRegistry};
use crate::character::{unique_boss_names, Character, TurnDecision};
use crate::dice::{DiceRoller, SeededDice};
use crate::token::TokenIssuer;

pub use resolution::{CombatResolver, HitRoll, BASE_ARMOR_CLASS, CRITICAL_ROLL};
pub use view::PartyView;

// =============================================================================
// Requests and Outcomes
// =============================================================================

/// A request to use an ability: who, what, on whom.
///
/// Player commands and boss decisions both become requests, so every action
/// runs through the same resolution path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Name of the acting character.
    pub caster: String,
    /// Ability to use.
    pub ability: AbilityId,
    /// Name of the target.
    pub target: String,
    /// Submitted solve token, if any.
    pub solve_token: Option<String>,
}

impl ActionRequest {
    /// Creates a request without a solve token.
    #[must_use]
    pub fn new(caster: impl Into<String>, ability: AbilityId, target: impl Into<String>) -> Self {
        Self {
            caster: caster.into(),
            ability,
            target: target.into(),
            solve_token: None,
        }
    }

    /// Attaches a solve token.
    #[must_use]
    pub fn with_solve_token(mut self, token: impl Into<String>) -> Self {
        self.solve_token = Some(token.into());
        self
    }
}

/// Result of a player action that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action resolved. Holds the combat log line.
    Applied(String),
    /// The solve token was wrong. Nothing changed and the player may retry.
    Rejected(String),
}

impl ActionOutcome {
    /// The message for either outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Applied(message) | Self::Rejected(message) => message,
        }
    }

    /// True if the action resolved.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Conditions that stop an action or an encounter from being set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// The caster is not a registered player.
    #[error("unknown player: {0}")]
    UnknownCaster(String),
    /// The caster has been knocked out.
    #[error("{0} is unconscious and cannot act")]
    CasterUnconscious(String),
    /// No boss or player has this name.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// No ability has this identifier.
    #[error("invalid ability: {0}")]
    InvalidAbility(AbilityId),
    /// The player already acted this round.
    #[error("{0} has already taken their turn this round")]
    TurnAlreadyTaken(String),
    /// A boss cannot take a turn with the given registry.
    #[error("boss {boss} is misconfigured: {reason}")]
    MisconfiguredBoss {
        /// Boss name.
        boss: String,
        /// What is wrong.
        reason: String,
    },
    /// Two participants share a name, on the same side or across sides.
    #[error("duplicate name: {0}")]
    DuplicateName(String),
}

// =============================================================================
// Boss Battle
// =============================================================================

/// Encounter state and turn orchestration.
pub struct BossBattle {
    players: BTreeMap<String, Character>,
    bosses: Vec<Character>,
    boss_index: HashMap<String, usize>,
    round: u32,
    acted: BTreeSet<String>,
    registry: Arc<AbilityRegistry>,
    dice: Box<dyn DiceRoller>,
    rng: ChaCha8Rng,
    tokens: TokenIssuer,
}

impl BossBattle {
    /// Builds an encounter.
    ///
    /// Boss names are made unique first: bosses sharing a name are numbered
    /// `name1`, `name2`, ... Dice are seeded from `seed`; tokens and boss
    /// decisions use a second stream of the same seed.
    ///
    /// # Errors
    ///
    /// - [`BattleError::DuplicateName`] if two players share a name, two
    ///   bosses still do after numbering, or a player is named like a boss
    /// - [`BattleError::MisconfiguredBoss`] if an attacking boss has no
    ///   abilities or uses one missing from `registry`
    pub fn new(
        players: Vec<Character>,
        bosses: Vec<Character>,
        registry: Arc<AbilityRegistry>,
        seed: u64,
    ) -> Result<Self, BattleError> {
        let mut player_map = BTreeMap::new();
        for player in players {
            let name = player.name().to_string();
            if player_map.insert(name.clone(), player).is_some() {
                return Err(BattleError::DuplicateName(name));
            }
        }

        let names: Vec<&str> = bosses.iter().map(Character::name).collect();
        let unique = unique_boss_names(&names);
        let bosses: Vec<Character> = bosses
            .into_iter()
            .zip(unique)
            .map(|(boss, name)| boss.renamed(name))
            .collect();

        let mut boss_index = HashMap::new();
        for (index, boss) in bosses.iter().enumerate() {
            if boss_index.insert(boss.name().to_string(), index).is_some() {
                return Err(BattleError::DuplicateName(boss.name().to_string()));
            }
            validate_boss(boss, &registry)?;
        }
        if let Some(name) = player_map.keys().find(|name| boss_index.contains_key(*name)) {
            return Err(BattleError::DuplicateName(name.clone()));
        }

        for character in player_map.values().chain(&bosses) {
            let overlaps = character.affinities().overlaps();
            if !overlaps.is_empty() {
                warn!(
                    name = character.name(),
                    ?overlaps,
                    "overlapping affinities; immune > resistant > vulnerable applies"
                );
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(1);

        info!(
            players = player_map.len(),
            bosses = bosses.len(),
            seed,
            "encounter created"
        );

        Ok(Self {
            players: player_map,
            bosses,
            boss_index,
            round: 0,
            acted: BTreeSet::new(),
            registry,
            dice: Box::new(SeededDice::new(seed)),
            rng,
            tokens: TokenIssuer::default(),
        })
    }

    /// Replaces the dice source.
    #[must_use]
    pub fn with_dice(mut self, dice: Box<dyn DiceRoller>) -> Self {
        self.dice = dice;
        self
    }

    /// Sets the opportunity token length.
    #[must_use]
    pub fn with_token_length(mut self, length: usize) -> Self {
        self.tokens = TokenIssuer::new(length);
        self
    }

    // -------------------------------------------------------------------------
    // Round flow
    // -------------------------------------------------------------------------

    /// True while both sides have someone standing.
    #[must_use]
    pub fn should_continue(&self) -> bool {
        self.players.values().any(Character::is_conscious)
            && self.bosses.iter().any(Character::is_conscious)
    }

    /// Starts the next round.
    ///
    /// Returns false, changing nothing, if either side has no conscious
    /// member. Otherwise increments the round, clears the acted set and
    /// issues a token to every conscious boss.
    pub fn next_round(&mut self) -> bool {
        if !self.should_continue() {
            info!(round = self.round, "encounter over");
            return false;
        }

        self.round += 1;
        self.acted.clear();

        let issuer = self.tokens;
        for boss in self.bosses.iter_mut().filter(|b| b.is_conscious()) {
            let token = issuer.issue(&mut self.rng);
            debug!(boss = boss.name(), %token, "token issued");
            if let Some(state) = boss.as_boss_mut() {
                state.push_token(token);
            }
        }

        info!(round = self.round, "round started");
        true
    }

    /// Applies a player's action.
    ///
    /// # Errors
    ///
    /// Returns a [`BattleError`] if the caster is unknown or unconscious, the
    /// target does not exist, the ability is not registered, or the caster
    /// already acted this round. None of these change any state.
    pub fn handle_action(&mut self, request: &ActionRequest) -> Result<ActionOutcome, BattleError> {
        let caster = self
            .players
            .get(&request.caster)
            .ok_or_else(|| BattleError::UnknownCaster(request.caster.clone()))?;
        if !caster.is_conscious() {
            return Err(BattleError::CasterUnconscious(request.caster.clone()));
        }
        if self.character(&request.target).is_none() {
            return Err(BattleError::TargetNotFound(request.target.clone()));
        }
        let ability = self.get_ability(&request.ability)?;
        if self.acted.contains(&request.caster) {
            return Err(BattleError::TurnAlreadyTaken(request.caster.clone()));
        }

        let opportunity = self.challenge_token(&request.target).unwrap_or_default();
        let solve = request.solve_token.as_deref().unwrap_or_default();
        if !ability.verify(&opportunity, solve) {
            warn!(
                caster = %request.caster,
                target = %request.target,
                ability = %request.ability,
                "wrong solve token"
            );
            return Ok(ActionOutcome::Rejected(format!(
                "{}'s {} fizzles: wrong solve token for {}",
                request.caster,
                ability.name(),
                request.target
            )));
        }

        self.acted.insert(request.caster.clone());
        let caster = caster.clone();
        let message = self.resolve(&caster, ability.as_ref(), &request.target);
        info!(%message, "player action");
        Ok(ActionOutcome::Applied(message))
    }

    /// Runs every boss's turn in registration order.
    ///
    /// Unconscious bosses are skipped unless their kind acts while down.
    /// Returns one log line per boss that acted, joined by newlines.
    pub fn bosses_turn(&mut self) -> String {
        let mut lines = Vec::new();

        for index in 0..self.bosses.len() {
            let Some(kind) = self.bosses[index].as_boss().map(|state| state.kind) else {
                continue;
            };
            if !self.bosses[index].is_conscious() && !kind.acts_while_down() {
                continue;
            }

            let view = PartyView::new(&self.players);
            let decision = kind.decide_turn(&mut self.bosses[index], &view, &mut self.rng);

            let line = match decision {
                TurnDecision::Narrate(line) => line,
                TurnDecision::Act(request) => self.resolve_boss_action(index, &request),
            };
            info!(%line, "boss action");
            lines.push(line);
        }

        lines.join("\n")
    }

    fn resolve_boss_action(&mut self, index: usize, request: &ActionRequest) -> String {
        let caster = self.bosses[index].clone();
        let Some(ability) = self.registry.get(&request.ability).cloned() else {
            warn!(boss = caster.name(), ability = %request.ability, "boss chose an unknown ability");
            return format!("{} fumbles", caster.name());
        };
        let dice = self.dice.as_mut();
        match self.players.get_mut(&request.target) {
            Some(target) => CombatResolver::resolve(&caster, ability.as_ref(), target, dice),
            None => format!("{} loses track of {}", caster.name(), request.target),
        }
    }

    fn resolve(&mut self, caster: &Character, ability: &dyn Ability, target: &str) -> String {
        let dice = self.dice.as_mut();
        let target = if let Some(&index) = self.boss_index.get(target) {
            self.bosses.get_mut(index)
        } else {
            self.players.get_mut(target)
        };
        match target {
            Some(target) => CombatResolver::resolve(caster, ability, target, dice),
            None => format!("{}'s {} finds no target", caster.name(), ability.name()),
        }
    }

    /// The token a challenge against `target` is checked against.
    ///
    /// Bosses use their own token. Any other target uses the token of the
    /// first conscious boss.
    fn challenge_token(&self, target: &str) -> Option<String> {
        let boss = match self.boss(target) {
            Some(boss) => Some(boss),
            None => self.bosses.iter().find(|b| b.is_conscious()),
        };
        boss.and_then(|b| b.as_boss())
            .and_then(|state| state.opportunity_token())
            .map(str::to_string)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Current round; 0 before the first [`BossBattle::next_round`].
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Looks up a player.
    #[must_use]
    pub fn player(&self, name: &str) -> Option<&Character> {
        self.players.get(name)
    }

    /// Looks up a boss by its final, unique name.
    #[must_use]
    pub fn boss(&self, name: &str) -> Option<&Character> {
        self.boss_index.get(name).and_then(|&i| self.bosses.get(i))
    }

    /// Looks up any participant. Names never repeat across sides.
    #[must_use]
    pub fn character(&self, name: &str) -> Option<&Character> {
        self.boss(name).or_else(|| self.player(name))
    }

    /// Players ordered by name.
    pub fn players(&self) -> impl Iterator<Item = &Character> {
        self.players.values()
    }

    /// Bosses in registration order.
    #[must_use]
    pub fn bosses(&self) -> &[Character] {
        &self.bosses
    }

    /// True if the player has an applied action this round.
    #[must_use]
    pub fn has_acted(&self, name: &str) -> bool {
        self.acted.contains(name)
    }

    /// Looks up an ability in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidAbility`] for unknown identifiers.
    pub fn get_ability(&self, id: &AbilityId) -> Result<Arc<dyn Ability>, BattleError> {
        self.registry
            .get(id)
            .cloned()
            .ok_or_else(|| BattleError::InvalidAbility(id.clone()))
    }

    /// Newest opportunity token of a boss. None while the boss is down,
    /// since it gets no fresh token until it is back up.
    #[must_use]
    pub fn opportunity_token(&self, boss: &str) -> Option<&str> {
        self.boss(boss)
            .filter(|boss| boss.is_conscious())
            .and_then(Character::as_boss)
            .and_then(|state| state.opportunity_token())
    }

    /// Current tokens as `name:token`, in registration order. Bosses that
    /// are down or have never been issued a token are left out.
    #[must_use]
    pub fn opportunity_tokens(&self) -> Vec<String> {
        self.bosses
            .iter()
            .filter(|boss| boss.is_conscious())
            .filter_map(|boss| {
                let token = boss.as_boss()?.opportunity_token()?;
                Some(format!("{}:{}", boss.name(), token))
            })
            .collect()
    }
}

impl std::fmt::Debug for BossBattle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BossBattle")
            .field("round", &self.round)
            .field("players", &self.players.keys().collect::<Vec<_>>())
            .field(
                "bosses",
                &self.bosses.iter().map(Character::name).collect::<Vec<_>>(),
            )
            .field("acted", &self.acted)
            .finish_non_exhaustive()
    }
}

fn validate_boss(boss: &Character, registry: &AbilityRegistry) -> Result<(), BattleError> {
    let Some(state) = boss.as_boss() else {
        return Err(BattleError::MisconfiguredBoss {
            boss: boss.name().to_string(),
            reason: "not a boss".into(),
        });
    };
    if state.ability_set.is_empty() && !state.kind.is_passive() {
        return Err(BattleError::MisconfiguredBoss {
            boss: boss.name().to_string(),
            reason: "empty ability set".into(),
        });
    }
    if let Some(missing) = state.ability_set.iter().find(|id| !registry.contains(id)) {
        return Err(BattleError::MisconfiguredBoss {
            boss: boss.name().to_string(),
            reason: format!("ability '{missing}' is not registered"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{BossKind, BossState};
    use crate::dice::ScriptedDice;

    fn registry() -> Arc<AbilityRegistry> {
        Arc::new(AbilityRegistry::with_defaults())
    }

    fn battle(players: &[&str], bosses: Vec<Character>, faces: &[u32]) -> BossBattle {
        let players = players.iter().map(|n| Character::fighter(*n)).collect();
        BossBattle::new(players, bosses, registry(), 1)
            .unwrap()
            .with_dice(Box::new(ScriptedDice::new(faces.iter().copied()).then_always(10)))
    }

    fn punch(caster: &str, target: &str) -> ActionRequest {
        ActionRequest::new(caster, AbilityId::new("punch"), target)
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn same_kind_bosses_are_numbered() {
            let bosses = vec![
                BossKind::Squirrel.spawn(),
                BossKind::Squirrel.spawn(),
                BossKind::Squirrel.spawn(),
            ];
            let battle = battle(&["alice"], bosses, &[]);

            let names: Vec<_> = battle.bosses().iter().map(Character::name).collect();
            assert_eq!(names, vec!["squirrel1", "squirrel2", "squirrel3"]);
            assert!(battle.boss("squirrel").is_none());
            assert!(battle.boss("squirrel2").is_some());
        }

        #[test]
        fn duplicate_players_are_rejected() {
            let result = BossBattle::new(
                vec![Character::fighter("a"), Character::fighter("a")],
                vec![BossKind::Squirrel.spawn()],
                registry(),
                0,
            );
            assert_eq!(result.unwrap_err(), BattleError::DuplicateName("a".into()));
        }

        #[test]
        fn boss_with_unregistered_ability_is_rejected() {
            let boss = Character::boss(
                "rat",
                crate::dice::Die::new(1, 4),
                BossKind::Squirrel.stats(),
                0,
                BossState::new(BossKind::Squirrel, vec![AbilityId::new("gnaw")]),
            );
            let result = BossBattle::new(vec![Character::fighter("a")], vec![boss], registry(), 0);
            assert!(matches!(result, Err(BattleError::MisconfiguredBoss { .. })));
        }

        #[test]
        fn attacking_boss_without_abilities_is_rejected() {
            let boss = Character::boss(
                "rat",
                crate::dice::Die::new(1, 4),
                BossKind::Squirrel.stats(),
                0,
                BossState::new(BossKind::Squirrel, Vec::new()),
            );
            let result = BossBattle::new(vec![Character::fighter("a")], vec![boss], registry(), 0);
            assert!(matches!(result, Err(BattleError::MisconfiguredBoss { .. })));
        }

        #[test]
        fn player_named_like_a_boss_is_rejected() {
            let result = BossBattle::new(
                vec![Character::fighter("squirrel")],
                vec![BossKind::Squirrel.spawn()],
                registry(),
                0,
            );
            assert_eq!(result.unwrap_err(), BattleError::DuplicateName("squirrel".into()));
        }

        #[test]
        fn player_may_share_a_base_name_once_bosses_are_numbered() {
            let battle = battle(
                &["squirrel"],
                vec![BossKind::Squirrel.spawn(), BossKind::Squirrel.spawn()],
                &[],
            );
            assert!(battle.character("squirrel").is_some_and(Character::is_player));
        }

        #[test]
        fn passive_dummy_needs_no_abilities() {
            let result = BossBattle::new(
                vec![Character::fighter("a")],
                vec![BossKind::PracticeDummy.spawn()],
                registry(),
                0,
            );
            assert!(result.is_ok());
        }
    }

    mod round_tests {
        use super::*;

        #[test]
        fn downed_boss_shows_no_token() {
            let mut battle = battle(
                &["alice"],
                vec![BossKind::Squirrel.spawn(), BossKind::PracticeDummy.spawn()],
                &[20, 1, 1],
            );
            battle.next_round();
            assert!(battle.opportunity_token("squirrel").is_some());

            battle.handle_action(&punch("alice", "squirrel")).unwrap();
            assert!(!battle.boss("squirrel").unwrap().is_conscious());

            assert_eq!(battle.opportunity_token("squirrel"), None);
            let tokens = battle.opportunity_tokens();
            assert_eq!(tokens.len(), 1);
            assert!(tokens[0].starts_with("dummy:"));
        }

        #[test]
        fn tokens_are_issued_each_round() {
            let mut battle = battle(&["alice"], vec![BossKind::PracticeDummy.spawn()], &[]);
            assert_eq!(battle.round(), 0);
            assert_eq!(battle.opportunity_token("dummy"), None);
            assert!(battle.opportunity_tokens().is_empty());

            assert!(battle.next_round());
            let first = battle.opportunity_token("dummy").unwrap().to_string();
            assert_eq!(first.len(), 4);
            assert_eq!(battle.opportunity_tokens(), vec![format!("dummy:{first}")]);

            assert!(battle.next_round());
            let history = battle.boss("dummy").unwrap().as_boss().unwrap().token_history();
            assert_eq!(history.len(), 2);
            assert_eq!(history[0], first);
            assert_eq!(battle.round(), 2);
        }

        #[test]
        fn next_round_stops_when_bosses_are_down() {
            // crit, then 1 + 1 + 3 kills the squirrel
            let mut battle = battle(&["alice"], vec![BossKind::Squirrel.spawn()], &[20, 1, 1]);
            assert!(battle.next_round());
            battle.handle_action(&punch("alice", "squirrel")).unwrap();
            assert!(!battle.should_continue());
            assert!(!battle.next_round());
            assert_eq!(battle.round(), 1);
        }

        #[test]
        fn next_round_stops_without_players() {
            let mut battle = battle(&[], vec![BossKind::Squirrel.spawn()], &[]);
            assert!(!battle.next_round());
        }

        #[test]
        fn next_round_clears_acted() {
            let mut battle = battle(&["alice"], vec![BossKind::PracticeDummy.spawn()], &[]);
            battle.next_round();
            battle.handle_action(&punch("alice", "dummy")).unwrap();
            assert!(battle.has_acted("alice"));
            battle.next_round();
            assert!(!battle.has_acted("alice"));
        }
    }

    mod action_tests {
        use super::*;

        #[test]
        fn second_action_is_turn_already_taken() {
            let mut battle = battle(&["alice"], vec![BossKind::PracticeDummy.spawn()], &[10, 1]);
            battle.next_round();

            let first = battle.handle_action(&punch("alice", "dummy")).unwrap();
            assert!(first.is_applied());
            assert_eq!(battle.boss("dummy").unwrap().current_health(), 496);

            let second = battle.handle_action(&punch("alice", "dummy"));
            assert_eq!(second, Err(BattleError::TurnAlreadyTaken("alice".into())));
            assert_eq!(battle.boss("dummy").unwrap().current_health(), 496);
        }

        #[test]
        fn wrong_token_is_rejected_without_using_the_turn() {
            let mut battle = battle(&["alice"], vec![BossKind::PracticeDummy.spawn()], &[]);
            battle.next_round();
            let token = battle.opportunity_token("dummy").unwrap().to_string();

            let wrong = ActionRequest::new("alice", AbilityId::new("sstrike"), "dummy")
                .with_solve_token("nope");
            let outcome = battle.handle_action(&wrong).unwrap();
            assert!(matches!(outcome, ActionOutcome::Rejected(_)));
            assert!(!battle.has_acted("alice"));
            assert_eq!(battle.boss("dummy").unwrap().current_health(), 500);

            let right = ActionRequest::new("alice", AbilityId::new("sstrike"), "dummy")
                .with_solve_token(token);
            assert!(battle.handle_action(&right).unwrap().is_applied());
            assert!(battle.has_acted("alice"));
        }

        #[test]
        fn heal_on_ally_uses_first_boss_token() {
            let mut battle = battle(&["alice", "bob"], vec![BossKind::PracticeDummy.spawn()], &[4]);
            battle.next_round();
            let reversed: String = battle
                .opportunity_token("dummy")
                .unwrap()
                .chars()
                .rev()
                .collect();

            let heal = ActionRequest::new("alice", AbilityId::new("heal"), "bob")
                .with_solve_token(reversed);
            let outcome = battle.handle_action(&heal).unwrap();
            assert!(outcome.message().contains("alice heals bob"), "{}", outcome.message());
        }

        #[test]
        fn validation_errors() {
            let mut battle = battle(&["alice"], vec![BossKind::PracticeDummy.spawn()], &[]);
            battle.next_round();

            assert_eq!(
                battle.handle_action(&punch("zed", "dummy")),
                Err(BattleError::UnknownCaster("zed".into()))
            );
            assert_eq!(
                battle.handle_action(&punch("alice", "nobody")),
                Err(BattleError::TargetNotFound("nobody".into()))
            );
            assert_eq!(
                battle.handle_action(&ActionRequest::new("alice", AbilityId::new("nuke"), "dummy")),
                Err(BattleError::InvalidAbility(AbilityId::new("nuke")))
            );
            assert!(!battle.has_acted("alice"));
        }

        #[test]
        fn unconscious_caster_cannot_act() {
            let mut players = vec![Character::fighter("alice")];
            players[0].take_damage(100);
            let mut battle = BossBattle::new(
                players,
                vec![BossKind::PracticeDummy.spawn()],
                registry(),
                0,
            )
            .unwrap();
            assert_eq!(
                battle.handle_action(&punch("alice", "dummy")),
                Err(BattleError::CasterUnconscious("alice".into()))
            );
        }
    }

    mod boss_turn_tests {
        use super::*;

        #[test]
        fn dummy_revives_and_doubles() {
            let bosses = vec![BossKind::PracticeDummy.spawn_with_hit_die(crate::dice::Die::new(1, 1))];
            let mut battle = battle(&["alice"], bosses, &[20, 2, 2]);
            battle.next_round();
            battle.handle_action(&punch("alice", "dummy")).unwrap();
            assert!(!battle.boss("dummy").unwrap().is_conscious());

            let log = battle.bosses_turn();
            assert!(log.contains("dummy"), "{log}");
            let dummy = battle.boss("dummy").unwrap();
            assert!(dummy.is_conscious());
            assert_eq!(dummy.current_health(), dummy.max_health());
        }

        #[test]
        fn downed_squirrel_is_skipped() {
            let mut battle = battle(
                &["alice"],
                vec![BossKind::Squirrel.spawn(), BossKind::PracticeDummy.spawn()],
                &[20, 1, 1],
            );
            battle.next_round();
            battle.handle_action(&punch("alice", "squirrel")).unwrap();

            let log = battle.bosses_turn();
            assert_eq!(log.lines().count(), 1, "{log}");
            assert!(log.starts_with("dummy"));
        }

        #[test]
        fn spider_attacks_a_player() {
            let mut battle = battle(&["alice"], vec![BossKind::GiantWolfSpider.spawn()], &[20, 6, 6]);
            battle.next_round();
            let log = battle.bosses_turn();
            assert!(log.contains("giant wolf spider inflicts"), "{log}");
            assert!(battle.player("alice").unwrap().current_health() < 12);
        }

        #[test]
        fn boss_actions_only_land_on_players() {
            let mut battle = battle(&["alice"], vec![BossKind::GiantWolfSpider.spawn()], &[20, 6, 6]);
            battle.next_round();
            let before = battle.boss("giant wolf spider").unwrap().current_health();

            let request = ActionRequest::new(
                "giant wolf spider",
                AbilityId::new("wolfspiderbite"),
                "giant wolf spider",
            );
            let line = battle.resolve_boss_action(0, &request);

            assert_eq!(line, "giant wolf spider loses track of giant wolf spider");
            assert_eq!(battle.boss("giant wolf spider").unwrap().current_health(), before);
        }
    }
}
