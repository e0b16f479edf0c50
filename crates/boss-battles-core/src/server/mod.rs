//! Encounter server: the phase state machine.
//!
//! The `EncounterServer` drives one encounter from registration to the end
//! through a single-threaded tick loop:
//!
//! 1. **DRAIN**: pull every buffered line from the [`Reader`]
//! 2. **PHASE**: run exactly one phase handler with those lines
//! 3. **RENDER**: hand an [`EncounterSnapshot`] to the [`Renderer`]
//!
//! # Phases
//!
//! ```text
//! Registration --done--> RoundInit --> PlayerTurn --timer--> BossTurn --+
//!                            ^                                          |
//!                            +------------------------------------------+
//! RoundInit --one side down--> Ended
//! ```
//!
//! Lines that arrive during `RoundInit` or `BossTurn` are dropped; players
//! act only in `PlayerTurn`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use boss_battles_core::ability::AbilityRegistry;
//! use boss_battles_core::config::EncounterConfig;
//! use boss_battles_core::server::{EncounterServer, Phase, QueueReader, RecordingRenderer};
//!
//! let config = EncounterConfig::default().with_seed(1);
//! let mut server = EncounterServer::new(
//!     config,
//!     Arc::new(AbilityRegistry::with_defaults()),
//!     QueueReader::new(),
//!     RecordingRenderer::new(),
//! );
//! server.start().unwrap();
//!
//! server.reader_mut().push("alice/register");
//! server.reader_mut().push("done");
//! assert_eq!(server.tick(), Phase::RoundInit);
//! assert_eq!(server.tick(), Phase::PlayerTurn);
//! assert_eq!(server.battle().unwrap().round(), 1);
//! ```

mod clock;
mod io;
mod snapshot;

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::ability::AbilityRegistry;
use crate::battle::{ActionOutcome, BossBattle};
use crate::character::{unique_boss_names, Character, CharacterClass};
use crate::command::{self, Command};
use crate::config::EncounterConfig;
use crate::dice::DiceRoller;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use io::{QueueReader, Reader, ReaderError, RecordingRenderer, Renderer};
pub use snapshot::{BossSnapshot, EncounterSnapshot, Phase, PlayerSnapshot};

// =============================================================================
// Message Log
// =============================================================================

/// A bounded log that drops its oldest entries.
#[derive(Debug, Clone)]
struct MessageLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl MessageLog {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message.into());
    }

    fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

// =============================================================================
// Encounter Server
// =============================================================================

/// Tick-driven phase state machine around a [`BossBattle`].
pub struct EncounterServer<R, W> {
    config: EncounterConfig,
    seed: u64,
    registry: Arc<AbilityRegistry>,
    reader: R,
    renderer: W,
    clock: Box<dyn Clock>,
    dice: Option<Box<dyn DiceRoller>>,

    phase: Phase,
    phase_started: Duration,
    registered: Vec<String>,
    boss_names: Vec<String>,
    battle: Option<BossBattle>,

    player_messages: MessageLog,
    boss_messages: MessageLog,
    error_messages: MessageLog,
}

impl<R: Reader, W: Renderer> EncounterServer<R, W> {
    /// Creates a server in the registration phase.
    ///
    /// Without a configured seed, one is drawn from the OS and logged so the
    /// encounter can be replayed.
    pub fn new(config: EncounterConfig, registry: Arc<AbilityRegistry>, reader: R, renderer: W) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, bosses = ?config.bosses, "encounter server created");
        let history = config.message_history;
        let base_names: Vec<&str> = config.bosses.iter().map(|kind| kind.base_name()).collect();
        let boss_names = unique_boss_names(&base_names);
        Self {
            config,
            seed,
            registry,
            reader,
            renderer,
            clock: Box::new(MonotonicClock::new()),
            dice: None,
            phase: Phase::Registration,
            phase_started: Duration::ZERO,
            registered: Vec::new(),
            boss_names,
            battle: None,
            player_messages: MessageLog::new(history),
            boss_messages: MessageLog::new(history),
            error_messages: MessageLog::new(history),
        }
    }

    /// Replaces the clock used for the turn timer.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the dice the encounter will be built with.
    #[must_use]
    pub fn with_dice(mut self, dice: Box<dyn DiceRoller>) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Opens the reader.
    ///
    /// # Errors
    ///
    /// Propagates the reader's error.
    pub fn start(&mut self) -> Result<(), ReaderError> {
        self.reader.open()?;
        self.phase_started = self.clock.now();
        info!(phase = %self.phase, "encounter server started");
        Ok(())
    }

    /// Closes the reader. The encounter state is kept for inspection.
    pub fn shutdown(&mut self) {
        self.reader.close();
        info!(phase = %self.phase, round = self.round(), "encounter server stopped");
    }

    /// Runs one tick and returns the phase it leaves the server in.
    pub fn tick(&mut self) -> Phase {
        let lines = self.reader.read();

        match self.phase {
            Phase::Registration => self.registration(lines),
            Phase::RoundInit => {
                self.drop_lines(&lines);
                self.round_init();
            }
            Phase::PlayerTurn => self.player_turn(lines),
            Phase::BossTurn => {
                self.drop_lines(&lines);
                self.boss_turn();
            }
            Phase::Ended => self.drop_lines(&lines),
        }

        let snapshot = self.snapshot();
        self.renderer.render(&snapshot);
        self.phase
    }

    /// True until the encounter has ended.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Ended
    }

    // -------------------------------------------------------------------------
    // Phase handlers
    // -------------------------------------------------------------------------

    fn registration(&mut self, lines: Vec<String>) {
        for line in lines {
            if command::is_done(&line) {
                if self.registered.is_empty() {
                    self.error_messages.push("Error: nobody has registered yet.");
                    continue;
                }
                self.begin_battle();
                return;
            }

            match command::parse_registration(&line) {
                Ok(name) if self.registered.contains(&name) => {
                    self.error_messages.push(format!("Error: {name} already added."));
                }
                Ok(name) if self.boss_names.contains(&name) => {
                    self.error_messages.push(format!("Error: {name} is taken by a boss."));
                }
                Ok(name) => {
                    info!(%name, "player registered");
                    self.player_messages
                        .push(format!("Welcome {}!", name.to_uppercase()));
                    self.registered.push(name);
                }
                Err(err) => debug!(%line, %err, "ignoring line during registration"),
            }
        }
    }

    fn begin_battle(&mut self) {
        let class = self.config.player_class;
        let players = self
            .registered
            .iter()
            .map(|name| Character::with_class(name.as_str(), class))
            .collect();
        let bosses = self.config.bosses.iter().map(|kind| kind.spawn()).collect();

        match BossBattle::new(players, bosses, Arc::clone(&self.registry), self.seed) {
            Ok(battle) => {
                let mut battle = battle.with_token_length(self.config.token_length);
                if let Some(dice) = self.dice.take() {
                    battle = battle.with_dice(dice);
                }
                self.battle = Some(battle);
                self.enter(Phase::RoundInit);
            }
            Err(err) => {
                error!(%err, "could not build encounter");
                self.error_messages.push(format!("Error: {err}"));
                self.enter(Phase::Ended);
            }
        }
    }

    fn round_init(&mut self) {
        let Some(battle) = self.battle.as_mut() else {
            self.enter(Phase::Ended);
            return;
        };

        if battle.next_round() {
            self.enter(Phase::PlayerTurn);
            return;
        }

        let verdict = if battle.players().any(Character::is_conscious) {
            "The bosses have been defeated!"
        } else {
            "The party has fallen."
        };
        self.player_messages.push(verdict);
        self.enter(Phase::Ended);
    }

    fn player_turn(&mut self, lines: Vec<String>) {
        let Some(battle) = self.battle.as_mut() else {
            self.enter(Phase::Ended);
            return;
        };

        let mut seen = HashSet::new();
        for line in lines {
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(err) => {
                    warn!(%line, %err, "malformed command");
                    self.error_messages.push(format!("Error: {err}"));
                    continue;
                }
            };
            if !seen.insert(command.user.clone()) {
                debug!(user = %command.user, "extra command in the same tick dropped");
                continue;
            }

            let request = match command.into_request() {
                Ok(request) => request,
                Err(err) => {
                    self.error_messages.push(format!("Error: {err}"));
                    continue;
                }
            };

            match battle.handle_action(&request) {
                Ok(ActionOutcome::Applied(message)) => self.player_messages.push(message),
                Ok(ActionOutcome::Rejected(message)) => self.error_messages.push(message),
                Err(err) => {
                    warn!(%err, "action refused");
                    self.error_messages.push(format!("Error: {err}"));
                }
            }
        }

        if self.elapsed() >= self.config.turn_time() {
            self.enter(Phase::BossTurn);
        }
    }

    fn boss_turn(&mut self) {
        if let Some(battle) = self.battle.as_mut() {
            for line in battle.bosses_turn().lines() {
                self.boss_messages.push(line);
            }
        }
        self.enter(Phase::RoundInit);
    }

    fn drop_lines(&self, lines: &[String]) {
        if !lines.is_empty() {
            debug!(count = lines.len(), phase = %self.phase, "dropping input outside player turn");
        }
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = %self.phase, to = %phase, round = self.round(), "phase change");
        self.phase = phase;
        self.phase_started = self.clock.now();
    }

    fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.phase_started)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round, 0 before the battle starts.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.battle.as_ref().map_or(0, BossBattle::round)
    }

    /// Seed the encounter runs with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    /// Class every registered player is built with.
    #[must_use]
    pub const fn player_class(&self) -> CharacterClass {
        self.config.player_class
    }

    /// The battle, once registration is done.
    #[must_use]
    pub fn battle(&self) -> Option<&BossBattle> {
        self.battle.as_ref()
    }

    /// The input channel.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// The renderer.
    #[must_use]
    pub const fn renderer(&self) -> &W {
        &self.renderer
    }

    /// Captures the current state for display.
    #[must_use]
    pub fn snapshot(&self) -> EncounterSnapshot {
        let (bosses, players) = match &self.battle {
            Some(battle) => (
                battle
                    .bosses()
                    .iter()
                    .map(|boss| BossSnapshot {
                        name: boss.name().to_string(),
                        health: boss.current_health(),
                        max_health: boss.max_health(),
                        token: battle.opportunity_token(boss.name()).map(str::to_string),
                    })
                    .collect(),
                battle
                    .players()
                    .map(|player| PlayerSnapshot {
                        name: player.name().to_string(),
                        health: player.current_health(),
                        max_health: player.max_health(),
                        acted: battle.has_acted(player.name()),
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let remaining_turn_ms = (self.phase == Phase::PlayerTurn).then(|| {
            let left = self.config.turn_time().saturating_sub(self.elapsed());
            u64::try_from(left.as_millis()).unwrap_or(u64::MAX)
        });

        EncounterSnapshot {
            phase: self.phase,
            round: self.round(),
            registered: self.registered.clone(),
            bosses,
            players,
            remaining_turn_ms,
            player_messages: self.player_messages.to_vec(),
            boss_messages: self.boss_messages.to_vec(),
            error_messages: self.error_messages.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_log_drops_oldest() {
        let mut log = MessageLog::new(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.to_vec(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn message_log_capacity_is_at_least_one() {
        let mut log = MessageLog::new(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.to_vec(), vec!["b".to_string()]);
    }
}
