//! Immutable views of encounter state handed to renderers.

use std::fmt;

use serde::Serialize;

/// Phase of the encounter state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Collecting `<name>/register` lines until `done`.
    Registration,
    /// Starting the next round, or ending the encounter.
    RoundInit,
    /// Accepting player actions until the turn timer runs out.
    PlayerTurn,
    /// Bosses act once.
    BossTurn,
    /// One side is down. Terminal.
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Registration => "registration",
            Self::RoundInit => "round init",
            Self::PlayerTurn => "player turn",
            Self::BossTurn => "boss turn",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// One boss as shown on the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BossSnapshot {
    /// Unique boss name.
    pub name: String,
    /// Current health.
    pub health: i32,
    /// Max health.
    pub max_health: i32,
    /// Current opportunity token.
    pub token: Option<String>,
}

/// One player as shown on the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    /// Player name.
    pub name: String,
    /// Current health.
    pub health: i32,
    /// Max health.
    pub max_health: i32,
    /// True once the player's action this round has been applied.
    pub acted: bool,
}

/// Everything a renderer may show, captured once per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncounterSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Current round; 0 until the first round starts.
    pub round: u32,
    /// Registered player names in registration order.
    pub registered: Vec<String>,
    /// Bosses in registration order. Empty during registration.
    pub bosses: Vec<BossSnapshot>,
    /// Players ordered by name. Empty during registration.
    pub players: Vec<PlayerSnapshot>,
    /// Milliseconds left in the player turn, only during that phase.
    pub remaining_turn_ms: Option<u64>,
    /// Recent successful player actions and welcomes, oldest first.
    pub player_messages: Vec<String>,
    /// Recent boss turn lines, oldest first.
    pub boss_messages: Vec<String>,
    /// Recent errors, oldest first.
    pub error_messages: Vec<String>,
}

impl EncounterSnapshot {
    /// Current tokens as `name:token`.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.bosses
            .iter()
            .filter_map(|b| b.token.as_ref().map(|t| format!("{}:{}", b.name, t)))
            .collect()
    }
}
