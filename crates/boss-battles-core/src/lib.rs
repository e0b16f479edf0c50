//! # Boss Battles Core
//!
//! Engine for live, turn-based boss encounters driven by short text
//! commands from a room full of players.
//!
//! ## Architecture
//!
//! - **Model**: [`stats`], [`dice`], [`character`]
//! - **Abilities**: the [`ability`] registry and challenge protocol, with the
//!   built-in catalog in [`abilities`]
//! - **Input**: [`command`] parsing, one line at a time
//! - **Combat**: [`battle::BossBattle`] owns an encounter and resolves
//!   actions through [`battle::CombatResolver`]
//! - **Server**: [`server::EncounterServer`] runs the phase state machine
//!   over a [`server::Reader`] and a [`server::Renderer`]
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use boss_battles_core::ability::AbilityRegistry;
//! use boss_battles_core::config::EncounterConfig;
//! use boss_battles_core::server::{EncounterServer, QueueReader, RecordingRenderer};
//!
//! let mut server = EncounterServer::new(
//!     EncounterConfig::default(),
//!     Arc::new(AbilityRegistry::with_defaults()),
//!     QueueReader::new(),
//!     RecordingRenderer::new(),
//! );
//! server.start().unwrap();
//! server.tick();
//! assert!(server.is_running());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod abilities;
pub mod ability;
pub mod battle;
pub mod character;
pub mod command;
pub mod config;
pub mod dice;
pub mod server;
pub mod stats;
pub mod token;

pub use ability::{Ability, AbilityId, AbilityRegistry};
pub use battle::{ActionOutcome, ActionRequest, BattleError, BossBattle};
pub use character::{BossKind, Character};
pub use command::{Command, CommandError};
pub use config::{ConfigError, EncounterConfig};
pub use server::{EncounterServer, EncounterSnapshot, Phase};

#[cfg(test)]
mod tests;
