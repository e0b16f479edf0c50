//! Test helpers for building encounters and driving the server.

use std::sync::Arc;
use std::time::Duration;

use crate::ability::{AbilityId, AbilityRegistry};
use crate::battle::{ActionRequest, BossBattle};
use crate::character::{BossKind, Character};
use crate::config::EncounterConfig;
use crate::dice::ScriptedDice;
use crate::server::{EncounterServer, ManualClock, Phase, QueueReader, RecordingRenderer};

/// Server type used throughout the tests.
pub type TestServer = EncounterServer<QueueReader, RecordingRenderer>;

// =============================================================================
// Battles
// =============================================================================

/// Shared registry with the built-in catalog.
pub fn default_registry() -> Arc<AbilityRegistry> {
    Arc::new(AbilityRegistry::with_defaults())
}

/// Builds a battle of fighters against the given bosses with scripted dice.
///
/// Once `faces` runs out every roll is a 10.
pub fn scripted_battle(players: &[&str], bosses: &[BossKind], faces: &[u32]) -> BossBattle {
    let players = players.iter().map(|name| Character::fighter(*name)).collect();
    let bosses = bosses.iter().map(|kind| kind.spawn()).collect();
    BossBattle::new(players, bosses, default_registry(), 0)
        .expect("valid encounter")
        .with_dice(Box::new(
            ScriptedDice::new(faces.iter().copied()).then_always(10),
        ))
}

/// Builds a seeded battle of fighters against the given bosses.
pub fn seeded_battle(players: &[&str], bosses: &[BossKind], seed: u64) -> BossBattle {
    let players = players.iter().map(|name| Character::fighter(*name)).collect();
    let bosses = bosses.iter().map(|kind| kind.spawn()).collect();
    BossBattle::new(players, bosses, default_registry(), seed).expect("valid encounter")
}

/// A request with an optional solve token.
pub fn action(caster: &str, ability: &str, target: &str, solve: Option<&str>) -> ActionRequest {
    let request = ActionRequest::new(caster, AbilityId::new(ability), target);
    match solve {
        Some(token) => request.with_solve_token(token),
        None => request,
    }
}

// =============================================================================
// Servers
// =============================================================================

/// Builds a started server with a manual clock and returns the clock handle.
pub fn test_server(config: EncounterConfig) -> (TestServer, ManualClock) {
    let clock = ManualClock::new();
    let mut server = EncounterServer::new(
        config,
        default_registry(),
        QueueReader::new(),
        RecordingRenderer::new(),
    )
    .with_clock(clock.clone());
    server.start().expect("queue reader opens");
    (server, clock)
}

/// Same as [`test_server`] with scripted dice.
pub fn scripted_server(config: EncounterConfig, faces: &[u32]) -> (TestServer, ManualClock) {
    let clock = ManualClock::new();
    let mut server = EncounterServer::new(
        config,
        default_registry(),
        QueueReader::new(),
        RecordingRenderer::new(),
    )
    .with_clock(clock.clone())
    .with_dice(Box::new(
        ScriptedDice::new(faces.iter().copied()).then_always(10),
    ));
    server.start().expect("queue reader opens");
    (server, clock)
}

/// Queues lines and runs one tick.
pub fn feed(server: &mut TestServer, lines: &[&str]) -> Phase {
    for line in lines {
        server.reader_mut().push(*line);
    }
    server.tick()
}

/// Registers `names`, sends `done`, and ticks until the first player turn.
pub fn register_and_start(server: &mut TestServer, names: &[&str]) {
    let mut lines: Vec<String> = names.iter().map(|n| format!("{n}/register")).collect();
    lines.push("done".into());
    for line in lines {
        server.reader_mut().push(line);
    }
    assert_eq!(server.tick(), Phase::RoundInit);
    assert_eq!(server.tick(), Phase::PlayerTurn);
}

/// Runs the clock past the turn budget and ticks through the boss turn.
pub fn finish_player_turn(server: &mut TestServer, clock: &ManualClock, turn: Duration) {
    clock.advance(turn);
    assert_eq!(server.tick(), Phase::BossTurn);
    assert_eq!(server.tick(), Phase::RoundInit);
}
