//! Renderers for the terminal.
//!
//! Both print only when the frame differs from the last one printed, so a
//! 100 ms tick does not flood stdout.

use std::io::Write;

use boss_battles_core::server::{EncounterSnapshot, Phase, Renderer};
use tracing::warn;

/// Plain text frames.
#[derive(Debug, Default)]
pub struct TextRenderer {
    last: Option<String>,
}

impl TextRenderer {
    /// Creates a renderer that has printed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, snapshot: &EncounterSnapshot) {
        let frame = format_frame(snapshot);
        if self.last.as_deref() == Some(frame.as_str()) {
            return;
        }
        let mut out = std::io::stdout().lock();
        if let Err(err) = writeln!(out, "{frame}").and_then(|()| out.flush()) {
            warn!(%err, "failed to write frame");
        }
        self.last = Some(frame);
    }
}

/// One JSON object per changed snapshot.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    last: Option<EncounterSnapshot>,
}

impl JsonRenderer {
    /// Creates a renderer that has printed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for JsonRenderer {
    fn render(&mut self, snapshot: &EncounterSnapshot) {
        if self.last.as_ref() == Some(snapshot) {
            return;
        }
        match serde_json::to_string(snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!(%err, "failed to serialize snapshot"),
        }
        self.last = Some(snapshot.clone());
    }
}

/// Formats a snapshot as a text frame.
///
/// Remaining turn time is shown in whole seconds, rounded up, so the frame
/// changes at most once a second while players think.
pub fn format_frame(snapshot: &EncounterSnapshot) -> String {
    let mut lines = Vec::new();

    match snapshot.phase {
        Phase::Registration => {
            lines.push("== REGISTRATION == send <name>/register, then done".to_string());
            lines.push(format!("registered: {}", snapshot.registered.join(", ")));
        }
        phase => {
            let mut header = format!("== ROUND {} == {}", snapshot.round, phase);
            if let Some(ms) = snapshot.remaining_turn_ms {
                header.push_str(&format!(" ({}s left)", ms.div_ceil(1000)));
            }
            lines.push(header);
            for boss in &snapshot.bosses {
                lines.push(format!(
                    "  {:<20} {:>4}/{:<4} token: {}",
                    boss.name,
                    boss.health,
                    boss.max_health,
                    boss.token.as_deref().unwrap_or("-")
                ));
            }
            for player in &snapshot.players {
                lines.push(format!(
                    "  {:<20} {:>4}/{:<4}{}",
                    player.name,
                    player.health,
                    player.max_health,
                    if player.acted { " (acted)" } else { "" }
                ));
            }
            if phase == Phase::PlayerTurn {
                lines.push(format!("tokens: {}", snapshot.tokens().join(" ")));
            }
        }
    }

    for (label, messages) in [
        ("player", &snapshot.player_messages),
        ("boss", &snapshot.boss_messages),
        ("error", &snapshot.error_messages),
    ] {
        if let Some(last) = messages.last() {
            lines.push(format!("[{label}] {last}"));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use boss_battles_core::server::{BossSnapshot, PlayerSnapshot};

    fn snapshot(remaining_turn_ms: Option<u64>) -> EncounterSnapshot {
        EncounterSnapshot {
            phase: Phase::PlayerTurn,
            round: 3,
            registered: vec!["alice".into()],
            bosses: vec![BossSnapshot {
                name: "dummy".into(),
                health: 496,
                max_health: 500,
                token: Some("k3ax".into()),
            }],
            players: vec![PlayerSnapshot {
                name: "alice".into(),
                health: 12,
                max_health: 12,
                acted: true,
            }],
            remaining_turn_ms,
            player_messages: vec!["alice inflicts 4".into()],
            boss_messages: Vec::new(),
            error_messages: Vec::new(),
        }
    }

    #[test]
    fn frame_shows_tokens_and_time() {
        let frame = format_frame(&snapshot(Some(4200)));
        assert!(frame.starts_with("== ROUND 3 == player turn (5s left)"), "{frame}");
        assert!(frame.contains("token: k3ax"));
        assert!(frame.contains("tokens: dummy:k3ax"));
        assert!(frame.contains("(acted)"));
        assert!(frame.ends_with("[player] alice inflicts 4"));
    }

    #[test]
    fn sub_second_changes_do_not_change_the_frame() {
        assert_eq!(
            format_frame(&snapshot(Some(4100))),
            format_frame(&snapshot(Some(4900)))
        );
    }
}
