//! Read-only view of the party for boss decisions.

use std::collections::BTreeMap;

use crate::character::Character;

/// Immutable view of the players during the boss turn.
///
/// Bosses decide their turns against this view so they cannot mutate players
/// directly; every effect goes back through the combat resolver.
#[derive(Debug, Clone, Copy)]
pub struct PartyView<'a> {
    players: &'a BTreeMap<String, Character>,
}

impl<'a> PartyView<'a> {
    /// Creates a view over the players.
    #[must_use]
    pub fn new(players: &'a BTreeMap<String, Character>) -> Self {
        Self { players }
    }

    /// Players that are still standing, ordered by name.
    pub fn conscious_players(&self) -> impl Iterator<Item = &'a Character> + 'a {
        self.players.values().filter(|p| p.is_conscious())
    }
}
