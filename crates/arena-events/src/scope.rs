//! Mutable view of game state handed to an event transition.

use std::collections::BTreeSet;

use arena_types::{Game, Player, PlayerId};

use crate::random::RandomSource;

/// Everything a transition function may read or mutate.
///
/// The scope exposes the acting player directly and the other living
/// players ("rivals") through accessors that record which of them were
/// mutated, so the caller knows exactly which records to persist after
/// the transition returns.
pub struct EventScope<'a> {
    /// The game the event happens in (read-only).
    pub game: &'a Game,
    /// The player this event is applied to.
    pub player: &'a mut Player,
    /// Randomness for probability rolls inside the transition.
    pub rng: &'a mut dyn RandomSource,
    rivals: &'a mut [Player],
    touched: BTreeSet<PlayerId>,
}

impl<'a> EventScope<'a> {
    /// Build a scope over the acting player and the other living players.
    pub fn new(
        game: &'a Game,
        player: &'a mut Player,
        rivals: &'a mut [Player],
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            game,
            player,
            rng,
            rivals,
            touched: BTreeSet::new(),
        }
    }

    /// Number of other living players available to interact with.
    pub const fn rival_count(&self) -> usize {
        self.rivals.len()
    }

    /// Read-only access to a rival by index.
    pub fn rival(&self, index: usize) -> Option<&Player> {
        self.rivals.get(index)
    }

    /// Mutable access to a rival by index. Marks the rival as touched so
    /// the engine caller persists it.
    pub fn rival_mut(&mut self, index: usize) -> Option<&mut Player> {
        let id = self.rivals.get(index)?.id;
        self.touched.insert(id);
        self.rivals.get_mut(index)
    }

    /// Consume the scope, returning the ids of all mutated rivals.
    pub fn into_touched(self) -> BTreeSet<PlayerId> {
        self.touched
    }
}
