//! Weighted event selection and execution.

use std::sync::Arc;

use arena_types::{EventOutcome, Game, Player, PlayerId};
use tracing::debug;

use crate::catalog::EventCatalog;
use crate::error::EventError;
use crate::random::RandomSource;
use crate::scope::EventScope;

/// The result of running one event against one player.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Name of the event that was drawn.
    pub event: &'static str,
    /// Classified narrative text for the notifier.
    pub outcome: EventOutcome,
    /// Ids of rivals the transition mutated; the caller must persist
    /// these records alongside the acting player.
    pub touched: Vec<PlayerId>,
}

/// Draws events from a catalog and applies their transitions.
///
/// The engine is pure with respect to storage: it mutates the in-memory
/// records it is handed and reports which ones changed, and the caller
/// decides how to persist them.
#[derive(Debug, Clone)]
pub struct EventEngine {
    catalog: Arc<EventCatalog>,
}

impl EventEngine {
    /// Build an engine over a validated catalog.
    pub const fn new(catalog: Arc<EventCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this engine draws from.
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Draw one weighted event and apply its transition to `player`.
    ///
    /// `rivals` are the other living players in the game; a transition may
    /// mutate some of them, and their ids come back in the resolution.
    ///
    /// # Errors
    ///
    /// [`EventError::EmptyCatalog`] if no event can be drawn, and
    /// [`EventError::Configuration`] if the drawn transition produced an
    /// empty narrative.
    pub fn resolve(
        &self,
        game: &Game,
        player: &mut Player,
        rivals: &mut [Player],
        rng: &mut dyn RandomSource,
    ) -> Result<Resolution, EventError> {
        let index = rng
            .weighted(self.catalog.weights())
            .ok_or(EventError::EmptyCatalog)?;
        let def = self.catalog.get(index).ok_or(EventError::EmptyCatalog)?;

        let mut scope = EventScope::new(game, player, rivals, rng);
        let outcome = (def.transition)(&mut scope);
        let touched: Vec<PlayerId> = scope.into_touched().into_iter().collect();

        if outcome.text.trim().is_empty() {
            return Err(EventError::Configuration {
                event: def.name,
                reason: "transition produced an empty narrative".to_owned(),
            });
        }

        debug!(
            event = def.name,
            game_id = %game.id,
            player_id = %player.id,
            classification = ?outcome.classification,
            "Resolved event"
        );

        Ok(Resolution {
            event: def.name,
            outcome,
            touched,
        })
    }
}
