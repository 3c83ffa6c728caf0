//! Outbound delivery port for narratives, summaries, and endings.
//!
//! Delivery is fire-and-forget from the scheduler's perspective: a lost
//! message must never stall or kill a running game, so the trait methods
//! are infallible and implementations swallow their own transport errors.

use arena_types::{EventOutcome, Game, Player};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

/// Delivery port for everything the engine wants to tell the outside world.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// One event happened to one player.
    async fn event_narrative(&self, game: &Game, player: &Player, outcome: &EventOutcome);

    /// A day closed; `deaths` lists the players who died during it.
    async fn day_summary(&self, game: &Game, day: u32, deaths: &[Player]);

    /// The game ended. `winner` is `None` on a zero-survivor tie.
    async fn game_end(&self, game: &Game, winner: Option<&Player>);
}

/// Notifier that writes everything to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Create a log-backed notifier.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn event_narrative(&self, game: &Game, player: &Player, outcome: &EventOutcome) {
        info!(
            game_id = %game.id,
            day = game.current_day,
            player = %player.mention(),
            classification = ?outcome.classification,
            "{}",
            outcome.text
        );
    }

    async fn day_summary(&self, game: &Game, day: u32, deaths: &[Player]) {
        let fallen: Vec<String> = deaths.iter().map(Player::mention).collect();
        if fallen.is_empty() {
            info!(game_id = %game.id, day, "Day ended with no casualties");
        } else {
            info!(
                game_id = %game.id,
                day,
                fallen = fallen.join(", "),
                "Day ended"
            );
        }
    }

    async fn game_end(&self, game: &Game, winner: Option<&Player>) {
        match winner {
            Some(player) => info!(
                game_id = %game.id,
                day = game.current_day,
                winner = %player.mention(),
                "Game over"
            ),
            None => info!(
                game_id = %game.id,
                day = game.current_day,
                "Game over with no survivors"
            ),
        }
    }
}

/// Notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn event_narrative(&self, _game: &Game, _player: &Player, _outcome: &EventOutcome) {}

    async fn day_summary(&self, _game: &Game, _day: u32, _deaths: &[Player]) {}

    async fn game_end(&self, _game: &Game, _winner: Option<&Player>) {}
}

/// One delivery captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub enum Delivery {
    /// An event narrative for one player turn.
    Narrative(EventOutcome),
    /// A day summary with the day number and the fallen.
    Summary {
        /// The day that closed.
        day: u32,
        /// Mentions of the players who died that day.
        fallen: Vec<String>,
    },
    /// The game ended, with the winner's mention if there was one.
    End(Option<String>),
}

/// Notifier that records deliveries in order, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far, in order.
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn event_narrative(&self, _game: &Game, _player: &Player, outcome: &EventOutcome) {
        self.deliveries
            .lock()
            .await
            .push(Delivery::Narrative(outcome.clone()));
    }

    async fn day_summary(&self, _game: &Game, day: u32, deaths: &[Player]) {
        let fallen = deaths.iter().map(Player::mention).collect();
        self.deliveries
            .lock()
            .await
            .push(Delivery::Summary { day, fallen });
    }

    async fn game_end(&self, _game: &Game, winner: Option<&Player>) {
        self.deliveries
            .lock()
            .await
            .push(Delivery::End(winner.map(Player::mention)));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use arena_types::Player;

    use super::*;

    #[tokio::test]
    async fn recorder_preserves_delivery_order() {
        let game = Game::new(1, 2, 3, 0, 4, false);
        let mut dead = Player::new(game.id, 5);
        dead.mark_dead("poison");
        let recorder = RecordingNotifier::new();

        recorder
            .event_narrative(&game, &dead, &EventOutcome::passive("nothing happened"))
            .await;
        recorder.day_summary(&game, 1, &[dead.clone()]).await;
        recorder.game_end(&game, Some(&dead)).await;

        let deliveries = recorder.deliveries().await;
        assert_eq!(deliveries.len(), 3);
        assert!(matches!(deliveries.first(), Some(Delivery::Narrative(_))));
        match deliveries.get(1) {
            Some(Delivery::Summary { day, fallen }) => {
                assert_eq!(*day, 1);
                assert_eq!(fallen.len(), 1);
            }
            other => panic!("unexpected delivery {other:?}"),
        }
        assert!(matches!(deliveries.get(2), Some(Delivery::End(Some(_)))));
    }
}
