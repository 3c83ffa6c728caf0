//! The day cycle that drives one game from start to its winner.
//!
//! One scheduler runs one game on one tokio task. Each day it spreads the
//! pending players' turns across the day's wall-clock budget, applies one
//! weighted-random event per turn, closes the day with a summary, and
//! repeats until fewer than two players are alive.
//!
//! # Restart resilience
//!
//! The scheduler keeps no authoritative state in memory. The day's time
//! budget is anchored to the persisted `day_started_at` timestamp, each
//! player's `current_day` marks their turn as taken, and both are written
//! back before the next suspension point. A scheduler started over an
//! in-flight day therefore resumes with the correct remaining budget and
//! only the players who have not had their turn yet.

use std::sync::Arc;
use std::time::Duration;

use arena_events::{EventEngine, RandomSource};
use arena_types::{Game, GameId, Player, PlayerId};
use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::SchedulerError;
use crate::notify::Notifier;
use crate::store::Store;

/// Wall-clock budget of one day, in seconds.
pub const fn day_budget_secs(day_length_minutes: u64) -> u64 {
    day_length_minutes.saturating_mul(60)
}

/// Seconds of the day budget still unspent at `now`.
///
/// Clamps to zero once the budget has elapsed, and to the full budget if
/// `day_started_at` lies in the future (clock skew after a restore).
pub fn remaining_budget_secs(
    budget_secs: u64,
    day_started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> u64 {
    let elapsed = now.signed_duration_since(day_started_at).num_seconds();
    let elapsed = u64::try_from(elapsed).unwrap_or(0);
    budget_secs.saturating_sub(elapsed)
}

/// How a scheduler run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The game reached its end state.
    Ended {
        /// The sole survivor, or `None` on a zero-survivor tie.
        winner: Option<PlayerId>,
        /// The day the game ended on.
        final_day: u32,
    },
    /// The game or a player record disappeared mid-run; the scheduler
    /// stopped quietly without touching anything else.
    Vanished,
}

/// Drives the day cycle of a single game.
pub struct DayScheduler {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    engine: EventEngine,
    rng: Box<dyn RandomSource>,
}

impl DayScheduler {
    /// Wire a scheduler to its collaborators.
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        engine: EventEngine,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            notifier,
            engine,
            rng,
        }
    }

    /// Run the game to completion.
    ///
    /// # Errors
    ///
    /// Propagates storage failures and event configuration errors. A
    /// vanished game or player is not an error; it yields
    /// [`RunOutcome::Vanished`].
    pub async fn run(mut self, game_id: GameId) -> Result<RunOutcome, SchedulerError> {
        loop {
            let game = match self.store.game(game_id).await {
                Ok(game) => game,
                Err(error) if error.is_not_found() => {
                    info!(game_id = %game_id, "Game vanished, stopping scheduler");
                    return Ok(RunOutcome::Vanished);
                }
                Err(error) => return Err(error.into()),
            };

            if game.is_ended {
                return Ok(RunOutcome::Ended {
                    winner: game.winner,
                    final_day: game.current_day,
                });
            }

            let alive = self.store.alive_players(game.id).await?;
            if alive.len() < 2 {
                return self.end_game(game).await;
            }

            let pending = self
                .store
                .pending_players(game.id, game.current_day)
                .await?;
            if pending.is_empty() {
                // A restart landed after the day's last turn but before
                // the summary was sent; close the day and go around.
                self.close_day(game).await?;
                continue;
            }

            let budget = day_budget_secs(game.day_length);
            let remaining = remaining_budget_secs(budget, game.day_started_at, Utc::now());
            debug!(
                game_id = %game.id,
                day = game.current_day,
                pending = pending.len(),
                remaining_secs = remaining,
                "Running day"
            );

            match self.run_day(&game, &pending, remaining).await? {
                Some(outcome) => return Ok(outcome),
                None => self.close_day(game).await?,
            }
        }
    }

    /// Give every pending player their turn, spread across the remaining
    /// budget. Returns `Some` if the game finished mid-day.
    async fn run_day(
        &mut self,
        game: &Game,
        pending: &[Player],
        remaining_secs: u64,
    ) -> Result<Option<RunOutcome>, SchedulerError> {
        let count = u64::try_from(pending.len()).unwrap_or(u64::MAX);
        let per_player = remaining_secs.checked_div(count).unwrap_or(0);
        let order = self.rng.shuffle_indices(pending.len());

        for index in order {
            let Some(snapshot) = pending.get(index) else {
                continue;
            };

            let offset = self.rng.below(per_player.saturating_add(1));
            sleep(Duration::from_secs(offset)).await;

            // Re-read: the player may have died in someone else's turn,
            // or a restart's predecessor may already have processed them.
            let mut player = match self.store.player(snapshot.id).await {
                Ok(player) => player,
                Err(error) if error.is_not_found() => {
                    info!(
                        game_id = %game.id,
                        player_id = %snapshot.id,
                        "Player vanished, stopping scheduler"
                    );
                    return Ok(Some(RunOutcome::Vanished));
                }
                Err(error) => return Err(error.into()),
            };

            if player.is_alive && player.current_day < game.current_day {
                self.apply_event(game, &mut player).await?;

                let alive = self.store.alive_players(game.id).await?;
                if alive.len() < 2 {
                    return self.end_game(game.clone()).await.map(Some);
                }
            }

            sleep(Duration::from_secs(per_player.saturating_sub(offset))).await;
        }

        Ok(None)
    }

    /// Resolve one event for one player and persist everyone it touched,
    /// then hand the narrative to the notifier.
    async fn apply_event(
        &mut self,
        game: &Game,
        player: &mut Player,
    ) -> Result<(), SchedulerError> {
        let mut rivals: Vec<Player> = self
            .store
            .alive_players(game.id)
            .await?
            .into_iter()
            .filter(|rival| rival.id != player.id)
            .collect();

        let resolution = self
            .engine
            .resolve(game, player, &mut rivals, &mut *self.rng)?;

        player.current_day = game.current_day;
        self.store.save_player(player).await?;

        for id in &resolution.touched {
            if let Some(rival) = rivals.iter_mut().find(|rival| rival.id == *id) {
                if !rival.is_alive {
                    // A rival killed in this turn counts toward today's
                    // summary and must not get a turn of their own.
                    rival.current_day = game.current_day;
                }
                self.store.save_player(rival).await?;
            }
        }

        self.notifier
            .event_narrative(game, player, &resolution.outcome)
            .await;
        Ok(())
    }

    /// Send the day summary, advance the day counter, and re-anchor the
    /// pacing timestamp.
    async fn close_day(&mut self, mut game: Game) -> Result<(), SchedulerError> {
        let deaths = self.store.deaths_on_day(game.id, game.current_day).await?;
        self.notifier
            .day_summary(&game, game.current_day, &deaths)
            .await;
        info!(
            game_id = %game.id,
            day = game.current_day,
            deaths = deaths.len(),
            "Day closed"
        );

        game.current_day = game.current_day.saturating_add(1);
        game.day_started_at = Utc::now();
        game.updated_at = game.day_started_at;
        self.store.save_game(&game).await?;
        Ok(())
    }

    /// Mark the game ended, crown the sole survivor, and announce it.
    async fn end_game(&mut self, mut game: Game) -> Result<RunOutcome, SchedulerError> {
        let winner = self
            .store
            .alive_players(game.id)
            .await?
            .into_iter()
            .next();

        game.is_ended = true;
        game.winner = winner.as_ref().map(|player| player.id);
        game.updated_at = Utc::now();
        self.store.save_game(&game).await?;

        self.notifier.game_end(&game, winner.as_ref()).await;
        info!(
            game_id = %game.id,
            day = game.current_day,
            winner = %winner.as_ref().map(Player::mention).unwrap_or_default(),
            "Game ended"
        );

        Ok(RunOutcome::Ended {
            winner: game.winner,
            final_day: game.current_day,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreachable)]
mod tests {
    use arena_events::{EventCatalog, SeededRandom};
    use chrono::TimeDelta;

    use super::*;
    use crate::notify::{Delivery, RecordingNotifier};
    use crate::store::MemoryStore;

    const RUN_GUARD: Duration = Duration::from_secs(30);

    fn scheduler(
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        seed: u64,
    ) -> DayScheduler {
        let catalog = Arc::new(EventCatalog::standard().unwrap());
        DayScheduler::new(
            store,
            notifier,
            EventEngine::new(catalog),
            Box::new(SeededRandom::from_seed(seed)),
        )
    }

    async fn seeded_game(store: &MemoryStore, player_count: u64) -> Game {
        let mut game = Game::new(1, 2, 3, 0, 24, false);
        game.is_started = true;
        store.create_game(game.clone()).await.unwrap();
        for user_id in 1..=player_count {
            store
                .create_player(Player::new(game.id, user_id))
                .await
                .unwrap();
        }
        game
    }

    #[test]
    fn budget_is_day_length_in_seconds() {
        assert_eq!(day_budget_secs(0), 0);
        assert_eq!(day_budget_secs(10), 600);
    }

    #[test]
    fn remaining_budget_clamps_at_zero() {
        let started = Utc::now();
        let later = started + TimeDelta::seconds(700);
        assert_eq!(remaining_budget_secs(600, started, later), 0);
    }

    #[test]
    fn remaining_budget_counts_down() {
        let started = Utc::now();
        let later = started + TimeDelta::seconds(90);
        assert_eq!(remaining_budget_secs(600, started, later), 510);
    }

    #[test]
    fn remaining_budget_is_full_right_after_day_start() {
        let started = Utc::now();
        assert_eq!(remaining_budget_secs(600, started, started), 600);
    }

    #[test]
    fn future_day_start_yields_full_budget() {
        let now = Utc::now();
        let started = now + TimeDelta::seconds(30);
        assert_eq!(remaining_budget_secs(600, started, now), 600);
    }

    #[tokio::test]
    async fn missing_game_stops_quietly() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let outcome = scheduler(Arc::clone(&store), Arc::clone(&notifier), 1)
            .run(GameId::new())
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::Vanished);
        assert!(notifier.deliveries().await.is_empty());
    }

    #[tokio::test]
    async fn lone_survivor_ends_immediately() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let game = seeded_game(&store, 2).await;

        let players = store.players_in_game(game.id).await.unwrap();
        let mut dead = players.first().unwrap().clone();
        dead.mark_dead("a wild animal");
        store.save_player(&dead).await.unwrap();
        let survivor_id = players.get(1).unwrap().id;

        let outcome = scheduler(Arc::clone(&store), Arc::clone(&notifier), 2)
            .run(game.id)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Ended {
                winner: Some(survivor_id),
                final_day: 1,
            }
        );
        let saved = store.game(game.id).await.unwrap();
        assert!(saved.is_ended);
        assert_eq!(saved.winner, Some(survivor_id));
        assert!(matches!(
            notifier.deliveries().await.first(),
            Some(Delivery::End(Some(_)))
        ));
    }

    #[tokio::test]
    async fn two_players_produce_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let game = seeded_game(&store, 2).await;

        let outcome = tokio::time::timeout(
            RUN_GUARD,
            scheduler(Arc::clone(&store), Arc::clone(&notifier), 3).run(game.id),
        )
        .await
        .unwrap()
        .unwrap();

        let RunOutcome::Ended { winner, .. } = outcome else {
            unreachable!("game must end");
        };
        let alive = store.alive_players(game.id).await.unwrap();
        assert!(alive.len() <= 1);
        assert_eq!(alive.first().map(|p| p.id), winner);
    }

    #[tokio::test]
    async fn full_cohort_runs_to_a_single_survivor() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let game = seeded_game(&store, 10).await;

        let outcome = tokio::time::timeout(
            RUN_GUARD,
            scheduler(Arc::clone(&store), Arc::clone(&notifier), 4).run(game.id),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(matches!(outcome, RunOutcome::Ended { .. }));

        let saved = store.game(game.id).await.unwrap();
        assert!(saved.is_ended);

        let players = store.players_in_game(game.id).await.unwrap();
        let alive: Vec<_> = players.iter().filter(|p| p.is_alive).collect();
        assert!(alive.len() <= 1);
        assert_eq!(saved.winner, alive.first().map(|p| p.id));
        for player in players.iter().filter(|p| !p.is_alive) {
            assert!(
                player.death_by.as_deref().is_some_and(|c| !c.is_empty()),
                "dead player without a cause of death"
            );
        }

        let deliveries = notifier.deliveries().await;
        assert!(matches!(deliveries.last(), Some(Delivery::End(_))));
    }

    #[tokio::test]
    async fn restart_with_all_turns_taken_closes_the_day_first() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let game = seeded_game(&store, 2).await;

        // Simulate a crash after both turns were processed but before the
        // summary went out.
        for player in store.players_in_game(game.id).await.unwrap() {
            let mut player = player;
            player.current_day = game.current_day;
            store.save_player(&player).await.unwrap();
        }

        let outcome = tokio::time::timeout(
            RUN_GUARD,
            scheduler(Arc::clone(&store), Arc::clone(&notifier), 5).run(game.id),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(matches!(outcome, RunOutcome::Ended { .. }));

        // No turn may be re-processed: the first delivery is day 1's
        // summary, with no casualties, before any new narrative.
        let deliveries = notifier.deliveries().await;
        match deliveries.first() {
            Some(Delivery::Summary { day, fallen }) => {
                assert_eq!(*day, 1);
                assert!(fallen.is_empty());
            }
            other => unreachable!("expected a day summary first, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn already_ended_game_is_left_untouched() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut game = seeded_game(&store, 2).await;
        game.is_ended = true;
        store.save_game(&game).await.unwrap();

        let outcome = scheduler(Arc::clone(&store), Arc::clone(&notifier), 6)
            .run(game.id)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Ended {
                winner: None,
                final_day: 1,
            }
        );
        assert!(notifier.deliveries().await.is_empty());
    }
}
