//! Game lifecycle supervision: starting games and resuming them after a
//! process restart.
//!
//! The supervisor owns a registry of running scheduler tasks keyed by
//! game id, so each game has at most one scheduler at any time. Finished
//! handles are pruned lazily whenever the registry is consulted.

use std::collections::BTreeMap;
use std::sync::Arc;

use arena_events::{EventCatalog, EventEngine, ThreadRandom};
use arena_types::GameId;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::SupervisorError;
use crate::notify::Notifier;
use crate::scheduler::DayScheduler;
use crate::store::Store;

/// Starts, resumes, and tracks day schedulers.
pub struct GameSupervisor {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    catalog: Arc<EventCatalog>,
    tasks: Mutex<BTreeMap<GameId, JoinHandle<()>>>,
}

impl GameSupervisor {
    /// Wire a supervisor to its collaborators.
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        catalog: Arc<EventCatalog>,
    ) -> Self {
        Self {
            store,
            notifier,
            catalog,
            tasks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Spawn a scheduler for every game that was mid-flight when the
    /// process last stopped. Returns how many were resumed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures from the active-games query.
    pub async fn resume_all(&self) -> Result<usize, SupervisorError> {
        let games = self.store.active_games().await?;
        let mut resumed = 0usize;
        for game in games {
            if self.launch(game.id).await {
                resumed = resumed.saturating_add(1);
            }
        }
        info!(resumed, "Resumed in-flight games");
        Ok(resumed)
    }

    /// Validate and start a game, then spawn its scheduler.
    ///
    /// # Errors
    ///
    /// Rejects games that are already started or ended, or that hold
    /// fewer than two players. Storage failures propagate.
    pub async fn start_game(&self, game_id: GameId) -> Result<(), SupervisorError> {
        let mut game = self.store.game(game_id).await?;
        if game.is_ended {
            return Err(SupervisorError::AlreadyEnded { id: game_id });
        }
        if game.is_started {
            return Err(SupervisorError::AlreadyStarted { id: game_id });
        }
        let players = self.store.players_in_game(game_id).await?;
        if players.len() < 2 {
            return Err(SupervisorError::NotEnoughPlayers {
                have: players.len(),
            });
        }

        game.is_started = true;
        game.day_started_at = Utc::now();
        game.updated_at = game.day_started_at;
        self.store.save_game(&game).await?;

        info!(game_id = %game_id, players = players.len(), "Game started");
        self.launch(game_id).await;
        Ok(())
    }

    /// Whether a scheduler task for this game is currently live.
    pub async fn is_running(&self, game_id: GameId) -> bool {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| !handle.is_finished());
        tasks.contains_key(&game_id)
    }

    /// Number of live scheduler tasks.
    pub async fn running_count(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| !handle.is_finished());
        tasks.len()
    }

    /// Block until every running scheduler has finished.
    pub async fn wait_idle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().await;
                let drained = std::mem::take(&mut *tasks);
                drained.into_values().collect()
            };
            if handles.is_empty() {
                return;
            }
            for result in futures::future::join_all(handles).await {
                if let Err(join_error) = result {
                    error!(error = %join_error, "Scheduler task aborted");
                }
            }
        }
    }

    /// Spawn a scheduler task unless one is already registered for this
    /// game. Returns whether a new task was spawned.
    async fn launch(&self, game_id: GameId) -> bool {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| !handle.is_finished());
        if tasks.contains_key(&game_id) {
            return false;
        }

        let scheduler = DayScheduler::new(
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            EventEngine::new(Arc::clone(&self.catalog)),
            Box::new(ThreadRandom::new()),
        );
        let handle = tokio::spawn(async move {
            match scheduler.run(game_id).await {
                Ok(outcome) => {
                    info!(game_id = %game_id, ?outcome, "Scheduler finished");
                }
                Err(run_error) => {
                    error!(game_id = %game_id, error = %run_error, "Scheduler failed");
                }
            }
        });
        tasks.insert(game_id, handle);
        true
    }
}
