//! Arena engine binary.
//!
//! Wires the in-memory store, the log-backed notifier, the standard event
//! catalog, and the game supervisor together, then runs every game to
//! completion.
//!
//! # Startup sequence
//!
//! 1. Load configuration from `arena-config.yaml` (or the path given as
//!    the first argument; missing file falls back to defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Resume any games that were in flight when the process last stopped
//! 4. Seed and start the demo game, if enabled
//! 5. Wait for every scheduler to finish

mod error;

use std::path::Path;
use std::sync::Arc;

use arena_core::{ArenaConfig, CreateGame, GameSupervisor, MemoryStore, TracingNotifier, lobby};
use arena_events::EventCatalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_CONFIG_PATH: &str = "arena-config.yaml";

/// User id the demo game's owner plays under. First id above the bot
/// range, so it renders as a user mention.
const DEMO_OWNER_ID: u64 = arena_types::BOT_USER_ID_CEILING;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let config = if Path::new(&config_path).exists() {
        ArenaConfig::from_file(Path::new(&config_path))?
    } else {
        ArenaConfig::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();
    info!(config = %config_path, "Arena engine starting");

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(TracingNotifier::new());
    let catalog = Arc::new(EventCatalog::standard()?);
    let supervisor = GameSupervisor::new(store.clone(), notifier, catalog);

    let resumed = supervisor.resume_all().await?;

    if config.demo.enabled {
        let game = lobby::create_game(
            &*store,
            CreateGame {
                guild_id: 1,
                channel_id: 1,
                owner_id: DEMO_OWNER_ID,
                day_length: config.demo.day_length_minutes,
                max_players: config.games.max_players,
                invite_only: false,
            },
        )
        .await?;

        // The owner occupies one seat; bots fill the rest.
        let seats = config.games.max_players.saturating_sub(1);
        let bots = config.demo.bots.min(seats);
        lobby::seed_bots(&*store, game.id, bots).await?;
        supervisor.start_game(game.id).await?;
        info!(game_id = %game.id, bots, "Demo game started");
    } else if resumed == 0 {
        info!("No games to run");
        return Ok(());
    }

    supervisor.wait_idle().await;
    info!("All games finished");
    Ok(())
}
