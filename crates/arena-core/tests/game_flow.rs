//! End-to-end lifecycle: lobby, start, day cycle, winner.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use arena_core::notify::Delivery;
use arena_core::{
    CreateGame, GameSupervisor, MemoryStore, Notifier, RecordingNotifier, Store, lobby,
};
use arena_events::EventCatalog;

const RUN_GUARD: Duration = Duration::from_secs(60);

fn wiring() -> (Arc<MemoryStore>, Arc<RecordingNotifier>, GameSupervisor) {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let supervisor = GameSupervisor::new(
        Arc::clone(&store) as Arc<dyn Store>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::new(EventCatalog::standard().unwrap()),
    );
    (store, notifier, supervisor)
}

#[tokio::test]
async fn lobby_to_single_winner() {
    let (store, notifier, supervisor) = wiring();

    let game = lobby::create_game(
        &*store,
        CreateGame {
            guild_id: 10,
            channel_id: 20,
            owner_id: 100_000_001,
            day_length: 0,
            max_players: 8,
            invite_only: false,
        },
    )
    .await
    .unwrap();
    lobby::seed_bots(&*store, game.id, 7).await.unwrap();

    supervisor.start_game(game.id).await.unwrap();
    tokio::time::timeout(RUN_GUARD, supervisor.wait_idle())
        .await
        .unwrap();

    let finished = store.game(game.id).await.unwrap();
    assert!(finished.is_ended);

    let players = store.players_in_game(game.id).await.unwrap();
    assert_eq!(players.len(), 8);
    let alive: Vec<_> = players.iter().filter(|p| p.is_alive).collect();
    assert!(alive.len() <= 1);
    assert_eq!(finished.winner, alive.first().map(|p| p.id));
    for player in players.iter().filter(|p| !p.is_alive) {
        assert!(player.death_by.is_some());
        assert!(player.current_day >= 1);
        assert!(player.current_day <= finished.current_day);
    }

    // The delivery stream ends with exactly one game-end announcement,
    // preceded by at least one narrative.
    let deliveries = notifier.deliveries().await;
    assert!(matches!(deliveries.last(), Some(Delivery::End(_))));
    let ends = deliveries
        .iter()
        .filter(|d| matches!(d, Delivery::End(_)))
        .count();
    assert_eq!(ends, 1);
    assert!(
        deliveries
            .iter()
            .any(|d| matches!(d, Delivery::Narrative(_)))
    );
}

#[tokio::test]
async fn resume_picks_up_a_game_started_before_the_restart() {
    let (store, _notifier, supervisor) = wiring();

    let game = lobby::create_game(
        &*store,
        CreateGame {
            guild_id: 10,
            channel_id: 20,
            owner_id: 100_000_001,
            day_length: 0,
            max_players: 6,
            invite_only: false,
        },
    )
    .await
    .unwrap();
    lobby::seed_bots(&*store, game.id, 5).await.unwrap();

    // Mark the game in flight as a previous process would have, without
    // spawning its scheduler.
    let mut in_flight = store.game(game.id).await.unwrap();
    in_flight.is_started = true;
    store.save_game(&in_flight).await.unwrap();

    let resumed = supervisor.resume_all().await.unwrap();
    assert_eq!(resumed, 1);

    tokio::time::timeout(RUN_GUARD, supervisor.wait_idle())
        .await
        .unwrap();

    let finished = store.game(game.id).await.unwrap();
    assert!(finished.is_ended);
    assert!(store.alive_players(game.id).await.unwrap().len() <= 1);
}

#[tokio::test]
async fn ended_games_are_not_resumed() {
    let (store, notifier, supervisor) = wiring();

    let game = lobby::create_game(
        &*store,
        CreateGame {
            guild_id: 10,
            channel_id: 20,
            owner_id: 100_000_001,
            day_length: 0,
            max_players: 4,
            invite_only: false,
        },
    )
    .await
    .unwrap();
    let mut done = store.game(game.id).await.unwrap();
    done.is_started = true;
    done.is_ended = true;
    store.save_game(&done).await.unwrap();

    let resumed = supervisor.resume_all().await.unwrap();
    assert_eq!(resumed, 0);
    assert!(notifier.deliveries().await.is_empty());
}
