//! Pre-game membership operations: creating games, inviting, joining.
//!
//! These functions enforce the lobby rules (capacity, invites, duplicate
//! joins, membership freeze at start) over any [`Store`] backend. The
//! caller supplies the acting user's id; permission questions beyond
//! ownership live with the front end.

use arena_types::{Game, GameId, Player};
use chrono::Utc;
use tracing::info;

use crate::error::LobbyError;
use crate::store::Store;

/// Smallest allowed game capacity.
pub const MIN_PLAYERS: u32 = 2;

/// Largest allowed game capacity.
pub const MAX_PLAYERS: u32 = 24;

/// Parameters for creating a new game.
#[derive(Debug, Clone, Copy)]
pub struct CreateGame {
    /// Opaque id of the community the game belongs to.
    pub guild_id: u64,
    /// Opaque id of the channel narratives are addressed to.
    pub channel_id: u64,
    /// User id of the game's owner.
    pub owner_id: u64,
    /// Day length in minutes. Zero means days run back to back.
    pub day_length: u64,
    /// Capacity, inclusive, within `MIN_PLAYERS..=MAX_PLAYERS`.
    pub max_players: u32,
    /// Whether joining requires an invite from the owner.
    pub invite_only: bool,
}

/// Create a game and enroll its owner as the first player.
///
/// # Errors
///
/// Rejects capacities outside `MIN_PLAYERS..=MAX_PLAYERS`; storage
/// failures propagate.
pub async fn create_game(store: &dyn Store, request: CreateGame) -> Result<Game, LobbyError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&request.max_players) {
        return Err(LobbyError::InvalidCapacity {
            given: request.max_players,
        });
    }

    let game = Game::new(
        request.guild_id,
        request.channel_id,
        request.owner_id,
        request.day_length,
        request.max_players,
        request.invite_only,
    );
    store.create_game(game.clone()).await?;
    store
        .create_player(Player::new(game.id, request.owner_id))
        .await?;

    info!(
        game_id = %game.id,
        owner_id = request.owner_id,
        max_players = request.max_players,
        invite_only = request.invite_only,
        "Game created"
    );
    Ok(game)
}

/// Invite a user to an invite-only game. Owner only.
///
/// # Errors
///
/// Rejects invites to open games, from non-owners, to games that already
/// started, and duplicates.
pub async fn invite_player(
    store: &dyn Store,
    game_id: GameId,
    inviter_id: u64,
    user_id: u64,
) -> Result<(), LobbyError> {
    let mut game = store.game(game_id).await?;
    if !game.is_invite_only {
        return Err(LobbyError::NotInviteOnly { id: game_id });
    }
    if game.owner_id != inviter_id {
        return Err(LobbyError::NotOwner);
    }
    if game.is_started {
        return Err(LobbyError::AlreadyStarted { id: game_id });
    }
    if game.invited_users.contains(&user_id) {
        return Err(LobbyError::AlreadyInvited { user_id });
    }

    game.invited_users.push(user_id);
    game.updated_at = Utc::now();
    store.save_game(&game).await?;
    info!(game_id = %game_id, user_id, "Player invited");
    Ok(())
}

/// Join a game as a new player.
///
/// Membership freezes once the game starts; for invite-only games,
/// everyone but the owner needs an invite.
///
/// # Errors
///
/// Rejects joins after start, without a required invite, duplicates, and
/// joins to a full game.
pub async fn join_game(
    store: &dyn Store,
    game_id: GameId,
    user_id: u64,
) -> Result<Player, LobbyError> {
    let game = store.game(game_id).await?;
    if game.is_started {
        return Err(LobbyError::AlreadyStarted { id: game_id });
    }
    if game.is_invite_only && user_id != game.owner_id && !game.invited_users.contains(&user_id) {
        return Err(LobbyError::InviteRequired { user_id });
    }
    if store.player_by_user(game_id, user_id).await?.is_some() {
        return Err(LobbyError::AlreadyJoined { user_id });
    }
    let members = store.players_in_game(game_id).await?;
    if u64::try_from(members.len()).unwrap_or(u64::MAX) >= u64::from(game.max_players) {
        return Err(LobbyError::GameFull { id: game_id });
    }

    let player = Player::new(game_id, user_id);
    store.create_player(player.clone()).await?;
    info!(game_id = %game_id, user_id, "Player joined");
    Ok(player)
}

/// Fill a game with bot players for demos and debugging.
///
/// Bots take the lowest free bot user ids (which render as `Bot #n`
/// rather than as user mentions).
///
/// # Errors
///
/// Rejects seeding into a started game or beyond capacity.
pub async fn seed_bots(
    store: &dyn Store,
    game_id: GameId,
    count: u32,
) -> Result<Vec<Player>, LobbyError> {
    let game = store.game(game_id).await?;
    if game.is_started {
        return Err(LobbyError::AlreadyStarted { id: game_id });
    }
    let members = store.players_in_game(game_id).await?;
    let occupancy = u32::try_from(members.len()).unwrap_or(u32::MAX);
    if occupancy.saturating_add(count) > game.max_players {
        return Err(LobbyError::GameFull { id: game_id });
    }

    let mut bots = Vec::with_capacity(usize::try_from(count).unwrap_or(0));
    let mut next_id = 1u64;
    for _ in 0..count {
        while members.iter().any(|member| member.user_id == next_id)
            || bots.iter().any(|bot: &Player| bot.user_id == next_id)
        {
            next_id = next_id.saturating_add(1);
        }
        let bot = Player::new(game_id, next_id);
        store.create_player(bot.clone()).await?;
        bots.push(bot);
    }

    info!(game_id = %game_id, count, "Seeded bot players");
    Ok(bots)
}
