//! The [`Player`] entity: one tribute inside a single game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{GameId, PlayerId};

/// User ids below this value denote bot-seeded players (debug/demo games).
pub const BOT_USER_ID_CEILING: u64 = 1000;

/// One player inside a game.
///
/// A player belongs to exactly one game. Status flags are mutated by event
/// transitions; `is_alive` only ever transitions from `true` to `false`,
/// and `death_by` is set exactly at that transition and never unset.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player identifier.
    pub id: PlayerId,
    /// The game this player belongs to (exclusive many-to-one).
    pub game_id: GameId,
    /// External user id; ids below [`BOT_USER_ID_CEILING`] are bots.
    pub user_id: u64,
    /// Whether the player is still in the running.
    pub is_alive: bool,
    /// Whether the player carries an injury (lowers fight odds).
    pub is_injured: bool,
    /// Whether the player holds one-shot protection against hazards.
    pub is_protected: bool,
    /// Whether the player holds one-shot armor against traps and blows.
    pub is_armored: bool,
    /// The last day this player was processed (0 = never). Used to avoid
    /// double-processing after a restart mid-day.
    pub current_day: u32,
    /// Cause of death, set exactly when `is_alive` flips to `false`.
    pub death_by: Option<String>,
    /// Players this one has eliminated (non-owning reference set).
    pub kills: Vec<PlayerId>,
    /// Allied players (non-owning reference set).
    pub allies: Vec<PlayerId>,
    /// When the player joined.
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new living player for the given game.
    pub fn new(game_id: GameId, user_id: u64) -> Self {
        Self {
            id: PlayerId::new(),
            game_id,
            user_id,
            is_alive: true,
            is_injured: false,
            is_protected: false,
            is_armored: false,
            current_day: 0,
            death_by: None,
            kills: Vec::new(),
            allies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this player was seeded by the engine rather than a real user.
    pub const fn is_bot(&self) -> bool {
        self.user_id < BOT_USER_ID_CEILING
    }

    /// Render the player as a chat handle: bots as `` ` Bot #n ` ``, real
    /// users as a mention.
    pub fn mention(&self) -> String {
        if self.is_bot() {
            format!("` Bot #{} `", self.user_id)
        } else {
            format!("<@{}>", self.user_id)
        }
    }

    /// Kill the player, recording the cause. A dead player stays dead; a
    /// second call leaves the original cause in place.
    pub fn mark_dead(&mut self, cause: impl Into<String>) {
        if self.is_alive {
            self.is_alive = false;
            self.death_by = Some(cause.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_alive_and_unflagged() {
        let player = Player::new(GameId::new(), 42);
        assert!(player.is_alive);
        assert!(!player.is_injured);
        assert!(!player.is_protected);
        assert!(!player.is_armored);
        assert_eq!(player.current_day, 0);
        assert!(player.death_by.is_none());
    }

    #[test]
    fn mark_dead_sets_cause_once() {
        let mut player = Player::new(GameId::new(), 42);
        player.mark_dead("a wild animal");
        assert!(!player.is_alive);
        assert_eq!(player.death_by.as_deref(), Some("a wild animal"));

        // A second death never overwrites the original cause.
        player.mark_dead("poison");
        assert_eq!(player.death_by.as_deref(), Some("a wild animal"));
    }

    #[test]
    fn bot_players_render_differently() {
        let bot = Player::new(GameId::new(), 7);
        let user = Player::new(GameId::new(), 111_222_333);
        assert!(bot.is_bot());
        assert!(!user.is_bot());
        assert_eq!(bot.mention(), "` Bot #7 `");
        assert_eq!(user.mention(), "<@111222333>");
    }
}
