//! The [`Game`] entity: one elimination game and its lifecycle flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{GameId, PlayerId};

/// One elimination game.
///
/// A game is created in a lobby state (`is_started == false`), accumulates
/// players up to `max_players`, and is then started by its owner. From that
/// point a single scheduler task owns it until `is_ended` is set. The record
/// is retained read-only afterwards for history queries; the engine never
/// deletes it.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique game identifier.
    pub id: GameId,
    /// Owning guild (opaque to the engine).
    pub guild_id: u64,
    /// Channel the game reports into (opaque to the engine).
    pub channel_id: u64,
    /// User who created the game and may start it.
    pub owner_id: u64,
    /// Whether joining requires an invite from the owner.
    pub is_invite_only: bool,
    /// Whether the owner has started the game.
    pub is_started: bool,
    /// Whether the game has finished. Implies `winner` has been resolved.
    pub is_ended: bool,
    /// Length of one day in minutes. Zero means days run without pacing.
    pub day_length: u64,
    /// Maximum number of players that may join.
    pub max_players: u32,
    /// The day currently being played, starting at 1.
    pub current_day: u32,
    /// Users invited to a private game.
    pub invited_users: Vec<u64>,
    /// The sole survivor, set once when the game ends. `None` on the
    /// degenerate zero-survivor tie.
    pub winner: Option<PlayerId>,
    /// When the current day's time budget started counting.
    ///
    /// Pinned explicitly at day rollover (and at game start) so that
    /// restart-time budget recomputation is not skewed by unrelated saves
    /// touching `updated_at`.
    pub day_started_at: DateTime<Utc>,
    /// When the game record was created.
    pub created_at: DateTime<Utc>,
    /// When the game record was last saved.
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Create a new game in the lobby state.
    ///
    /// `current_day` starts at 1 and `day_started_at` is provisionally set
    /// to the creation time; it is re-pinned when the game actually starts.
    pub fn new(
        guild_id: u64,
        channel_id: u64,
        owner_id: u64,
        day_length: u64,
        max_players: u32,
        is_invite_only: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GameId::new(),
            guild_id,
            channel_id,
            owner_id,
            is_invite_only,
            is_started: false,
            is_ended: false,
            day_length,
            max_players,
            current_day: 1,
            invited_users: Vec::new(),
            winner: None,
            day_started_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a scheduler should currently own this game.
    pub const fn is_active(&self) -> bool {
        self.is_started && !self.is_ended
    }
}
