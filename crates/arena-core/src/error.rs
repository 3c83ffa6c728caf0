//! Error types for the scheduling, supervision, and lobby layers.

use arena_events::EventError;
use arena_types::GameId;

use crate::store::StoreError;

/// Errors that stop a running day scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The storage backend failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying storage error.
        #[from]
        source: StoreError,
    },

    /// The event layer refused to produce a valid outcome. Fatal for the
    /// day: the game's task stops rather than deliver a broken narrative.
    #[error("event error: {source}")]
    Event {
        /// The underlying event error.
        #[from]
        source: EventError,
    },
}

/// Errors raised when starting or resuming games.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The storage backend failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying storage error.
        #[from]
        source: StoreError,
    },

    /// The game is already running.
    #[error("game {id} is already started")]
    AlreadyStarted {
        /// The game in question.
        id: GameId,
    },

    /// The game already finished and cannot be restarted.
    #[error("game {id} has already ended")]
    AlreadyEnded {
        /// The game in question.
        id: GameId,
    },

    /// A game needs at least two players to start.
    #[error("cannot start with {have} players, need at least 2")]
    NotEnoughPlayers {
        /// How many players the game currently has.
        have: usize,
    },
}

/// Errors raised by lobby operations (create, invite, join).
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The storage backend failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying storage error.
        #[from]
        source: StoreError,
    },

    /// Requested capacity is outside the allowed range.
    #[error("max players must be between 2 and 24, got {given}")]
    InvalidCapacity {
        /// The rejected capacity.
        given: u32,
    },

    /// Only the game owner may do this.
    #[error("only the game owner may perform this action")]
    NotOwner,

    /// Invites only apply to invite-only games.
    #[error("game {id} is open, no invite needed")]
    NotInviteOnly {
        /// The game in question.
        id: GameId,
    },

    /// The user already holds an invite.
    #[error("user {user_id} is already invited")]
    AlreadyInvited {
        /// The invited user.
        user_id: u64,
    },

    /// The user already joined this game.
    #[error("user {user_id} already joined")]
    AlreadyJoined {
        /// The joining user.
        user_id: u64,
    },

    /// The game is at capacity.
    #[error("game {id} is full")]
    GameFull {
        /// The game in question.
        id: GameId,
    },

    /// An invite-only game requires an invite to join.
    #[error("user {user_id} is not invited to this game")]
    InviteRequired {
        /// The rejected user.
        user_id: u64,
    },

    /// Membership is frozen once the game starts.
    #[error("game {id} has already started")]
    AlreadyStarted {
        /// The game in question.
        id: GameId,
    },
}
