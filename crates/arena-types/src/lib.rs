//! Shared type definitions for the Arena elimination-game engine.
//!
//! # Modules
//!
//! - [`ids`] -- Strongly-typed UUID v7 identifiers ([`GameId`], [`PlayerId`]).
//! - [`game`] -- The [`Game`] entity and its lifecycle flags.
//! - [`player`] -- The [`Player`] entity and its status flags.
//! - [`outcome`] -- [`EventOutcome`] and its [`Classification`] tag.

pub mod game;
pub mod ids;
pub mod outcome;
pub mod player;

pub use game::Game;
pub use ids::{GameId, PlayerId};
pub use outcome::{Classification, EventOutcome};
pub use player::{BOT_USER_ID_CEILING, Player};
