//! Top-level error type for the engine binary.

use arena_core::{ConfigError, LobbyError, SupervisorError};
use arena_events::EventError;

/// Everything that can abort engine startup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration failed to load or parse.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The built-in event catalog failed validation.
    #[error("event catalog error: {source}")]
    Catalog {
        /// The underlying event error.
        #[from]
        source: EventError,
    },

    /// Seeding the demo game failed.
    #[error("lobby error: {source}")]
    Lobby {
        /// The underlying lobby error.
        #[from]
        source: LobbyError,
    },

    /// Starting or resuming games failed.
    #[error("supervisor error: {source}")]
    Supervisor {
        /// The underlying supervisor error.
        #[from]
        source: SupervisorError,
    },
}
