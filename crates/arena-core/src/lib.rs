//! Engine core for Arena games: storage and delivery ports, the day
//! scheduler, the game supervisor, lobby operations, and configuration.
//!
//! The flow through the crate: the lobby builds up a game's membership,
//! the [`GameSupervisor`] starts it (or resumes it after a restart), and
//! one [`DayScheduler`] task per game drives the day cycle against a
//! [`Store`] backend, narrating through a [`Notifier`].

pub mod config;
pub mod error;
pub mod lobby;
pub mod notify;
pub mod scheduler;
pub mod store;
pub mod supervisor;

pub use config::{ArenaConfig, ConfigError};
pub use error::{LobbyError, SchedulerError, SupervisorError};
pub use lobby::{CreateGame, MAX_PLAYERS, MIN_PLAYERS};
pub use notify::{Notifier, NullNotifier, RecordingNotifier, TracingNotifier};
pub use scheduler::{DayScheduler, RunOutcome, day_budget_secs, remaining_budget_secs};
pub use store::{MemoryStore, Store, StoreError};
pub use supervisor::GameSupervisor;
