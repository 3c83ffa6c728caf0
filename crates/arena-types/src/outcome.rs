//! Event outcome types shared between the event engine and the scheduler.

use serde::{Deserialize, Serialize};

/// Presentation tag for an event outcome.
///
/// Classification drives how the narrative is rendered (embed colors in the
/// original chat frontend); the engine itself never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// The player came out ahead (survived a hazard, found gear, won a fight).
    Positive,
    /// The player was harmed (injured or killed).
    Negative,
    /// Nothing of consequence happened.
    Passive,
}

/// The narrative result of applying one event to one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// Presentation tag.
    pub classification: Classification,
    /// Narrative text. The event engine rejects empty narratives as a
    /// configuration error.
    pub text: String,
}

impl EventOutcome {
    /// Build a [`Classification::Positive`] outcome.
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            classification: Classification::Positive,
            text: text.into(),
        }
    }

    /// Build a [`Classification::Negative`] outcome.
    pub fn negative(text: impl Into<String>) -> Self {
        Self {
            classification: Classification::Negative,
            text: text.into(),
        }
    }

    /// Build a [`Classification::Passive`] outcome.
    pub fn passive(text: impl Into<String>) -> Self {
        Self {
            classification: Classification::Passive,
            text: text.into(),
        }
    }
}
