//! Error types for the event layer.

/// Errors raised by the event catalog and engine.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// An event definition violates the catalog contract (zero weight,
    /// empty narrative output). Fatal: the owning day must not proceed
    /// with a malformed narrative.
    #[error("event `{event}` misconfigured: {reason}")]
    Configuration {
        /// Name of the offending event definition.
        event: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The catalog holds no selectable events.
    #[error("event catalog is empty")]
    EmptyCatalog,
}
