//! Event layer for Arena games.
//!
//! Holds the weighted [`EventCatalog`] of things that can happen to a
//! player on a given day, the [`EventEngine`] that draws from it, and the
//! [`RandomSource`] abstraction that makes every draw reproducible under
//! test.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod random;
pub mod scope;

pub use catalog::{EventCatalog, EventDef, Transition};
pub use engine::{EventEngine, Resolution};
pub use error::EventError;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use scope::EventScope;
