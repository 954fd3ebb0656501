//! Domain types for the relay.
//!
//! The relay holds no conversation state of its own; the backend thread
//! referenced by [`ThreadId`] is the sole source of truth for history.

mod error;
mod turn;

pub use error::RelayError;
pub use turn::{ThreadId, TurnRequest, TurnResult, Utterance};
