//! Application layer - the conversation relay core.

mod turn_handler;

pub use turn_handler::{TurnFailure, TurnHandler, TurnSettings};
