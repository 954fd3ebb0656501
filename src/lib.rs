//! Assistant Relay - HTTP bridge between a browser chat page and an
//! assistant threads/runs backend.
//!
//! The relay accepts one user utterance per request, ensures a backend
//! conversation thread exists, appends the utterance, triggers a run,
//! polls until the run reaches a terminal status, and returns the newest
//! assistant reply together with the thread handle.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
