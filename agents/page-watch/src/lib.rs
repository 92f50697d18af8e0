//! Page Watch Agent
//!
//! Polls a single web page on a fixed cadence, fingerprints its visible
//! text and sends a Telegram alert whenever the fingerprint moves.
//!
//! # Components
//! - `engine::signature`: fetch, strip noise, normalize, hash
//! - `store`: last-seen fingerprint on disk
//! - `client`: Telegram notifier
//! - `engine`: the poll loop state machine
//! - `handler`: keep-alive HTTP endpoint

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod store;

// Re-export contracts
#[path = "../contracts/mod.rs"]
pub mod contracts;

pub use contracts::*;
