//! Fxrelay Library
//!
//! This library provides the core components for the fxrelay chat server:
//! the WebSocket hub, the exchange rate client, and the command journal.

pub mod api;
pub mod exchange;
pub mod journal;
pub mod wordlist;
pub mod ws;
