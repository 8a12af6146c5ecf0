//! WebSocket chat relay.
//!
//! Every client holds one WebSocket connection. Chat frames fan out to the
//! whole room with the sender's display name prefixed; the reserved
//! `exchange` command is answered privately instead of broadcast.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   frames   ┌──────────────────────────┐
//! │ WS clients │ ◄────────► │  handler (one per peer)  │
//! └────────────┘            │  - reader: dispatch      │
//!                           │  - writer: drain + ping  │
//!                           └──────┬────────────┬──────┘
//!                             chat │            │ exchange <days>
//!                    ┌────────────▼──┐      ┌──▼──────────────────┐
//!                    │    ChatHub    │      │   ExchangeService   │
//!                    │ peer registry │      │ (fetch + journal)   │
//!                    └───────────────┘      └─────────────────────┘
//! ```

mod hub;
mod handler;

pub use hub::{ChatHub, PeerId};
pub use handler::ws_handler;
