//! GC session management for gclink.
//!
//! This crate holds everything about *having* a session with the game
//! coordinator, independent of what is done with it:
//!
//! 1. **State machine** — [`Session`] tracks the connection lifecycle from
//!    transport connect to GC readiness and decides what happens next.
//! 2. **Job correlation** — [`JobCorrelator`] pairs responses with the
//!    requests that asked for them.
//! 3. **Timers** — [`RetryTimer`] drives hello retransmission, the launch
//!    delay and reconnect backoff.
//! 4. **Credentials** — [`CredentialProvider`] supplies login details.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client driver (above)  ← feeds transport events in, acts on the answers
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol / Transport (below)  ← ids, packets, login outcomes
//! ```

mod auth;
mod config;
mod error;
mod jobs;
mod session;
mod timer;

pub use auth::{CredentialProvider, StaticCredentials};
pub use config::SessionConfig;
pub use error::SessionError;
pub use jobs::{JobCorrelator, JobTicket, JobWaiter};
pub use session::{ConnectionState, DisconnectAction, LogonAction, Session, StatusAction};
pub use timer::RetryTimer;
