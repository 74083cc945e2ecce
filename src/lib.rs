//! # herdlockd - A Keyed-Mutex Coordination Daemon
//!
//! herdlockd is a tiny daemon that acts as a mutex for a supplied key. Its
//! purpose is the classic thundering-herd guard: when many clients miss the
//! same cache entry at once, exactly one of them is elected to recompute the
//! value while the rest block on the daemon until the elected client
//! finishes and they can consult the now-populated cache.
//!
//! The daemon holds no values and no durable state; it is a pure in-memory
//! election and notification service over stream sockets.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           herdlockd                              │
//! │                                                                  │
//! │  ┌────────────┐     ┌──────────────┐     ┌───────────────────┐   │
//! │  │  Listener  │────▶│ Event Loop   │────▶│ Protocol Handler  │   │
//! │  │ (TCP/Unix) │     │ (one task)   │     │ KEYREAD / OWNER / │   │
//! │  └────────────┘     └──────┬───────┘     │ WAITER dispatch   │   │
//! │                            │             └─────────┬─────────┘   │
//! │                            ▼                       │             │
//! │                 ┌─────────────────────┐            ▼             │
//! │                 │  Connection Table   │◀── election queries ──   │
//! │                 │ (fixed slot array)  │    owner_exists /        │
//! │                 └─────────────────────┘    waiters_of            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A single task owns everything: the listener, the slot table, and the
//! per-connection state machines. All I/O is non-blocking; the readiness
//! wait is the loop's only suspension point, so there are no locks and no
//! shared-state hazards.
//!
//! ## Wire Protocol
//!
//! Clients send a 16-byte key. The first connection to submit a key receives
//! the byte `O` and owns it; later submitters of the same key receive
//! nothing and wait. When the owner sends `R` (or disconnects), every waiter
//! receives `R` and may re-attempt. See [`protocol`] for the exact format.
//!
//! ## Quick Start
//!
//! ```ignore
//! use herdlockd::{Config, Listener, Server};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let listener = Listener::bind(&config.endpoint, config.force_unlink)?;
//!     Server::new(listener, config.max_connections).run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: the wire format — keys and reply bytes
//! - [`connection`]: the fixed-capacity slot table and the TCP/Unix
//!   transport abstraction
//! - [`election`]: owner and waiter lookup over the table
//! - [`server`]: the event loop and the per-state protocol handler
//! - [`events`]: one structured log line per state-visible event
//! - [`config`]: the configuration record and endpoint-selection rule
//!
//! ## What It Deliberately Does Not Do
//!
//! No persistence, no fairness among waiters, no authentication, no lease or
//! timeout on held locks, and no cross-daemon coordination. An owner that
//! never releases and never disconnects holds its key forever; that is the
//! intended trade for the sub-second lookups this daemon fronts.

pub mod config;
pub mod connection;
pub mod election;
pub mod events;
pub mod protocol;
pub mod server;

// Re-export commonly used types for convenience
pub use config::{Config, Endpoint};
pub use connection::{ConnState, Connection, ConnectionTable, Listener, Stream, TableFull};
pub use protocol::{Key, KEY_SIZE, OWNER_REPLY, RELEASE_BYTE};
pub use server::Server;

/// Version of herdlockd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
