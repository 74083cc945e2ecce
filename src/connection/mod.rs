//! Connection Management
//!
//! Everything about client connections except the protocol itself: the
//! fixed-capacity slot table that owns every accepted transport, and the
//! listener/stream abstraction over TCP and Unix sockets.
//!
//! ## Connection Lifecycle
//!
//! ```text
//!        accept                      full key, no owner
//! FREE ──────────▶ KEYREAD ──────────────────────────────▶ OWNER
//!                    │  ▲                                    │
//!                    │  │ release / notified                 │ R / disconnect
//!                    │  └────────────────────────────────────┤
//!                    │ full key, owner exists                ▼
//!                    ▼                                  (waiters woken)
//!                 WAITER ──── any read event ────▶ FREE
//! ```
//!
//! A slot is FREE exactly when it holds no record; the record owns the
//! transport, so freeing a slot closes the socket.

pub mod table;
pub mod transport;

pub use table::{ConnState, Connection, ConnectionTable, TableFull};
pub use transport::{Listener, Stream};
