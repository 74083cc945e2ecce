//! Event Multiplexer
//!
//! The daemon's single event loop. One task owns the listener, the
//! connection table, and (through it) the election state, so no locking
//! exists anywhere in the server.
//!
//! ## Loop Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  readiness wait                      │
//! │                                                      │
//! │   listener readable ──▶ admit connection (KEYREAD)   │
//! │   (only while a slot is free)                        │
//! │                                                      │
//! │   client readable ────▶ protocol handler             │
//! │                         (handler.rs)                 │
//! │                                                      │
//! │   housekeeping tick ──▶ health line                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each iteration waits for exactly one readiness signal and runs the
//! matching transition to completion; the wait is the only suspension
//! point. The listener is polled ahead of clients, so a backlog of pending
//! connections drains before any reads are serviced. While the table is
//! full the listener drops out of the interest set entirely and the kernel
//! backlog applies the backpressure.

mod handler;

use std::future::poll_fn;
use std::task::Poll;
use std::time::Duration;

use tracing::{debug, warn};

use crate::connection::{Connection, ConnectionTable, Listener, Stream};
use crate::events;

/// Periodic wakeup for the readiness wait. A tick with nothing ready only
/// logs a health line.
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

/// What one readiness wait produced.
enum Wakeup {
    Accepted(std::io::Result<Stream>),
    Readable(usize),
    Tick,
}

/// The coordination server: listener, connection table, serial counter.
pub struct Server {
    listener: Listener,
    table: ConnectionTable,
    next_id: u64,
}

impl Server {
    /// Builds a server around an already-listening endpoint.
    ///
    /// `max_connections` is the hard cap on concurrent clients; it is fixed
    /// for the life of the server.
    pub fn new(listener: Listener, max_connections: usize) -> Self {
        Self {
            listener,
            table: ConnectionTable::with_capacity(max_connections),
            next_id: 0,
        }
    }

    /// Runs the event loop. Does not return under normal operation: accept
    /// failures are transient and logged, and per-connection failures free
    /// the affected slot only.
    pub async fn run(mut self) {
        loop {
            match self.next_wakeup().await {
                Wakeup::Accepted(Ok(stream)) => self.admit(stream),
                Wakeup::Accepted(Err(e)) => warn!(error = %e, "Failed to accept connection"),
                Wakeup::Readable(slot) => self.handle_readable(slot),
                Wakeup::Tick => {
                    debug!(active = self.table.active_count(), "health tick");
                }
            }
        }
    }

    /// Waits for one readiness signal.
    async fn next_wakeup(&self) -> Wakeup {
        let accepting = !self.table.is_full();
        tokio::select! {
            biased;
            result = self.listener.accept(), if accepting => Wakeup::Accepted(result),
            Some(slot) = next_readable(&self.table) => Wakeup::Readable(slot),
            _ = tokio::time::sleep(HOUSEKEEPING_INTERVAL) => Wakeup::Tick,
        }
    }

    /// Enters a freshly-accepted transport into the table, ready to read a
    /// key.
    fn admit(&mut self, stream: Stream) {
        let id = self.next_id;
        self.next_id += 1;
        match self.table.allocate(Connection::new(id, stream)) {
            Ok(_slot) => events::connected(id),
            // Unreachable while the accept arm is gated on a free slot;
            // dropping the stream closes it and the kernel backlog keeps
            // applying backpressure.
            Err(_full) => warn!(conn = id, "Connection table full, dropping connection"),
        }
    }
}

/// Resolves to the lowest-indexed slot with read readiness, registering
/// interest on every active transport. Resolves to `None` when the table is
/// empty, which removes this arm from the readiness wait. A readiness error
/// counts as ready; the handler surfaces it through `try_read`.
async fn next_readable(table: &ConnectionTable) -> Option<usize> {
    poll_fn(|cx| {
        let mut any_active = false;
        for (slot, conn) in table.iter_active() {
            any_active = true;
            if conn.transport.poll_read_ready(cx).is_ready() {
                return Poll::Ready(Some(slot));
            }
        }
        if any_active {
            Poll::Pending
        } else {
            Poll::Ready(None)
        }
    })
    .await
}
