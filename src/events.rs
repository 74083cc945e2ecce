//! Logging Adapter
//!
//! Emits exactly one structured line per state-visible event, through the
//! process-wide `tracing` subscriber. Every line carries the connection's
//! serial identifier; key-bearing events also carry the lowercase-hex key.

use tracing::info;

use crate::protocol::Key;

/// A client connection was accepted into the table.
pub fn connected(conn: u64) {
    info!(conn, "connected");
}

/// A slot was freed: peer close, read/write failure, or protocol violation.
pub fn closed(conn: u64) {
    info!(conn, "closed");
}

/// The connection was elected owner of `key` and sent the grant byte.
pub fn owner(conn: u64, key: &Key) {
    info!(conn, key = %key, "owner");
}

/// The key already has an owner; the connection was enrolled as a waiter.
pub fn notowner(conn: u64, key: &Key) {
    info!(conn, key = %key, "notowner");
}

/// The owner of `key` terminated, by explicit release or otherwise.
pub fn release(conn: u64, key: &Key) {
    info!(conn, key = %key, "release");
}

/// A waiter on `key` was woken with the release notification.
pub fn notify(conn: u64, key: &Key) {
    info!(conn, key = %key, "notify");
}
