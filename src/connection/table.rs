//! Connection Table
//!
//! A fixed-capacity, slot-indexed table of client connections. One slot per
//! active client; a free slot holds nothing at all, so a freed slot can never
//! retain a stale transport handle.
//!
//! Allocation always picks the lowest-indexed free slot. A high-water mark
//! records one past the highest slot ever populated since the last tail
//! compaction and bounds every scan over the table. The backing storage is
//! sized once at startup and never grows or shrinks.

use thiserror::Error;

use crate::connection::transport::Stream;
use crate::protocol::{Key, KEY_SIZE};

/// Per-connection protocol state.
///
/// Freshly-accepted connections start in `KeyRead`. A connection returns to
/// `KeyRead` after releasing as an owner or being notified as a waiter, so a
/// single connection can acquire many keys over its lifetime.
#[derive(Debug, Clone, Copy)]
pub enum ConnState {
    /// Accumulating the fixed-width key; `filled` bytes received so far.
    /// Always `filled < KEY_SIZE`: the transition out happens the moment the
    /// final byte lands.
    KeyRead { buf: [u8; KEY_SIZE], filled: usize },
    /// Sole holder of `key`. The only byte this client may send is the
    /// release.
    Owner { key: Key },
    /// Parked until the owner of `key` releases. Waiters may not speak.
    Waiter { key: Key },
}

impl ConnState {
    fn key_read() -> Self {
        ConnState::KeyRead {
            buf: [0; KEY_SIZE],
            filled: 0,
        }
    }
}

/// One connected client: its transport, its protocol state, and the serial
/// identifier its log lines carry.
///
/// Slot indices are reused after a disconnect; the serial is not, which
/// keeps log lines unambiguous across reuse.
#[derive(Debug)]
pub struct Connection {
    /// Stable identifier for logging, assigned at accept.
    pub id: u64,
    /// The underlying stream, owned by this record.
    pub transport: Stream,
    /// Current protocol state.
    pub state: ConnState,
}

impl Connection {
    /// Wraps a freshly-accepted transport, ready to read a key.
    pub fn new(id: u64, transport: Stream) -> Self {
        Self {
            id,
            transport,
            state: ConnState::key_read(),
        }
    }

    /// Returns to key-reading with an empty buffer, after a release or a
    /// notification.
    pub fn reset(&mut self) {
        self.state = ConnState::key_read();
    }
}

/// The connection table is at capacity; the listener must stop accepting.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("connection table is full")]
pub struct TableFull;

/// Fixed-capacity table of connection slots.
pub struct ConnectionTable {
    slots: Vec<Option<Connection>>,
    /// One past the highest occupied slot; bounds every scan.
    length: usize,
    /// Occupied-slot count, kept so capacity checks are O(1).
    active: usize,
}

impl ConnectionTable {
    /// Creates a table with a fixed number of slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            length: 0,
            active: 0,
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// True when no slot is free. The event loop drops the listener from its
    /// interest set while this holds.
    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// Places a connection in the lowest-indexed free slot.
    pub fn allocate(&mut self, conn: Connection) -> Result<usize, TableFull> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(TableFull)?;
        self.slots[slot] = Some(conn);
        self.active += 1;
        if slot + 1 > self.length {
            self.length = slot + 1;
        }
        Ok(slot)
    }

    /// Frees a slot, returning its record. Dropping the record closes the
    /// transport. Freeing the tail slot lowers the high-water mark to just
    /// past the highest slot still occupied.
    pub fn free(&mut self, slot: usize) -> Option<Connection> {
        let conn = self.slots.get_mut(slot)?.take()?;
        self.active -= 1;
        if slot + 1 == self.length {
            while self.length > 0 && self.slots[self.length - 1].is_none() {
                self.length -= 1;
            }
        }
        Some(conn)
    }

    /// Shared access to a slot's record, if occupied.
    pub fn get(&self, slot: usize) -> Option<&Connection> {
        self.slots.get(slot)?.as_ref()
    }

    /// Exclusive access to a slot's record, if occupied.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Connection> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Occupied slots in index order, bounded by the high-water mark.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Connection)> {
        self.slots[..self.length]
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|conn| (slot, conn)))
    }
}
