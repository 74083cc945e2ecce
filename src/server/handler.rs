//! Protocol Handler
//!
//! Per-state handling of inbound bytes, invoked once per readiness
//! indication on a slot. Each branch makes a single non-blocking read, then
//! applies whatever transition the bytes demand.
//!
//! Owner termination of any kind — the explicit release byte, EOF, a read
//! error, or an unexpected byte — releases the key's waiters. Routing all
//! four through the same notification path is what keeps waiters live when
//! an owner crashes instead of releasing.

use std::io::ErrorKind;

use crate::connection::ConnState;
use crate::election;
use crate::events;
use crate::protocol::{Key, KEY_SIZE, OWNER_REPLY, RELEASE_BYTE};
use crate::server::Server;

impl Server {
    /// Dispatches one readiness indication for `slot`.
    pub(super) fn handle_readable(&mut self, slot: usize) {
        let Some(conn) = self.table.get(slot) else {
            return;
        };
        match conn.state {
            ConnState::KeyRead { .. } => self.read_key_bytes(slot),
            ConnState::Owner { key } => self.read_owner_byte(slot, key),
            // Waiters may not speak; any readable event, bytes or EOF,
            // means the peer is gone. It loses its claim silently.
            ConnState::Waiter { .. } => self.close(slot),
        }
    }

    /// KEYREAD: takes whatever key bytes are available, at most the
    /// remainder of the key. Partial progress survives in the state until
    /// the final byte lands.
    fn read_key_bytes(&mut self, slot: usize) {
        let Some(conn) = self.table.get_mut(slot) else {
            return;
        };
        let ConnState::KeyRead { buf, filled } = &mut conn.state else {
            return;
        };
        let completed = match conn.transport.try_read(&mut buf[*filled..]) {
            Err(e) if e.kind() == ErrorKind::WouldBlock => return,
            Ok(0) | Err(_) => None,
            Ok(n) => {
                *filled += n;
                if *filled < KEY_SIZE {
                    return;
                }
                Some(Key::new(*buf))
            }
        };
        match completed {
            Some(key) => self.elect(slot, key),
            None => self.close(slot),
        }
    }

    /// A full key arrived: elect an owner or enroll a waiter.
    fn elect(&mut self, slot: usize, key: Key) {
        if election::owner_exists(&self.table, &key) {
            let Some(conn) = self.table.get_mut(slot) else {
                return;
            };
            conn.state = ConnState::Waiter { key };
            events::notowner(conn.id, &key);
            return;
        }
        let Some(conn) = self.table.get_mut(slot) else {
            return;
        };
        match conn.transport.try_write(&[OWNER_REPLY]) {
            Ok(1) => {
                conn.state = ConnState::Owner { key };
                events::owner(conn.id, &key);
            }
            // A freshly-accepted socket admits one byte; anything else is a
            // dead peer.
            _ => self.close(slot),
        }
    }

    /// OWNER: reads the single release byte. Any termination frees the key
    /// and wakes its waiters; only a well-formed release keeps the
    /// connection for another acquisition.
    fn read_owner_byte(&mut self, slot: usize, key: Key) {
        let Some(conn) = self.table.get_mut(slot) else {
            return;
        };
        let mut byte = [0u8; 1];
        match conn.transport.try_read(&mut byte) {
            Err(e) if e.kind() == ErrorKind::WouldBlock => return,
            Ok(1) if byte[0] == RELEASE_BYTE => {
                conn.reset();
                events::release(conn.id, &key);
            }
            _ => {
                let id = conn.id;
                self.close(slot);
                events::release(id, &key);
            }
        }
        self.notify_waiters(&key);
    }

    /// Writes the one-byte release notification to every waiter parked on
    /// `key`, in slot order. A waiter whose transport rejects the byte is
    /// dropped; the rest return to key-reading.
    fn notify_waiters(&mut self, key: &Key) {
        for slot in election::waiters_of(&self.table, key) {
            let Some(conn) = self.table.get_mut(slot) else {
                continue;
            };
            match conn.transport.try_write(&[RELEASE_BYTE]) {
                Ok(1) => {
                    conn.reset();
                    events::notify(conn.id, key);
                }
                _ => self.close(slot),
            }
        }
    }

    /// Frees the slot; dropping the record closes the transport.
    pub(super) fn close(&mut self, slot: usize) {
        if let Some(conn) = self.table.free(slot) {
            events::closed(conn.id);
        }
    }
}
